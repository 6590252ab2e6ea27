/// Local identifier assigned to a selected source image.
pub type ImageId = u64;
