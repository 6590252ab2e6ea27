//! Naming conventions for styles and downloaded outputs.

use std::path::{Path, PathBuf};

/// Derive a style id from the file name of a bundled style image.
///
/// Everything before the first `.` is the id; a name without a dot is
/// used as-is.
///
/// # Examples
///
/// ```
/// use artbuilder_core::naming::style_name;
///
/// assert_eq!(style_name("vangogh.png"), "vangogh");
/// assert_eq!(style_name("the_scream.large.jpg"), "the_scream");
/// assert_eq!(style_name("mosaic"), "mosaic");
/// ```
pub fn style_name(file_name: &str) -> &str {
    match file_name.find('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// File name of a downloaded output.
///
/// Convention: `{style_id}-{mixing_level}-{original_name}`.
pub fn output_file_name(style_id: &str, mixing_level: &str, original_name: &str) -> String {
    format!("{style_id}-{mixing_level}-{original_name}")
}

/// Full local path of a downloaded output inside `output_folder`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use artbuilder_core::naming::output_path;
///
/// assert_eq!(
///     output_path(Path::new("/out"), "vangogh", "50", "cat.png"),
///     Path::new("/out/vangogh-50-cat.png"),
/// );
/// ```
pub fn output_path(
    output_folder: &Path,
    style_id: &str,
    mixing_level: &str,
    original_name: &str,
) -> PathBuf {
    output_folder.join(output_file_name(style_id, mixing_level, original_name))
}

/// Sibling path a download is streamed into before it replaces `dest`.
///
/// ```
/// use std::path::Path;
/// use artbuilder_core::naming::partial_output_path;
///
/// assert_eq!(
///     partial_output_path(Path::new("/out/vangogh-50-cat.png")),
///     Path::new("/out/vangogh-50-cat.png.part"),
/// );
/// ```
pub fn partial_output_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
