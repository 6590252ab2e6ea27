//! User-supplied session inputs and their submit-time validation.

use std::path::PathBuf;

use crate::error::CoreError;
use crate::source_image::SourceImage;

pub const MSG_NO_SOURCE_IMAGES: &str = "Please Choose your Source Images";
pub const MSG_NO_OUTPUT_FOLDER: &str = "Please Choose your Output Folder";
pub const MSG_NO_STYLE: &str = "Please Select a Style Image";
pub const MSG_NO_INSTANCE_URL: &str = "Please Enter your Instance URL";
pub const MSG_NO_MIXING_LEVEL: &str = "Please Enter a Mixing Level";

/// Values the user enters before starting a batch.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Base URL of the art service instance, e.g. `http://host:8000`.
    pub instance_url: String,
    pub output_folder: Option<PathBuf>,
    pub style_id: Option<String>,
    /// Style strength, forwarded to the service verbatim.
    pub mixing_level: String,
}

/// Validated settings shared by every image of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSettings {
    pub output_folder: PathBuf,
    pub style_id: String,
    pub mixing_level: String,
}

/// Check that everything needed to start a batch is present.
///
/// All missing inputs are reported together, before any network activity.
pub fn validate_submission(
    images: &[SourceImage],
    config: &SessionConfig,
) -> Result<JobSettings, CoreError> {
    let mut errors = Vec::new();

    if images.is_empty() {
        errors.push(MSG_NO_SOURCE_IMAGES.to_string());
    }
    let output_folder = config
        .output_folder
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty());
    if output_folder.is_none() {
        errors.push(MSG_NO_OUTPUT_FOLDER.to_string());
    }
    let style_id = config.style_id.as_deref().filter(|s| !s.trim().is_empty());
    if style_id.is_none() {
        errors.push(MSG_NO_STYLE.to_string());
    }
    if config.instance_url.trim().is_empty() {
        errors.push(MSG_NO_INSTANCE_URL.to_string());
    }
    if config.mixing_level.trim().is_empty() {
        errors.push(MSG_NO_MIXING_LEVEL.to_string());
    }

    match (output_folder, style_id) {
        (Some(folder), Some(style)) if errors.is_empty() => Ok(JobSettings {
            output_folder: folder.clone(),
            style_id: style.to_string(),
            mixing_level: config.mixing_level.clone(),
        }),
        _ => Err(CoreError::Validation(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn complete_config() -> SessionConfig {
        SessionConfig {
            instance_url: "http://art.local".into(),
            output_folder: Some(PathBuf::from("/out")),
            style_id: Some("vangogh".into()),
            mixing_level: "50".into(),
        }
    }

    #[test]
    fn complete_submission_yields_settings() {
        let images = vec![SourceImage::new(1, "cat.png")];
        let settings = validate_submission(&images, &complete_config()).unwrap();
        assert_eq!(
            settings,
            JobSettings {
                output_folder: PathBuf::from("/out"),
                style_id: "vangogh".into(),
                mixing_level: "50".into(),
            }
        );
    }

    #[test]
    fn reports_every_missing_input_in_order() {
        let err = validate_submission(&[], &SessionConfig::default()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msgs) => {
            assert_eq!(
                msgs,
                vec![
                    MSG_NO_SOURCE_IMAGES,
                    MSG_NO_OUTPUT_FOLDER,
                    MSG_NO_STYLE,
                    MSG_NO_INSTANCE_URL,
                    MSG_NO_MIXING_LEVEL,
                ]
            );
        });
    }

    #[test]
    fn missing_images_only() {
        let err = validate_submission(&[], &complete_config()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msgs) => {
            assert_eq!(msgs, vec![MSG_NO_SOURCE_IMAGES]);
        });
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let config = SessionConfig {
            instance_url: "   ".into(),
            style_id: Some(String::new()),
            ..complete_config()
        };
        let images = vec![SourceImage::new(1, "cat.png")];
        let err = validate_submission(&images, &config).unwrap_err();
        assert_matches!(err, CoreError::Validation(msgs) => {
            assert_eq!(msgs, vec![MSG_NO_STYLE, MSG_NO_INSTANCE_URL]);
        });
    }
}
