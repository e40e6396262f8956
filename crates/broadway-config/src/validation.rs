//! Validation utilities and regex patterns

use crate::schema::ControlsConfig;
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #008080)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters (C:\)
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Validate that the slider bounds are ordered and contain the default
pub fn validate_controls(controls: &ControlsConfig) -> Result<(), ValidationError> {
    if controls.top_n_min > controls.top_n_max {
        let mut error = ValidationError::new("top_n_bounds_reversed");
        error.message = Some("top_n_min cannot exceed top_n_max".into());
        return Err(error);
    }

    if !(controls.top_n_min..=controls.top_n_max).contains(&controls.top_n_default) {
        let mut error = ValidationError::new("top_n_default_out_of_range");
        error.message = Some(
            format!(
                "top_n_default {} must lie within {}..={}",
                controls.top_n_default, controls.top_n_min, controls.top_n_max
            )
            .into(),
        );
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        // Valid hex colors
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#008080"));
        assert!(HEX_COLOR_REGEX.is_match("#e94190"));

        // Invalid hex colors
        assert!(!HEX_COLOR_REGEX.is_match("teal")); // Named color
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG")); // Invalid characters
        assert!(!HEX_COLOR_REGEX.is_match("")); // Empty
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("data/broadway.csv").is_ok());
        assert!(validate_file_path("./output").is_ok());
        assert!(validate_file_path("C:\\data\\WickedResult.csv").is_ok());

        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("data/<broadway>.csv").is_err());
        assert!(validate_file_path("out|put").is_err());
    }

    #[test]
    fn test_validate_controls() {
        let mut controls = ControlsConfig::default();
        assert!(validate_controls(&controls).is_ok());

        controls.top_n_default = 25;
        assert!(validate_controls(&controls).is_err());

        controls.top_n_default = 10;
        controls.top_n_min = 30;
        let err = validate_controls(&controls).unwrap_err();
        assert_eq!(err.code, "top_n_bounds_reversed");
    }
}
