//! Setting value validation.

use code_render::CodeKind;
use code_render::qr::QrEcLevel;

use super::{OutputFormat, RenderFailurePolicy};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CODE_KIND" => {
            value.parse::<CodeKind>()?;
        }
        "OUTPUT_FORMAT" => {
            value.parse::<OutputFormat>()?;
        }
        "QR_EC" => {
            value.parse::<QrEcLevel>()?;
        }
        "ON_RENDER_ERROR" => {
            value.parse::<RenderFailurePolicy>()?;
        }
        "QR_SIZE" => validate_int_range(value, 64, 2048)?,
        "QR_MARGIN" => validate_int_range(value, 0, 20)?,
        "BAR_WIDTH" => validate_int_range(value, 1, 10)?,
        "BAR_HEIGHT" => validate_int_range(value, 10, 400)?,
        "PAGE_QUOTA" => validate_int_range(value, 1, 500)?,
        "SECTION_LABEL" | "CONTINUED_LABEL" => {
            if value.chars().count() > 40 {
                return Err("must be at most 40 characters".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "SHOW_TEXT" | "PARALLEL_RENDER")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_enforced() {
        assert!(validate_setting("QR_SIZE", "256").is_ok());
        assert_eq!(
            validate_setting("QR_SIZE", "32").unwrap_err(),
            "must be between 64 and 2048"
        );
        assert!(validate_setting("PAGE_QUOTA", "0").is_err());
        assert!(validate_setting("BAR_HEIGHT", "tall").is_err());
    }

    #[test]
    fn enumerations_are_checked() {
        assert!(validate_setting("CODE_KIND", "barcode").is_ok());
        assert!(validate_setting("OUTPUT_FORMAT", "docx").is_err());
        assert!(validate_setting("QR_EC", "h").is_ok());
        assert!(validate_setting("ON_RENDER_ERROR", "ignore").is_err());
    }

    #[test]
    fn booleans_are_literal() {
        assert!(validate_setting("SHOW_TEXT", "false").is_ok());
        assert!(validate_setting("PARALLEL_RENDER", "yes").is_err());
    }

    #[test]
    fn unknown_keys_pass() {
        assert!(validate_setting("OUTPUT_DIR", "/tmp/anything").is_ok());
    }
}
