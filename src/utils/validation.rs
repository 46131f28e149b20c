use crate::utils::error::{PlaybookError, Result};
use std::fmt::Display;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl Display, reason: impl Into<String>) -> PlaybookError {
    PlaybookError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(invalid(field_name, "", "Path cannot be empty"));
    }

    let shown = path.to_string_lossy();
    if shown.contains('\0') {
        return Err(invalid(field_name, shown.escape_debug(), "Path contains null bytes"));
    }

    Ok(())
}

/// Extension match is case-insensitive, so `Plays.TOML` is accepted as `toml`.
pub fn validate_extension(field_name: &str, path: &Path, expected: &str) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(expected) => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path.display(),
            format!("Expected a .{} file, got .{}", expected, ext),
        )),
        None => Err(invalid(
            field_name,
            path.display(),
            format!("Expected a .{} file", expected),
        )),
    }
}

pub fn validate_at_least(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Incomparable values (NaN) fall outside every range.
pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Court lengths end up in the SVG viewBox, where `NaN` or `inf` break the drawing.
pub fn validate_length(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(field_name, value, "Length must be a finite number"));
    }
    validate_range(field_name, value, min, max)
}

/// Colors are written into SVG attributes verbatim.
pub fn validate_color(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Color cannot be blank"));
    }
    if value.contains(['"', '<', '>', '&']) {
        return Err(invalid(
            field_name,
            value,
            "Colors cannot contain quotes or markup characters",
        ));
    }
    Ok(())
}
