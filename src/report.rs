//! JSON dump of the audit tree after coverage resolution.

use std::fs;
use std::path::Path;

use crate::audit::Section;
use crate::error::MapperError;

/// Serialises `sections` as pretty JSON.
///
/// # Errors
///
/// Returns the serialiser's error.
pub fn to_json(sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(sections)
}

/// Writes `sections` as pretty JSON to `path`.
///
/// # Errors
///
/// Returns [`MapperError::ReportWrite`] if serialising or writing fails.
pub fn write(sections: &[Section], path: &Path) -> Result<(), MapperError> {
    let failed = |detail: String| MapperError::ReportWrite {
        path: path.to_path_buf(),
        detail,
    };
    let json = to_json(sections).map_err(|e| failed(e.to_string()))?;
    fs::write(path, json).map_err(|e| failed(e.to_string()))
}

#[cfg(test)]
#[path = "tests/report.rs"]
mod tests;
