//! Configuration naming the inputs, the output and the TCK version to link against.
//!
//! Settings come from a `tck-mapper.toml` if present, overridden by command line flags or their
//! environment variables. Nothing is global: the validated [`Settings`] value is handed to the
//! driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use facet::Facet;

use crate::decorator::RenderOptions;
use crate::error::MapperError;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tck-mapper.toml";
/// Output path used when `new.spec.filename` is not given.
pub const DEFAULT_OUTPUT: &str = "spec-with-assertions.html";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// Options as gathered from the config file and the command line, not yet validated.
pub struct Config {
    #[facet(default)]
    /// `tck.audit.url`: path or URL of the audit document.
    pub tck_audit_url: Option<String>,
    #[facet(default)]
    /// `tck.coverage.url`: URL of the coverage report.
    pub tck_coverage_url: Option<String>,
    #[facet(default)]
    /// `spec.html.path`: local path of the specification document.
    pub spec_html_path: Option<String>,
    #[facet(default)]
    /// `tck.version`: revision substituted into test source links.
    pub tck_version: Option<String>,
    #[facet(default = DEFAULT_OUTPUT.to_string())]
    /// `new.spec.filename`: where the decorated specification is written.
    pub new_spec_filename: String,
    #[facet(default)]
    /// Where to write the enriched audit as JSON, if anywhere.
    pub report_path: Option<String>,
    #[facet(default = false)]
    /// Avoid nesting paragraphs for untestable assertions.
    pub well_formed_paragraphs: bool,
}

/// Validated options for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Path or URL of the audit document.
    pub audit_url: String,
    /// URL or path of the coverage report.
    pub coverage_url: String,
    /// Path of the specification document.
    pub spec_html_path: PathBuf,
    /// Revision substituted for `master` in test links.
    pub tck_version: String,
    /// Output path for the decorated specification.
    pub output: PathBuf,
    /// Output path for the JSON report.
    pub report: Option<PathBuf>,
    /// Markup choices for the decorator.
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tck_audit_url: None,
            tck_coverage_url: None,
            spec_html_path: None,
            tck_version: None,
            new_spec_filename: DEFAULT_OUTPUT.to_string(),
            report_path: None,
            well_formed_paragraphs: false,
        }
    }
}

impl Config {
    /// Load configuration from `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::ConfigInvalid`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MapperError> {
        let invalid = |detail: String| MapperError::ConfigInvalid {
            path: path.to_path_buf(),
            detail,
        };
        match fs::read_to_string(path) {
            Ok(contents) => facet_toml::from_str::<Self>(&contents).map_err(|e| invalid(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Checks the four required options and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::ConfigMissing`] naming the first required option that is absent
    /// or empty.
    pub fn validate(self) -> Result<Settings, MapperError> {
        let audit_url = required(self.tck_audit_url, "tck.audit.url")?;
        let coverage_url = required(self.tck_coverage_url, "tck.coverage.url")?;
        let spec_html_path = required(self.spec_html_path, "spec.html.path")?;
        let tck_version = required(self.tck_version, "tck.version")?;

        let output = if self.new_spec_filename.trim().is_empty() {
            DEFAULT_OUTPUT.to_string()
        } else {
            self.new_spec_filename
        };

        Ok(Settings {
            audit_url,
            coverage_url,
            spec_html_path: PathBuf::from(spec_html_path),
            tck_version,
            output: PathBuf::from(output),
            report: self
                .report_path
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            render: RenderOptions {
                well_formed_paragraphs: self.well_formed_paragraphs,
            },
        })
    }
}

fn required(value: Option<String>, option: &'static str) -> Result<String, MapperError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(MapperError::ConfigMissing { option })
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
