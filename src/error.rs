//! Failure and warning kinds raised while mapping assertions onto the specification.
//!
//! Fatal conditions are [`MapperError`] values and abort the run. Per-element data defects are
//! [`Warning`] values: they are logged where they are raised and collected so the driver can
//! still produce a partial enrichment.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that terminate a mapping run.
#[derive(Error, Debug)]
pub enum MapperError {
    /// A required option is absent or empty.
    #[error("{option} option was not defined")]
    ConfigMissing {
        /// Dotted name of the option, e.g. `tck.audit.url`.
        option: &'static str,
    },

    /// The configuration file exists but cannot be read or parsed.
    #[error("invalid configuration file '{path}': {detail}")]
    ConfigInvalid {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying reader or parser message.
        detail: String,
    },

    /// The audit document cannot be read or is malformed.
    #[error("cannot parse audit document '{location}'{}: {detail}", .offset.map(|o| format!(" at byte {o}")).unwrap_or_default())]
    AuditParse {
        /// Path or URL of the audit document.
        location: String,
        /// Byte offset of the failure, when the reader knows it.
        offset: Option<u64>,
        /// What went wrong.
        detail: String,
    },

    /// The coverage report cannot be retrieved.
    #[error("cannot fetch coverage report '{location}': {detail}")]
    CoverageFetch {
        /// URL or path of the coverage report.
        location: String,
        /// Transport or I/O message.
        detail: String,
    },

    /// The hypertext grammar could not be loaded or produced no tree.
    #[error("cannot parse hypertext document: {detail}")]
    HtmlParse {
        /// Parser message.
        detail: String,
    },

    /// The source specification document cannot be read.
    #[error("cannot read specification '{path}': {source}")]
    SpecRead {
        /// Path of the specification document.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The decorated specification document cannot be written.
    #[error("cannot write specification '{path}': {source}")]
    SpecWrite {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The JSON report cannot be serialised or written.
    #[error("cannot write report '{path}': {detail}")]
    ReportWrite {
        /// Report path.
        path: PathBuf,
        /// Serialiser or I/O message.
        detail: String,
    },
}

/// Non-fatal defects found while resolving coverage or decorating the specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A section has no anchor in one of the hypertext documents.
    #[error("section '{section}' cannot be found in the {document}")]
    SectionAnchorMissing {
        /// The id or title that was looked up.
        section: String,
        /// Which document was searched.
        document: DocumentKind,
    },

    /// A covering test links to something that is not an absolute URL.
    #[error("malformed test URL '{href}' for {method}: {detail}")]
    MalformedTestUrl {
        /// Method text of the coverage entry.
        method: String,
        /// The raw `href` value.
        href: String,
        /// URL parser message.
        detail: String,
    },

    /// A covering test name has no `.` separating class and method.
    #[error("malformed test method '{method}': expected ClassName.methodName")]
    MalformedTestMethod {
        /// Method text of the coverage entry.
        method: String,
    },

    /// The specification document has no `<head>` element.
    #[error("specification has no <head> element, visibility script not inserted")]
    MissingHead,

    /// The specification document has no `<style>` element.
    #[error("specification has no <style> element, a new one is added")]
    MissingStyle,
}

/// The two hypertext documents a section is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// The coverage report, searched by section title.
    Coverage,
    /// The specification document, searched by section id.
    Specification,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coverage => f.write_str("coverage report"),
            Self::Specification => f.write_str("specification"),
        }
    }
}
