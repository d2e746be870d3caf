//! Reading input documents from wherever the configuration points.
//!
//! The audit and coverage documents may live on disk or behind a URL, so both are read through
//! [`read_to_string`], which dispatches on the shape of the location.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

/// Where an input document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Fetched with an HTTP GET.
    Remote(Url),
    /// Read from the local filesystem.
    Local(PathBuf),
}

impl Location {
    /// Classifies a configured location.
    ///
    /// `http://` and `https://` URLs are remote, `file://` URLs and anything else are local paths.
    ///
    /// # Errors
    ///
    /// Returns a message if the location looks like a URL but cannot be parsed or converted.
    pub fn parse(location: &str) -> Result<Self, String> {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Url::parse(location)
                .map(Self::Remote)
                .map_err(|e| e.to_string());
        }
        if lower.starts_with("file:") {
            let url = Url::parse(location).map_err(|e| e.to_string())?;
            return url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| format!("'{location}' is not a local file URL"));
        }
        Ok(Self::Local(PathBuf::from(location)))
    }
}

/// Reads the whole document at `location` as text.
///
/// Remote documents are fetched with no timeout and no body size limit.
///
/// # Errors
///
/// Returns a message describing the parse, transport, status or I/O failure.
pub fn read_to_string(location: &str) -> Result<String, String> {
    match Location::parse(location)? {
        Location::Local(path) => {
            debug!(path = %path.display(), "reading local document");
            fs::read_to_string(&path).map_err(|e| e.to_string())
        }
        Location::Remote(url) => {
            debug!(%url, "fetching remote document");
            let client = Client::builder()
                .timeout(None::<Duration>)
                .build()
                .map_err(|e| e.to_string())?;
            client
                .get(url)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .and_then(reqwest::blocking::Response::text)
                .map_err(|e| e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/source.rs"]
mod tests;
