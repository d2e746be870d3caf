//! Orchestrates a mapping run: parse the audit, resolve coverage, decorate the specification.

use std::fs;

use serde::Serialize;
use tracing::info;

use crate::audit::Section;
use crate::audit_parser;
use crate::config::Settings;
use crate::coverage;
use crate::decorator;
use crate::document::HtmlDocument;
use crate::error::{MapperError, Warning};
use crate::report;
use crate::source;

/// What a run produced.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Sections read from the audit.
    pub sections: usize,
    /// Assertions read from the audit.
    pub assertions: usize,
    /// Assertions with at least one covering test.
    pub covered_assertions: usize,
    /// Tests linked across all assertions.
    pub tests: usize,
    /// Sections whose assertion block was inserted into the specification.
    pub sections_decorated: usize,
    /// Non-fatal defects, rendered as messages.
    pub warnings: Vec<String>,
}

/// Runs the whole pipeline and writes the decorated specification to `settings.output`.
///
/// # Errors
///
/// Returns the first fatal error: unreadable specification, unreachable coverage report,
/// malformed audit, or a failed write.
pub fn run(settings: &Settings) -> Result<Summary, MapperError> {
    let spec_source =
        fs::read_to_string(&settings.spec_html_path).map_err(|source| MapperError::SpecRead {
            path: settings.spec_html_path.clone(),
            source,
        })?;
    let coverage_source = source::read_to_string(&settings.coverage_url).map_err(|detail| {
        MapperError::CoverageFetch {
            location: settings.coverage_url.clone(),
            detail,
        }
    })?;

    let mut sections = audit_parser::parse_location(&settings.audit_url)?;

    let coverage_html = HtmlDocument::parse(coverage_source)?;
    let resolution = coverage::resolve(&mut sections, &coverage_html, &settings.tck_version);
    drop(coverage_html);

    let spec = HtmlDocument::parse(spec_source)?;
    let decoration = decorator::decorate(&spec, &sections, settings.render);
    let output = decoration.plan.apply(spec.source());

    fs::write(&settings.output, output).map_err(|source| MapperError::SpecWrite {
        path: settings.output.clone(),
        source,
    })?;
    info!(path = %settings.output.display(), "wrote specification with assertions");

    if let Some(path) = &settings.report {
        report::write(&sections, path)?;
        info!(path = %path.display(), "wrote assertion report");
    }

    Ok(summarize(
        &sections,
        decoration.sections_decorated,
        resolution.warnings.iter().chain(&decoration.warnings),
    ))
}

fn summarize<'a>(
    sections: &[Section],
    sections_decorated: usize,
    warnings: impl Iterator<Item = &'a Warning>,
) -> Summary {
    let assertions = || sections.iter().flat_map(Section::assertions);
    Summary {
        sections: sections.len(),
        assertions: assertions().count(),
        covered_assertions: assertions().filter(|a| !a.tests.is_empty()).count(),
        tests: assertions().map(|a| a.tests.len()).sum(),
        sections_decorated,
        warnings: warnings.map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
#[path = "tests/mapper.rs"]
mod tests;
