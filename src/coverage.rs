//! Links audit assertions to the tests that cover them.
//!
//! The coverage report has one element per specification section, identified by the section
//! title. Under it, every `results` element holds the assertion prose (interleaved with `|`
//! markers) followed by the tests that exercise it. An assertion is covered by a result when
//! the result's text contains the assertion's normalised text.

use reqwest::Url;
use tracing::{debug, warn};
use tree_sitter::Node;

use crate::audit::{Section, Test};
use crate::document::HtmlDocument;
use crate::error::{DocumentKind, Warning};

/// Class of the elements holding one piece of assertion prose and its tests.
pub const RESULTS_CLASS: &str = "results";
/// Class of the elements naming one covering test.
pub const METHOD_CLASS: &str = "coverageMethod";
/// Class of the element naming the package of the covering tests.
pub const PACKAGE_CLASS: &str = "packageName";
/// Placeholder revision in test source links.
pub const VERSION_PLACEHOLDER: &str = "master";

/// Counters and warnings from one resolution pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Sections whose coverage anchor was found.
    pub sections_found: usize,
    /// Tests appended across all assertions.
    pub tests_linked: usize,
    /// Defects that were skipped.
    pub warnings: Vec<Warning>,
}

/// One `results` element, pre-rendered for matching.
struct CoverageResult {
    text: String,
    methods: Vec<CoverageMethod>,
    package_name: String,
}

struct CoverageMethod {
    name: String,
    href: String,
}

/// Appends to every assertion the tests of each coverage result whose text contains it.
///
/// Sections without elements are skipped. A section whose title has no anchor in the report
/// keeps empty test lists and yields a [`Warning::SectionAnchorMissing`]. Tests are appended in
/// report order and are not deduplicated.
pub fn resolve(sections: &mut [Section], coverage: &HtmlDocument, version: &str) -> Resolution {
    let mut resolution = Resolution::default();

    for section in sections.iter_mut().filter(|s| !s.elements.is_empty()) {
        let Some(anchor) = coverage.element_by_id(&section.title) else {
            let warning = Warning::SectionAnchorMissing {
                section: section.title.clone(),
                document: DocumentKind::Coverage,
            };
            warn!("{warning}");
            resolution.warnings.push(warning);
            continue;
        };
        resolution.sections_found += 1;

        let results = collect_results(coverage, anchor);
        debug!(
            section = %section.id,
            results = results.len(),
            "matching assertions against coverage results"
        );

        for assertion in section.assertions_mut() {
            let needle = assertion.normalized_text();
            for result in results.iter().filter(|r| r.text.contains(&needle)) {
                for method in &result.methods {
                    match build_test(method, &result.package_name, version) {
                        Ok(test) => {
                            assertion.tests.push(test);
                            resolution.tests_linked += 1;
                        }
                        Err(warning) => {
                            warn!("{warning}");
                            resolution.warnings.push(warning);
                        }
                    }
                }
            }
        }
    }

    resolution
}

fn collect_results(coverage: &HtmlDocument, anchor: Node<'_>) -> Vec<CoverageResult> {
    coverage
        .elements_with_class(anchor, RESULTS_CLASS)
        .into_iter()
        .map(|result| {
            let methods = coverage
                .elements_with_class(result, METHOD_CLASS)
                .into_iter()
                .map(|method| CoverageMethod {
                    name: coverage.text(method).replace("github", "").trim().to_string(),
                    href: coverage
                        .first_element_with_attribute(method, "a", "href")
                        .and_then(|a| coverage.attribute(a, "href"))
                        .unwrap_or_default(),
                })
                .collect();
            let package_name = coverage
                .elements_with_class(result, PACKAGE_CLASS)
                .first()
                .map(|package| coverage.text(*package))
                .unwrap_or_default();
            CoverageResult {
                text: coverage.text(result).replace('|', ""),
                methods,
                package_name,
            }
        })
        .collect()
}

fn build_test(method: &CoverageMethod, package_name: &str, version: &str) -> Result<Test, Warning> {
    if !method.name.contains('.') {
        return Err(Warning::MalformedTestMethod {
            method: method.name.clone(),
        });
    }
    let malformed = |detail: String| Warning::MalformedTestUrl {
        method: method.name.clone(),
        href: method.href.clone(),
        detail,
    };
    let url = Url::parse(&method.href).map_err(|e| malformed(e.to_string()))?;
    let ref_url = Url::parse(&url.as_str().replace(VERSION_PLACEHOLDER, version))
        .map_err(|e| malformed(e.to_string()))?;
    Ok(Test {
        method_name: method.name.clone(),
        ref_url,
        package_name: package_name.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/coverage.rs"]
mod tests;
