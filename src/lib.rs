//! tck-mapper: annotate a specification document with the TCK assertions of each section and
//! the tests that cover them.
//!
//! A run parses the TCK audit ([`audit_parser`]) into [`audit::Section`]s, links assertions to
//! tests listed in the coverage report ([`coverage`]), and splices collapsible assertion blocks
//! into the specification under each section heading ([`decorator`]). [`mapper::run`] ties the
//! steps together.

pub mod audit;
pub mod audit_parser;
pub mod config;
pub mod coverage;
pub mod decorator;
pub mod document;
pub mod edit_plan;
pub mod error;
pub mod formats;
pub mod logging;
pub mod mapper;
pub mod report;
pub mod source;
