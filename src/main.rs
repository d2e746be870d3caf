//! tck-mapper: Decorate a specification with TCK assertions and their covering tests.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tck_mapper::{config, logging, mapper};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "tck-mapper")]
#[command(about = "Annotate a specification document with TCK assertions", long_about = None)]
struct Args {
    /// Path or URL of the TCK audit document (tck.audit.url)
    #[arg(long, env = "TCK_AUDIT_URL")]
    tck_audit_url: Option<String>,

    /// URL of the coverage report (tck.coverage.url)
    #[arg(long, env = "TCK_COVERAGE_URL")]
    tck_coverage_url: Option<String>,

    /// Path of the specification document (spec.html.path)
    #[arg(long, env = "SPEC_HTML_PATH")]
    spec_html_path: Option<String>,

    /// Revision substituted for `master` in test links (tck.version)
    #[arg(long, env = "TCK_VERSION")]
    tck_version: Option<String>,

    /// Output file (new.spec.filename)
    #[arg(long, short = 'o', env = "NEW_SPEC_FILENAME")]
    new_spec_filename: Option<String>,

    /// Also write the enriched audit as JSON
    #[arg(long, value_name = "PATH")]
    report: Option<String>,

    /// Render untestable assertions as a single paragraph instead of nested ones
    #[arg(long)]
    well_formed_paragraphs: bool,

    /// Configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);
    info!("starting TCK assertions mapper");

    let mut cfg = match config::Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Override config with command line args
    if let Some(url) = args.tck_audit_url {
        cfg.tck_audit_url = Some(url);
    }
    if let Some(url) = args.tck_coverage_url {
        cfg.tck_coverage_url = Some(url);
    }
    if let Some(path) = args.spec_html_path {
        cfg.spec_html_path = Some(path);
    }
    if let Some(version) = args.tck_version {
        cfg.tck_version = Some(version);
    }
    if let Some(output) = args.new_spec_filename {
        cfg.new_spec_filename = output;
    }
    if args.report.is_some() {
        cfg.report_path = args.report;
    }
    cfg.well_formed_paragraphs |= args.well_formed_paragraphs;

    let settings = match cfg.validate() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match mapper::run(&settings) {
        Ok(summary) => {
            if !summary.warnings.is_empty() {
                warn!(count = summary.warnings.len(), "finished with warnings");
            }
            info!(
                sections = summary.sections,
                assertions = summary.assertions,
                covered = summary.covered_assertions,
                tests = summary.tests,
                decorated = summary.sections_decorated,
                "TCK assertions mapper successfully finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
