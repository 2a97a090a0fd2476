use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use styleguard_core::{AnnotationTarget, CheckerSettings, FormatChecker};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("STYLEGUARD_GIT_HASH"),
    ")"
);

#[derive(Parser)]
#[command(name = "styleguard")]
#[command(about = "Check a .docx against a template and annotate what differs", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a document with a template and print the JSON report.
    Check {
        document: PathBuf,

        #[arg(short, long)]
        template: PathBuf,

        /// Write an annotated copy next to the document.
        #[arg(short, long)]
        annotate: bool,

        /// Annotated copy destination. Implies --annotate.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report here instead of stdout.
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// JSON file with comparison and annotation settings.
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Print the format rules extracted from a document.
    Rules { document: PathBuf },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level/filter '{}'", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn load_settings(path: Option<&Path>) -> Result<CheckerSettings> {
    match path {
        Some(path) => CheckerSettings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(CheckerSettings::default()),
    }
}

fn emit(json: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Check {
            document,
            template,
            annotate,
            output,
            report,
            settings,
        } => {
            let checker = FormatChecker::new(load_settings(settings.as_deref())?);
            let target = match (&output, annotate) {
                (Some(path), _) => AnnotationTarget::To(path),
                (None, true) => AnnotationTarget::Beside,
                (None, false) => AnnotationTarget::None,
            };

            let result = checker
                .check_files(&document, &template, target)
                .with_context(|| format!("checking {} against {}", document.display(), template.display()))?;

            info!(
                issues = result.summary.total_issues,
                score = result.overall_score,
                "check complete"
            );
            let json = result.to_json().context("serializing report")?;
            emit(&json, report.as_deref())
        }
        Commands::Rules { document } => {
            let content = styleguard_core::wml::read_path(&document)
                .with_context(|| format!("reading {}", document.display()))?;
            let rules = styleguard_core::extract_rules(&content);
            let json = serde_json::to_string_pretty(&rules).context("serializing rules")?;
            emit(&json, None)
        }
    }
}
