//! CLI entry point for attest.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup and output.
//! All business logic lives in the `attest-app` crate.

use anyhow::Context;
use attest_settings::Overrides;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "ATTEST_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "attest",
    version,
    about = "Label-selected compliance checks with claim and JUnit artifacts"
)]
struct Cli {
    /// Path to attest config TOML. A missing file means defaults.
    #[arg(long, global = true, default_value = "attest.toml")]
    config: Utf8PathBuf,

    /// Log filter (e.g. `debug`, `attest_engine=trace`). Overrides ATTEST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a label expression; with --labels, evaluate it.
    Filter {
        /// Expression, e.g. `common && !telco` or `all`.
        expr: String,

        /// Comma-separated labels to evaluate against.
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
    },

    /// Drop claim results that no longer match a label filter.
    Sanitize {
        #[arg(long)]
        claim: Utf8PathBuf,

        /// Filter to keep. Defaults to the configured filter.
        #[arg(long)]
        label_filter: Option<String>,

        /// Where to write the sanitized claim (default: overwrite --claim).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Project a stored claim to JUnit XML.
    Junit {
        #[arg(long)]
        claim: Utf8PathBuf,

        /// Defaults to `junit.xml` next to the claim.
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render a Markdown summary of a stored claim.
    Summary {
        #[arg(long)]
        claim: Utf8PathBuf,

        /// Where to write the Markdown (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_json);

    match cli.cmd {
        Commands::Filter { expr, labels } => cmd_filter(&expr, labels.as_deref()),
        Commands::Sanitize {
            claim,
            label_filter,
            output,
        } => cmd_sanitize(&cli.config, &claim, label_filter, output.as_deref()),
        Commands::Junit { claim, output } => cmd_junit(&claim, output),
        Commands::Summary { claim, output } => cmd_summary(&claim, output.as_deref()),
    }
}

fn init_tracing(level: Option<&str>, json: bool) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn cmd_filter(expr: &str, labels: Option<&[String]>) -> anyhow::Result<()> {
    let expanded = attest_labels::expand_filter(expr);
    let evaluator = attest_labels::compile(&expanded)
        .with_context(|| format!("invalid label filter: {expr}"))?;

    match labels {
        Some(labels) => {
            let labels: Vec<&str> = labels.iter().map(|l| l.trim()).collect();
            println!("{}", evaluator.eval(&labels));
        }
        None => println!("{}", evaluator.expr()),
    }
    Ok(())
}

fn cmd_sanitize(
    config: &Utf8Path,
    claim: &Utf8Path,
    label_filter: Option<String>,
    output: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let filter = match label_filter {
        Some(filter) => filter,
        None => {
            // Missing file is allowed (defaults apply).
            let text = std::fs::read_to_string(config).unwrap_or_default();
            attest_app::load_config(&text, Overrides::default())?.label_filter
        }
    };

    let out = attest_app::run_sanitize(claim, &filter, output)?;
    println!("removed {} result(s), kept {}", out.removed.len(), out.kept);
    Ok(())
}

fn cmd_junit(claim: &Utf8Path, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| {
        claim
            .parent()
            .unwrap_or(Utf8Path::new(""))
            .join(attest_app::JUNIT_FILE)
    });
    attest_app::run_junit(claim, &output)?;
    println!("{output}");
    Ok(())
}

fn cmd_summary(claim: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let md = attest_app::run_summary(claim)?;
    match output {
        Some(path) => attest_app::write_text(path, &md).context("write summary")?,
        None => print!("{md}"),
    }
    Ok(())
}
