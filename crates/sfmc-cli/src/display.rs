//! Display formatting for CLI output
//!
//! Results go to stdout as JSON or YAML so they can be piped into another
//! invocation with `--input-object -`. Status lines, spinners and error
//! records go to stderr.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use sfmc_arm::{Projection, SoftFailure};
use std::time::Duration;

use crate::error::{CliError, Result};

/// Output format of command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render a projection in `format`
pub fn render<T: Serialize>(projection: &Projection<T>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(projection)?),
        OutputFormat::Yaml => serde_yaml::to_string(projection)
            .map_err(|e| CliError::internal(format!("failed to render YAML: {}", e))),
    }
}

/// Print a projection to stdout
pub fn emit<T: Serialize>(projection: &Projection<T>, format: OutputFormat) -> Result<()> {
    let rendered = render(projection, format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Print a non-terminating error record
pub fn error_record(failure: &SoftFailure) {
    eprintln!(
        "{} {} {}",
        style("✗").red(),
        style(format!("[{}]", failure.category)).red().bold(),
        failure.message
    );
    eprintln!("  {} {}", style("target:").dim(), failure.target);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Spinner for a call that waits on the provider, hidden when stderr is not a terminal
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    if !console::user_attended_stderr() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
