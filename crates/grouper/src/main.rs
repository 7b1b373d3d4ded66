use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use loggrouper::conf::{OutputFormat, ProfileRegistry};
use loggrouper::ingest::LogGrouper;
use loggrouper::report::{render_json, render_text, ReportOptions};
use loggrouper::runtime::{boot, cli::Cli, stop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = ProfileRegistry::builtin();

    if cli.list_profiles {
        print!("{}", boot::describe_profiles(&registry));
        return Ok(());
    }

    boot::init_logging();
    let config = boot::load_config(&cli, &registry).context("Invalid configuration")?;
    let grouper = LogGrouper::new(&config).context("Failed to build grouper")?;

    let cancel = CancellationToken::new();
    let watcher = stop::cancel_on_signal(cancel.clone());

    let result = grouper.analyze_paths(&cli.files, cancel.clone()).await;
    // Stop the signal watcher in every case.
    cancel.cancel();
    watcher.abort();
    let report = result.context("Grouping run failed")?;

    let options = ReportOptions {
        limit: config.limit,
        verbose: config.verbose,
    };
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match config.output {
        OutputFormat::Text => render_text(&report, options, &mut out),
        OutputFormat::Json => render_json(&report, options, &mut out),
    }
    .context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    Ok(())
}
