//! Prints the skip intervals a marker file would produce.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use comskip_config::{ConfigLoader, DEFAULT_LOG_FILTER, init_tracing};
use comskip_core::{
    model::{SessionKey, SkipInterval},
    sources::{marker_path_for, parse_marker_source},
};

#[derive(Parser, Debug)]
#[command(
    name = "comskip-inspect",
    about = "Show the commercial breaks found in a marker file"
)]
struct Cli {
    /// Media file or marker file to inspect
    path: PathBuf,
    /// Marker extension; defaults to the configured one
    #[arg(long)]
    extension: Option<String>,
    /// Configuration file (TOML or JSON)
    #[arg(long, env = "COMSKIP_CONFIG_PATH")]
    config: Option<PathBuf>,
    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(DEFAULT_LOG_FILTER)
        .context("failed to initialize tracing")?;

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let load = loader.load().context("failed to load configuration")?;
    load.warnings.log();

    let extension = cli
        .extension
        .unwrap_or_else(|| load.config.marker_extension.clone());
    let marker = resolve_marker_path(&cli.path, &extension);

    let intervals =
        parse_marker_source(&marker, &SessionKey::new("inspect"))
            .with_context(|| format!("cannot use {}", marker.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&intervals)?);
        return Ok(());
    }

    if intervals.is_empty() {
        bail!("{} contains no skippable regions", marker.display());
    }
    print_table(&marker, &intervals);
    Ok(())
}

fn resolve_marker_path(path: &Path, extension: &str) -> PathBuf {
    let wanted = extension.trim_start_matches('.');
    let already_marker = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
    if already_marker {
        path.to_path_buf()
    } else {
        marker_path_for(path, wanted)
    }
}

fn print_table(marker: &Path, intervals: &[SkipInterval]) {
    println!("{}", marker.display());
    println!("{:>3}  {:>10}  {:>10}  {:>8}", "#", "start", "end", "length");
    for (index, interval) in intervals.iter().enumerate() {
        println!(
            "{:>3}  {:>10}  {:>10}  {:>7.1}s",
            index + 1,
            clock(interval.start.as_secs()),
            clock(interval.end.as_secs()),
            interval.duration().as_secs_f64()
        );
    }
}

fn clock(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}
