//! # warc-normalizer CLI (`warcn`)
//!
//! ## Usage
//!
//! ```bash
//! warcn convert <ARCHIVE> <OUTPUT> [--config warcn.toml]
//! warcn stats <OUTPUT>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `warcn convert` | Convert an archive (or directory of archives) into the output store |
//! | `warcn stats` | Print a summary of an output store |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use warc_normalizer::{config, convert, stats};

/// warc-normalizer — converts WARC web-archive captures into normalized
/// documents for indexing pipelines.
#[derive(Parser)]
#[command(
    name = "warcn",
    about = "Convert WARC web-archive captures into normalized documents",
    version
)]
struct Cli {
    /// Path to an optional configuration file (TOML) holding input globs
    /// and filter rules. Without it, every document is kept.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Convert an archive into the output store.
    ///
    /// Reads every record from the input (a `.warc` file, or a directory
    /// walked for archives matching the configured include globs),
    /// normalizes each qualifying response into a document, applies the
    /// configured filter rules, and appends kept documents to the SQLite
    /// store at OUTPUT. Prints KEPT/FILTERED counters on completion.
    Convert {
        /// Input archive file or directory of archives.
        archive: PathBuf,

        /// Output store path (SQLite file, created if missing).
        output: PathBuf,

        /// Stop after this many kept documents.
        #[arg(long)]
        limit: Option<usize>,

        /// Count outcomes without writing to the output store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a summary of an output store.
    ///
    /// Shows document counts, store size, newest write, and a
    /// per-content-type breakdown.
    Stats {
        /// Output store path.
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Convert {
            archive,
            output,
            limit,
            dry_run,
        } => {
            convert::run_convert(&cfg, &archive, &output, limit, dry_run).await?;
        }
        Commands::Stats { output } => {
            stats::run_stats(&output).await?;
        }
    }

    Ok(())
}
