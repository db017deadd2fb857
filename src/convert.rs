//! Batch conversion driver.
//!
//! Walks the input path for archives, pulls records one at a time through
//! the transformer, appends kept documents to the output store, and prints
//! a summary. Counters live here, not in the transformer: `Emitted` maps
//! to KEPT, `Filtered` to FILTERED, and the skip outcomes stay uncounted.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::db;
use crate::filter::DocumentFilter;
use crate::store;
use crate::transform::{Outcome, Transformer};
use crate::warc::WarcReader;

pub async fn run_convert(
    config: &Config,
    input: &Path,
    output: &Path,
    limit: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    // Compile the filter before touching any input or output, so a bad
    // rule pattern fails the job with no partial output.
    let filter = DocumentFilter::from_rules(&config.filter.rules)?;
    let transformer = Transformer::new(filter);

    let archives = discover_archives(input, &config.input.include_globs)?;

    let pool = if dry_run {
        None
    } else {
        let pool = db::connect(output).await?;
        store::init_schema(&pool).await?;
        Some(pool)
    };

    let mut seen = 0u64;
    let mut kept = 0u64;
    let mut filtered = 0u64;
    let mut non_response = 0u64;
    let mut non_http = 0u64;
    let mut unparsable = 0u64;

    'archives: for archive in &archives {
        tracing::debug!(archive = %archive.display(), "reading archive");
        let file = File::open(archive)?;
        let mut reader = WarcReader::new(BufReader::new(file));

        while let Some(record) = reader.next_record()? {
            seen += 1;
            match transformer.transform(record) {
                Outcome::Emitted(doc) => {
                    if let Some(pool) = &pool {
                        store::append_document(pool, &doc).await?;
                    }
                    kept += 1;
                    if limit.is_some_and(|lim| kept as usize >= lim) {
                        tracing::debug!(limit = ?limit, "document limit reached");
                        break 'archives;
                    }
                }
                Outcome::Filtered => filtered += 1,
                Outcome::SkippedNonResponse => non_response += 1,
                Outcome::SkippedNonHttpUri => non_http += 1,
                Outcome::SkippedUnparsableHttp => unparsable += 1,
            }
        }
    }

    if dry_run {
        println!("convert {} (dry-run)", input.display());
    } else {
        println!("convert {}", input.display());
    }
    println!("  archives: {}", archives.len());
    println!("  records seen: {}", seen);
    println!("  kept: {}", kept);
    println!("  filtered: {}", filtered);
    println!(
        "  skipped: {} (non-response {}, non-http {}, unparsable {})",
        non_response + non_http + unparsable,
        non_response,
        non_http,
        unparsable
    );
    println!("ok");

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

/// Resolve the input path into the list of archive files to read.
///
/// A file is taken as-is; a directory is walked and matched against the
/// configured include globs, sorted for deterministic ordering.
fn discover_archives(input: &Path, include_globs: &[String]) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input path does not exist: {}", input.display());
    }

    let include_set = build_globset(include_globs)?;

    let mut archives = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
        if include_set.is_match(relative) {
            archives.push(entry.path().to_path_buf());
        }
    }
    archives.sort();

    if archives.is_empty() {
        bail!(
            "no archives matching {:?} under {}",
            include_globs,
            input.display()
        );
    }
    Ok(archives)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
