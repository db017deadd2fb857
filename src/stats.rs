//! Output-store overview.
//!
//! Gives a quick summary of what a conversion produced: document counts,
//! store size, newest insert, and a per-content-type breakdown. Used by
//! `warcn stats` to sanity-check a batch without opening the database by
//! hand.

use anyhow::Result;
use sqlx::Row;
use std::path::Path;

use crate::db;

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(output: &Path) -> Result<()> {
    if !output.exists() {
        anyhow::bail!("output store does not exist: {}", output.display());
    }
    let pool = db::connect(output).await?;

    let total_docs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&pool)
        .await?;

    let distinct_urls: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT url) FROM documents")
        .fetch_one(&pool)
        .await?;

    let newest: Option<i64> = sqlx::query_scalar("SELECT MAX(stored_at) FROM documents")
        .fetch_one(&pool)
        .await?;

    let store_size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);

    println!("warc-normalizer — Store Stats");
    println!("=============================");
    println!();
    println!("  Store:       {}", output.display());
    println!("  Size:        {}", format_bytes(store_size));
    println!();
    println!("  Documents:   {}", total_docs);
    println!("  Unique urls: {}", distinct_urls);
    println!(
        "  Last write:  {}",
        match newest {
            Some(ts) => format_ts_relative(ts),
            None => "never".to_string(),
        }
    );

    let type_rows = sqlx::query(
        r#"
        SELECT COALESCE(content_type, '(none)') AS content_type, COUNT(*) AS doc_count
        FROM documents
        GROUP BY content_type
        ORDER BY doc_count DESC
        LIMIT 20
        "#,
    )
    .fetch_all(&pool)
    .await?;

    if !type_rows.is_empty() {
        println!();
        println!("  By content type:");
        println!("  {:<40} {:>8}", "CONTENT TYPE", "DOCS");
        println!("  {}", "-".repeat(50));
        for row in &type_rows {
            let content_type: String = row.get("content_type");
            let doc_count: i64 = row.get("doc_count");
            println!("  {:<40} {:>8}", content_type, doc_count);
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
