//! Append-only document sink backed by SQLite.
//!
//! Each emitted document becomes one row keyed by its url. The sink is
//! deliberately append-only: duplicate urls across records produce
//! duplicate rows, so the url column is indexed but not unique — dedup is
//! a downstream concern, not this converter's.

use anyhow::Result;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::models::NormalizedDocument;

/// Create the documents table and url index. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY,
            url TEXT NOT NULL,
            content_type TEXT,
            content BLOB NOT NULL,
            metadata_json TEXT NOT NULL DEFAULT '[]',
            digest TEXT NOT NULL,
            stored_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_url ON documents(url)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Append one document. Never updates or replaces existing rows.
pub async fn append_document(pool: &SqlitePool, doc: &NormalizedDocument) -> Result<()> {
    let mut hasher = Sha256::new();
    hasher.update(&doc.content);
    let digest = format!("{:x}", hasher.finalize());

    let metadata_json = doc.metadata.to_json().to_string();
    let stored_at = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO documents (url, content_type, content, metadata_json, digest, stored_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&doc.url)
    .bind(&doc.content_type)
    .bind(&doc.content)
    .bind(&metadata_json)
    .bind(&digest)
    .bind(stored_at)
    .execute(pool)
    .await?;

    Ok(())
}
