//! Recording metadata index
//!
//! One row per (word, word type) pointing at a blob store file id.
//! Words are stored lowercase; the caller's casing never reaches the key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use vokab_common::{Result, WordType};

use crate::types::RecordingIndex;

/// A persisted (word, word type) → file id mapping
#[derive(Debug, Clone)]
pub struct RecordingRecord {
    pub word: String,
    pub word_type: WordType,
    pub file_id: String,
    pub created_at: DateTime<Utc>,
}

/// Index key form of a word
pub fn index_key(word: &str) -> String {
    word.to_lowercase()
}

/// SQLite-backed [`RecordingIndex`]
#[derive(Clone)]
pub struct SqliteRecordingIndex {
    pool: SqlitePool,
}

impl SqliteRecordingIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the full record for a key (diagnostics and tests)
    pub async fn load_record(&self, word: &str, word_type: WordType) -> Result<Option<RecordingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT word, word_type, file_id, created_at
            FROM pronunciation_recordings
            WHERE word = ? AND word_type = ?
            "#,
        )
        .bind(index_key(word))
        .bind(word_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let created_at_str: String = row.get("created_at");
                let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                    .map_err(|e| vokab_common::Error::CorruptRecord(format!("bad created_at: {}", e)))?
                    .with_timezone(&Utc);
                let word_type_str: String = row.get("word_type");

                Ok(Some(RecordingRecord {
                    word: row.get("word"),
                    word_type: WordType::from_db_str(&word_type_str),
                    file_id: row.get("file_id"),
                    created_at,
                }))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordingIndex for SqliteRecordingIndex {
    async fn lookup(&self, word: &str, word_type: WordType) -> Result<Option<String>> {
        if !word_type.is_classified() {
            return Ok(None);
        }

        let file_id: Option<(String,)> = sqlx::query_as(
            "SELECT file_id FROM pronunciation_recordings WHERE word = ? AND word_type = ?",
        )
        .bind(index_key(word))
        .bind(word_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(file_id.map(|(id,)| id))
    }

    async fn record(&self, word: &str, word_type: WordType, file_id: &str) -> Result<()> {
        if !word_type.is_classified() {
            return Err(vokab_common::Error::InvalidInput(format!(
                "cannot record '{}' without a word type",
                word
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO pronunciation_recordings (word, word_type, file_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(word, word_type) DO UPDATE SET
                file_id = excluded.file_id,
                created_at = excluded.created_at
            "#,
        )
        .bind(index_key(word))
        .bind(word_type.as_str())
        .bind(file_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_index() -> SqliteRecordingIndex {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        SqliteRecordingIndex::new(pool)
    }

    #[tokio::test]
    async fn test_lookup_missing_returns_none() {
        let index = test_index().await;
        assert_eq!(index.lookup("apple", WordType::Noun).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_record_then_lookup() {
        let index = test_index().await;
        index.record("apple", WordType::Noun, "file-1").await.unwrap();

        assert_eq!(
            index.lookup("apple", WordType::Noun).await.unwrap(),
            Some("file-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_lookup_is_type_exact() {
        let index = test_index().await;
        index.record("run", WordType::Verb, "file-verb").await.unwrap();

        assert_eq!(index.lookup("run", WordType::Noun).await.unwrap(), None);
        assert_eq!(
            index.lookup("run", WordType::Verb).await.unwrap(),
            Some("file-verb".to_string())
        );
    }

    #[tokio::test]
    async fn test_words_are_keyed_lowercase() {
        let index = test_index().await;
        index.record("Apple", WordType::Noun, "file-1").await.unwrap();

        assert_eq!(
            index.lookup("APPLE", WordType::Noun).await.unwrap(),
            Some("file-1".to_string())
        );
        let record = index.load_record("apple", WordType::Noun).await.unwrap().unwrap();
        assert_eq!(record.word, "apple");
        assert_eq!(record.word_type, WordType::Noun);
    }

    #[tokio::test]
    async fn test_record_last_write_wins() {
        let index = test_index().await;
        index.record("apple", WordType::Noun, "file-1").await.unwrap();
        index.record("apple", WordType::Noun, "file-2").await.unwrap();

        assert_eq!(
            index.lookup("apple", WordType::Noun).await.unwrap(),
            Some("file-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_unclassified_never_matches() {
        let index = test_index().await;
        assert!(index.record("apple", WordType::None, "file-1").await.is_err());
        assert_eq!(index.lookup("apple", WordType::None).await.unwrap(), None);
    }
}
