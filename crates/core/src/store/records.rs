//! Character record operations on [`RecordDb`].

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::{params, rusqlite};

use super::{RecordDb, RecordStore, StoreError};
use crate::record::{Record, RecordSummary};
use crate::snapshot::CharacterSnapshot;

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(id: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt { id: id.to_string(), reason: format!("last_refreshed_at: {e}") })
}

fn encode_snapshot(id: &str, snapshot: &CharacterSnapshot) -> Result<String, StoreError> {
    serde_json::to_string(snapshot)
        .map_err(|e| StoreError::Corrupt { id: id.to_string(), reason: format!("snapshot encode: {e}") })
}

#[async_trait]
impl RecordStore for RecordDb {
    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Record>, StoreError> {
                let result = conn.query_row(
                    "SELECT snapshot_json, last_refreshed_at FROM characters WHERE id = ?1",
                    params![id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                );

                let (snapshot_json, refreshed_at) = match result {
                    Ok(row) => row,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };

                let snapshot = serde_json::from_str(&snapshot_json)
                    .map_err(|e| StoreError::Corrupt { id: id.clone(), reason: format!("snapshot decode: {e}") })?;
                let last_refreshed_at = parse_timestamp(&id, &refreshed_at)?;

                Ok(Some(Record { id, snapshot, last_refreshed_at }))
            })
            .await
            .map_err(StoreError::from)
    }

    async fn insert(&self, record: &Record) -> Result<(), StoreError> {
        let id = record.id.clone();
        let snapshot_json = encode_snapshot(&id, &record.snapshot)?;
        let refreshed_at = format_timestamp(record.last_refreshed_at);
        self.conn
            .call(move |conn| -> Result<(), StoreError> {
                conn.execute(
                    "INSERT INTO characters (id, snapshot_json, last_refreshed_at) VALUES (?1, ?2, ?3)",
                    params![id, snapshot_json, refreshed_at],
                )
                .map_err(|e| {
                    if StoreError::is_constraint_violation(&e) {
                        StoreError::DuplicateKey(id.clone())
                    } else {
                        StoreError::from(e)
                    }
                })?;
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }

    async fn replace_snapshot(
        &self, id: &str, snapshot: &CharacterSnapshot, refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let id = id.to_string();
        let snapshot_json = encode_snapshot(&id, snapshot)?;
        let refreshed_at = format_timestamp(refreshed_at);
        self.conn
            .call(move |conn| -> Result<(), StoreError> {
                let updated = conn.execute(
                    "UPDATE characters SET snapshot_json = ?2, last_refreshed_at = ?3 WHERE id = ?1",
                    params![id, snapshot_json, refreshed_at],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound(id));
                }
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }

    async fn list(&self, limit: usize) -> Result<Vec<RecordSummary>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<Vec<RecordSummary>, StoreError> {
                let mut stmt = conn.prepare(
                    "SELECT id, last_refreshed_at FROM characters
                     ORDER BY last_refreshed_at DESC, id ASC
                     LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(params![limit], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;

                rows.into_iter()
                    .map(|(id, raw)| {
                        let last_refreshed_at = parse_timestamp(&id, &raw)?;
                        Ok(RecordSummary { id, last_refreshed_at })
                    })
                    .collect()
            })
            .await
            .map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use crate::test_support::sample_snapshot;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = RecordDb::open_in_memory().await.unwrap();
        let record = Record::new("Testchar", sample_snapshot("Testchar", "sorceress", 42), record::now());

        db.insert(&record).await.unwrap();

        let found = db.find("Testchar").await.unwrap().unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let db = RecordDb::open_in_memory().await.unwrap();
        assert!(db.find("Nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_duplicate_key() {
        let db = RecordDb::open_in_memory().await.unwrap();
        let record = Record::new("Testchar", sample_snapshot("Testchar", "sorceress", 1), record::now());

        db.insert(&record).await.unwrap();
        let err = db.insert(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(id) if id == "Testchar"));
    }

    #[tokio::test]
    async fn test_replace_snapshot() {
        let db = RecordDb::open_in_memory().await.unwrap();
        let then = record::now() - TimeDelta::minutes(10);
        db.insert(&Record::new("Testchar", sample_snapshot("Testchar", "sorceress", 10), then))
            .await
            .unwrap();

        let now = record::now();
        db.replace_snapshot("Testchar", &sample_snapshot("Testchar", "sorceress", 11), now)
            .await
            .unwrap();

        let found = db.find("Testchar").await.unwrap().unwrap();
        assert_eq!(found.snapshot.header.level, 11);
        assert_eq!(found.last_refreshed_at, now);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let db = RecordDb::open_in_memory().await.unwrap();
        let err = db
            .replace_snapshot("Nobody", &sample_snapshot("Nobody", "amazon", 1), record::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_reported() {
        let db = RecordDb::open_in_memory().await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO characters (id, snapshot_json, last_refreshed_at) VALUES ('Broken', '{', ?1)",
                    params![format_timestamp(Utc::now())],
                )
            })
            .await
            .unwrap();

        let err = db.find("Broken").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { id, .. } if id == "Broken"));
    }

    #[tokio::test]
    async fn test_list_orders_by_refresh_time() {
        let db = RecordDb::open_in_memory().await.unwrap();
        let now = record::now();
        for (offset, name) in [(3, "Oldest"), (1, "Newest"), (2, "Middle")] {
            db.insert(&Record::new(name, sample_snapshot(name, "paladin", 1), now - TimeDelta::minutes(offset)))
                .await
                .unwrap();
        }

        let ids: Vec<_> = db.list(10).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["Newest", "Middle", "Oldest"]);

        assert_eq!(db.list(1).await.unwrap().len(), 1);
    }
}
