use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::GraphResult;

pub(crate) const UPLOAD_SESSION_TABLE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS upload_sessions (
    task_id TEXT PRIMARY KEY,
    file_name TEXT NOT NULL,
    drive_id TEXT NOT NULL,
    parent_id TEXT NOT NULL,
    upload_url TEXT NOT NULL,
    expiration TEXT,
    source_size INTEGER NOT NULL,
    bytes_sent INTEGER NOT NULL,
    updated_at_millis INTEGER NOT NULL
);";

/// upload_sessions 表的一行，字段与 [`crate::ResumeToken`] 一一对应。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSessionRecord {
    pub task_id: String,
    pub file_name: String,
    pub drive_id: String,
    pub parent_id: String,
    pub upload_url: String,
    pub expiration: Option<String>,
    pub source_size: i64,
    pub bytes_sent: i64,
    pub updated_at_millis: i64,
}

pub fn upsert_upload_session(db: &Database, record: &UploadSessionRecord) -> GraphResult<()> {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO upload_sessions (
                task_id,
                file_name,
                drive_id,
                parent_id,
                upload_url,
                expiration,
                source_size,
                bytes_sent,
                updated_at_millis
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(task_id) DO UPDATE SET
                file_name = excluded.file_name,
                drive_id = excluded.drive_id,
                parent_id = excluded.parent_id,
                upload_url = excluded.upload_url,
                expiration = excluded.expiration,
                source_size = excluded.source_size,
                bytes_sent = excluded.bytes_sent,
                updated_at_millis = excluded.updated_at_millis",
            params![
                record.task_id,
                record.file_name,
                record.drive_id,
                record.parent_id,
                record.upload_url,
                record.expiration,
                record.source_size,
                record.bytes_sent,
                record.updated_at_millis,
            ],
        )?;
        Ok(())
    })
}

const SELECT_COLUMNS: &str = "SELECT
    task_id,
    file_name,
    drive_id,
    parent_id,
    upload_url,
    expiration,
    source_size,
    bytes_sent,
    updated_at_millis
FROM upload_sessions";

pub fn load_upload_sessions(db: &Database) -> GraphResult<Vec<UploadSessionRecord>> {
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY updated_at_millis ASC"))?;
        let rows = stmt
            .query_map([], map_upload_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn load_upload_session(
    db: &Database,
    task_id: &str,
) -> GraphResult<Option<UploadSessionRecord>> {
    db.with_connection(|conn| {
        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE task_id = ?"),
                params![task_id],
                map_upload_session,
            )
            .optional()?;
        Ok(record)
    })
}

pub fn delete_upload_session(db: &Database, task_id: &str) -> GraphResult<()> {
    db.with_connection(|conn| {
        conn.execute(
            "DELETE FROM upload_sessions WHERE task_id = ?",
            params![task_id],
        )?;
        Ok(())
    })
}

fn map_upload_session(row: &Row) -> rusqlite::Result<UploadSessionRecord> {
    Ok(UploadSessionRecord {
        task_id: row.get(0)?,
        file_name: row.get(1)?,
        drive_id: row.get(2)?,
        parent_id: row.get(3)?,
        upload_url: row.get(4)?,
        expiration: row.get(5)?,
        source_size: row.get(6)?,
        bytes_sent: row.get(7)?,
        updated_at_millis: row.get(8)?,
    })
}
