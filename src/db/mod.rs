mod settings;
mod upload_sessions;

use crate::error::{GraphError, GraphResult};
use directories::ProjectDirs;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

pub use settings::{get_setting, set_setting};
pub use upload_sessions::{
    delete_upload_session, load_upload_session, load_upload_sessions, upsert_upload_session,
    UploadSessionRecord,
};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Skydrivex";
const APPLICATION: &str = "Skydrivex";
const DB_FILE_NAME: &str = "client.db";

/// SQLite 数据库位置。每次操作按需打开连接并确保表结构存在，
/// 因此该句柄可以随意克隆、跨线程传递。
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> GraphResult<Self> {
        let db = Self {
            path: path.as_ref().to_path_buf(),
        };
        db.with_connection(|_| Ok(()))?;
        Ok(db)
    }

    /// 使用系统应用数据目录下的默认数据库文件。
    pub fn open_default() -> GraphResult<Self> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
            GraphError::Config("failed to resolve application data directory".to_string())
        })?;
        Self::open(dirs.data_dir().join(DB_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn with_connection<T, F>(&self, operation: F) -> GraphResult<T>
    where
        F: FnOnce(&Connection) -> GraphResult<T>,
    {
        let conn = self.open_connection()?;
        operation(&conn)
    }

    fn open_connection(&self) -> GraphResult<Connection> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                GraphError::Config(format!("failed to create database directory {dir:?}: {e}"))
            })?;
        }
        debug!(path = %self.path.display(), "opening sqlite database");
        let conn = Connection::open(&self.path)?;
        apply_migrations(&conn)?;
        Ok(conn)
    }
}

fn apply_migrations(conn: &Connection) -> GraphResult<()> {
    conn.execute_batch(settings::SETTINGS_TABLE_SCHEMA)?;
    conn.execute_batch(upload_sessions::UPLOAD_SESSION_TABLE_SCHEMA)?;
    Ok(())
}

pub(crate) fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or(0)
}
