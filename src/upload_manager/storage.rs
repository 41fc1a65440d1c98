use crate::api::drive::ResumeToken;
use crate::db::{
    delete_upload_session, load_upload_session, load_upload_sessions, upsert_upload_session,
    Database, UploadSessionRecord,
};
use crate::error::GraphResult;
use tracing::debug;

/// 续传令牌持久化接口，方便替换存储实现或编写单测。
pub trait UploadStore: Send + Sync {
    fn load(&self) -> GraphResult<Vec<ResumeToken>>;
    fn get(&self, task_id: &str) -> GraphResult<Option<ResumeToken>>;
    fn upsert(&self, token: &ResumeToken) -> GraphResult<()>;
    fn remove(&self, task_id: &str) -> GraphResult<()>;

    /// 删除已过期的会话，返回删除数量。
    fn remove_expired(&self) -> GraphResult<usize> {
        let mut removed = 0;
        for token in self.load()? {
            if token.is_expired() {
                self.remove(&token.task_id)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// 默认的 SQLite 实现，数据写入 `upload_sessions` 表。
#[derive(Clone, Debug)]
pub struct SqliteUploadStore {
    db: Database,
}

impl SqliteUploadStore {
    pub fn new(db: Database) -> Self {
        SqliteUploadStore { db }
    }

    pub fn open_default() -> GraphResult<Self> {
        Ok(Self::new(Database::open_default()?))
    }
}

impl UploadStore for SqliteUploadStore {
    fn load(&self) -> GraphResult<Vec<ResumeToken>> {
        Ok(load_upload_sessions(&self.db)?
            .into_iter()
            .map(ResumeToken::from)
            .collect())
    }

    fn get(&self, task_id: &str) -> GraphResult<Option<ResumeToken>> {
        Ok(load_upload_session(&self.db, task_id)?.map(ResumeToken::from))
    }

    fn upsert(&self, token: &ResumeToken) -> GraphResult<()> {
        debug!(task_id = %token.task_id, bytes_sent = token.bytes_sent, "saving upload checkpoint");
        upsert_upload_session(&self.db, &UploadSessionRecord::from(token))
    }

    fn remove(&self, task_id: &str) -> GraphResult<()> {
        delete_upload_session(&self.db, task_id)
    }
}
