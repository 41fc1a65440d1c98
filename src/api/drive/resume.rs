use super::{
    client::OneDriveClient,
    fragment::FragmentReader,
    handle::ItemHandle,
    models::{UploadSession, UploadSessionStatus},
    source::UploadSource,
    upload::{FragmentedUpload, UploadHooks},
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::db::{current_timestamp_millis, UploadSessionRecord};
use crate::error::{GraphError, GraphResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Seek, SeekFrom};
use tracing::{info, instrument};
use url::Url;

/// 续传所需的全部信息，可序列化后自行保存，或交给 [`crate::UploadStore`]。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeToken {
    pub task_id: String,
    pub file_name: String,
    pub drive_id: String,
    pub parent_id: String,
    pub upload_url: String,
    pub expiration: Option<String>,
    pub source_size: u64,
    pub bytes_sent: u64,
}

impl ResumeToken {
    pub(crate) fn new(
        parent: &ItemHandle,
        file_name: &str,
        session: &UploadSession,
        source_size: u64,
    ) -> Self {
        Self {
            task_id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            drive_id: parent.drive.id.clone(),
            parent_id: parent.item.id.clone(),
            upload_url: session.upload_url.clone(),
            expiration: session.expiration_date_time.clone(),
            source_size,
            bytes_sent: 0,
        }
    }

    /// 过期时间无法解析或缺失时视为未过期，由服务端最终裁决。
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|expiration| expiration.with_timezone(&Utc) <= now)
            .unwrap_or(false)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl From<&ResumeToken> for UploadSessionRecord {
    fn from(token: &ResumeToken) -> Self {
        UploadSessionRecord {
            task_id: token.task_id.clone(),
            file_name: token.file_name.clone(),
            drive_id: token.drive_id.clone(),
            parent_id: token.parent_id.clone(),
            upload_url: token.upload_url.clone(),
            expiration: token.expiration.clone(),
            source_size: i64::try_from(token.source_size).unwrap_or(i64::MAX),
            bytes_sent: i64::try_from(token.bytes_sent).unwrap_or(i64::MAX),
            updated_at_millis: current_timestamp_millis(),
        }
    }
}

impl From<UploadSessionRecord> for ResumeToken {
    fn from(record: UploadSessionRecord) -> Self {
        ResumeToken {
            task_id: record.task_id,
            file_name: record.file_name,
            drive_id: record.drive_id,
            parent_id: record.parent_id,
            upload_url: record.upload_url,
            expiration: record.expiration,
            source_size: u64::try_from(record.source_size).unwrap_or(0),
            bytes_sent: u64::try_from(record.bytes_sent).unwrap_or(0),
        }
    }
}

impl OneDriveClient {
    /// 按令牌中记录的 drive 与父目录构造续传目标，不发请求。
    pub fn resume_target(&self, token: &ResumeToken) -> ItemHandle {
        self.drive_ref(token.drive_id.clone())
            .item_ref(token.parent_id.clone())
    }
}

impl ItemHandle {
    pub fn resume_upload<S: UploadSource + Seek>(
        &self,
        file: &mut S,
        token: &ResumeToken,
        cancel: &CancelToken,
    ) -> GraphResult<ItemHandle> {
        self.resume_upload_with_hooks(file, token, cancel, UploadHooks::default())
    }

    /// 继续一个未完成的上传会话：
    /// 1. 拒绝已过期的会话；
    /// 2. 不带令牌 `GET {uploadUrl}`，取 `nextExpectedRanges` 第一个区间的起点；
    /// 3. 数据源定位到该偏移后沿用同一分片循环。
    #[instrument(skip_all, fields(task_id = %token.task_id, file = %token.file_name))]
    pub fn resume_upload_with_hooks<S: UploadSource + Seek>(
        &self,
        file: &mut S,
        token: &ResumeToken,
        cancel: &CancelToken,
        hooks: UploadHooks<'_>,
    ) -> GraphResult<ItemHandle> {
        if file.is_dir() {
            return Err(GraphError::NotAFile);
        }
        let source_size = file.size();
        if source_size == 0 {
            return Err(GraphError::EmptyFile);
        }
        if source_size != token.source_size {
            return Err(GraphError::Config(format!(
                "source size {source_size} does not match the recorded upload size {}",
                token.source_size
            )));
        }
        if token.is_expired() {
            return Err(GraphError::SessionExpired {
                expiration: token.expiration.clone().unwrap_or_default(),
            });
        }

        let target = Url::parse(&token.upload_url)?;
        let status: UploadSessionStatus =
            self.core
                .send(&Request::get(target.clone()), Auth::None, cancel)?;
        let offset = status.next_expected_offset().unwrap_or(token.bytes_sent);
        if offset >= source_size {
            return Err(GraphError::SessionIncomplete {
                next_expected_ranges: status.next_expected_ranges,
            });
        }
        file.seek(SeekFrom::Start(offset))?;
        info!(offset, total = source_size, "resuming upload session");

        let mut token = token.clone();
        token.bytes_sent = offset;
        if status.expiration_date_time.is_some() {
            token.expiration = status.expiration_date_time;
        }
        let reader = FragmentReader::starting_at(
            file,
            source_size,
            self.core.config.fragment_size,
            offset,
        );
        FragmentedUpload::new(reader, target, token).run(self, cancel, hooks)
    }
}
