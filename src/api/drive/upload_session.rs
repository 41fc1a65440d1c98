use super::{handle::ItemHandle, models::UploadSession, ConflictBehavior};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::GraphResult;
use reqwest::Method;
use serde::Serialize;
use tracing::info;

impl ItemHandle {
    /// 在当前文件夹下为 `file_name` 创建上传会话。
    /// - 文件名中的替换字符改为 `x` 后作为单个路径段编码；
    /// - 重名时由服务端自动改名。
    pub fn create_upload_session(
        &self,
        file_name: &str,
        cancel: &CancelToken,
    ) -> GraphResult<UploadSession> {
        let url = self
            .core
            .urls
            .upload_session(&self.drive.id, &self.item.id, file_name)?;
        let request = Request::json(Method::POST, url, &CreateSessionRequest::default())?;
        let session: UploadSession = self.core.send(&request, Auth::Bearer, cancel)?;
        info!(
            parent = %self.item.id,
            file = file_name,
            expiration = ?session.expiration_date_time,
            "upload session created"
        );
        Ok(session)
    }
}

#[derive(Debug, Default, Serialize)]
struct CreateSessionRequest {
    item: SessionItem,
}

#[derive(Debug, Default, Serialize)]
struct SessionItem {
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    conflict_behavior: ConflictBehavior,
}
