use super::{client::OneDriveClient, handle::DriveHandle, models::Drive};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::GraphResult;
use tracing::debug;

impl OneDriveClient {
    /// 获取当前用户的 OneDrive（包含配额与所有者）。
    /// - 请求：`GET /me/drive`
    pub fn my_drive(&self, cancel: &CancelToken) -> GraphResult<DriveHandle> {
        let request = Request::get(self.core.urls.my_drive()?);
        let drive: Drive = self.core.send(&request, Auth::Bearer, cancel)?;
        debug!(drive_id = %drive.id, drive_type = ?drive.drive_type, "resolved default drive");
        Ok(DriveHandle::new(self.core.clone(), drive))
    }

    /// 按已知的 drive id 构造句柄而不发请求。
    pub fn drive_ref(&self, drive_id: impl Into<String>) -> DriveHandle {
        let drive = Drive {
            id: drive_id.into(),
            ..Default::default()
        };
        DriveHandle::new(self.core.clone(), drive)
    }
}
