use super::{
    handle::ItemHandle,
    models::{DriveItem, ItemReference},
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::{GraphError, GraphResult};
use reqwest::Method;
use serde::Serialize;

impl ItemHandle {
    /// 将文件/文件夹移动到新父目录，并可选重命名。
    /// - 只支持同一 Drive 内移动，Graph 官方不支持跨 Drive。
    pub fn move_to(
        &self,
        new_parent: &ItemHandle,
        new_name: Option<&str>,
        cancel: &CancelToken,
    ) -> GraphResult<ItemHandle> {
        if new_name.map(|name| name.trim().is_empty()).unwrap_or(false) {
            return Err(GraphError::Config("new name cannot be empty string".to_string()));
        }
        let url = self.core.urls.item(&self.drive.id, &self.item.id)?;
        let body = RelocateRequest::new(new_parent, new_name);
        let request = Request::json(Method::PATCH, url, &body)?;
        let item: DriveItem = self.core.send(&request, Auth::Bearer, cancel)?;
        Ok(self.wrap(item))
    }

    /// 用 `patch` 中已设置的字段更新项目元数据（名称、描述等）。
    pub fn update(&self, patch: &DriveItem, cancel: &CancelToken) -> GraphResult<ItemHandle> {
        let url = self.core.urls.item(&self.drive.id, &self.item.id)?;
        let request = Request::json(Method::PATCH, url, patch)?;
        let item: DriveItem = self.core.send(&request, Auth::Bearer, cancel)?;
        Ok(self.wrap(item))
    }
}

/// 移动与复制共用的请求体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelocateRequest<'a> {
    parent_reference: ItemReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> RelocateRequest<'a> {
    pub(crate) fn new(parent: &ItemHandle, name: Option<&'a str>) -> Self {
        RelocateRequest {
            parent_reference: ItemReference {
                drive_id: Some(parent.drive.id.clone()).filter(|id| !id.is_empty()),
                id: Some(parent.item.id.clone()),
                ..Default::default()
            },
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::drive::models::Drive;
    use crate::api::drive::client::OneDriveClient;
    use crate::api::http::{RawResponse, Transport};
    use crate::config::ClientConfig;
    use serde_json::json;
    use std::sync::Arc;

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _: &Request, _: Auth, _: &CancelToken) -> GraphResult<RawResponse> {
            panic!("no request expected");
        }
    }

    fn parent() -> ItemHandle {
        let client =
            OneDriveClient::with_transport(ClientConfig::default(), Arc::new(Unreachable)).unwrap();
        let drive = Drive {
            id: "drive-1".into(),
            ..Default::default()
        };
        ItemHandle::new(
            client.core.clone(),
            DriveItem {
                id: "parent-1".into(),
                ..Default::default()
            },
            drive,
        )
    }

    #[test]
    fn relocate_body_references_parent_and_drive() {
        let body = serde_json::to_value(RelocateRequest::new(&parent(), Some("new.txt"))).unwrap();
        assert_eq!(
            body,
            json!({
                "parentReference": {"driveId": "drive-1", "id": "parent-1"},
                "name": "new.txt"
            })
        );
    }

    #[test]
    fn empty_new_name_is_rejected_locally() {
        let item = parent();
        let err = item
            .move_to(&parent(), Some("  "), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::Config(_)));
    }
}
