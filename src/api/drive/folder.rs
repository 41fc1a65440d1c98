use super::{
    handle::ItemHandle,
    models::{DriveItem, FolderFacet},
    ConflictBehavior,
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::GraphResult;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

impl ItemHandle {
    /// 在当前文件夹下新建子文件夹；重名时由服务端自动改名。
    pub fn create_folder(
        &self,
        folder_name: &str,
        cancel: &CancelToken,
    ) -> GraphResult<ItemHandle> {
        let url = self.core.urls.children(&self.drive.id, &self.item.id)?;
        let body = CreateFolderRequest::new(folder_name);
        let request = Request::json(Method::POST, url, &body)?;
        let item: DriveItem = self.core.send(&request, Auth::Bearer, cancel)?;
        debug!(parent = %self.item.id, folder = %item.id, "created folder");
        Ok(self.wrap(item))
    }
}

#[derive(Debug, Serialize)]
struct CreateFolderRequest<'a> {
    name: &'a str,
    folder: FolderFacet,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    conflict_behavior: ConflictBehavior,
}

impl<'a> CreateFolderRequest<'a> {
    fn new(name: &'a str) -> Self {
        CreateFolderRequest {
            name,
            folder: FolderFacet::default(),
            conflict_behavior: ConflictBehavior::Rename,
        }
    }
}
