use super::{
    handle::{DriveHandle, ItemHandle},
    models::DriveItem,
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::GraphResult;

impl DriveHandle {
    /// 按路径获取项目；空路径（或只有 `/`）表示根目录。
    pub fn get_by_path(&self, path: &str, cancel: &CancelToken) -> GraphResult<ItemHandle> {
        let url = self.core.urls.item_by_path(&self.drive.id, path)?;
        let item: DriveItem = self.core.send(&Request::get(url), Auth::Bearer, cancel)?;
        Ok(ItemHandle::new(self.core.clone(), item, self.drive.clone()))
    }

    /// 按 id 获取项目的完整属性。
    pub fn get(&self, item_id: &str, cancel: &CancelToken) -> GraphResult<ItemHandle> {
        let url = self.core.urls.item(&self.drive.id, item_id)?;
        let item: DriveItem = self.core.send(&Request::get(url), Auth::Bearer, cancel)?;
        Ok(ItemHandle::new(self.core.clone(), item, self.drive.clone()))
    }
}
