use super::handle::ItemHandle;
use crate::api::http::{Auth, NoContent, Request};
use crate::cancel::CancelToken;
use crate::error::GraphResult;
use tracing::info;

impl ItemHandle {
    /// 删除当前项目（进入回收站）。成功时服务端返回 204。
    pub fn delete(&self, cancel: &CancelToken) -> GraphResult<()> {
        let url = self.core.urls.item(&self.drive.id, &self.item.id)?;
        let _: NoContent = self.core.send(&Request::delete(url), Auth::Bearer, cancel)?;
        info!(item = %self.item.id, "deleted drive item");
        Ok(())
    }
}
