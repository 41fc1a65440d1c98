use super::{
    client::Core,
    handle::{DriveHandle, ItemHandle},
    models::{AsyncJobLocation, AsyncJobStatus, Drive},
    move_item::RelocateRequest,
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::{GraphError, GraphResult};
use reqwest::Method;
use std::sync::Arc;
use tracing::debug;
use url::Url;

impl ItemHandle {
    /// 复制到 `new_parent` 下，可选新名称。
    /// 复制在服务端异步进行，返回的 [`AsyncJob`] 用于轮询进度与获取结果。
    pub fn copy(
        &self,
        new_parent: &ItemHandle,
        new_name: Option<&str>,
        cancel: &CancelToken,
    ) -> GraphResult<AsyncJob> {
        let url = self.core.urls.copy(&self.drive.id, &self.item.id)?;
        let body = RelocateRequest::new(new_parent, new_name);
        let request = Request::json(Method::POST, url, &body)?;
        let location: AsyncJobLocation = self.core.send(&request, Auth::Bearer, cancel)?;
        let monitor_url = Url::parse(&location.monitor_url)?;
        debug!(item = %self.item.id, monitor = %monitor_url, "copy accepted");
        Ok(AsyncJob::new(self.core.clone(), monitor_url, self.drive.clone()))
    }
}

/// 服务端异步任务。最近一次查询到的状态会被缓存。
pub struct AsyncJob {
    core: Arc<Core>,
    monitor_url: Url,
    status: Option<AsyncJobStatus>,
    drive: Drive,
}

impl AsyncJob {
    pub(crate) fn new(core: Arc<Core>, monitor_url: Url, drive: Drive) -> Self {
        Self {
            core,
            monitor_url,
            status: None,
            drive,
        }
    }

    pub fn monitor_url(&self) -> &Url {
        &self.monitor_url
    }

    /// 最近一次查询到的状态，尚未查询时为 `None`。
    pub fn status(&self) -> Option<&AsyncJobStatus> {
        self.status.as_ref()
    }

    /// 已缓存 completed 状态时直接返回，否则查询一次。
    pub fn is_finished(&mut self, cancel: &CancelToken) -> GraphResult<bool> {
        if self.status.as_ref().is_some_and(AsyncJobStatus::is_completed) {
            return Ok(true);
        }
        Ok(self.refresh(cancel)?.is_completed())
    }

    /// 取复制生成的项目。只有尚无缓存状态时才会查询；
    /// 缓存状态不是 completed 时返回 `NotFinished`，需先调用 [`AsyncJob::is_finished`]。
    /// completed 但缺少 `resourceId` 时同样返回 `NotFinished`，不会请求空 id。
    pub fn get_resource(&mut self, cancel: &CancelToken) -> GraphResult<ItemHandle> {
        if self.status.is_none() {
            self.refresh(cancel)?;
        }
        let resource_id = self
            .status
            .as_ref()
            .filter(|status| status.is_completed())
            .and_then(|status| status.resource_id.clone())
            .filter(|id| !id.is_empty())
            .ok_or(GraphError::NotFinished)?;
        DriveHandle::new(self.core.clone(), self.drive.clone()).get(&resource_id, cancel)
    }

    fn refresh(&mut self, cancel: &CancelToken) -> GraphResult<&AsyncJobStatus> {
        let request = Request::get(self.monitor_url.clone());
        let status: AsyncJobStatus = self.core.send(&request, Auth::Bearer, cancel)?;
        debug!(
            monitor = %self.monitor_url,
            status = ?status.status,
            percentage = ?status.percentage_complete,
            "async job status"
        );
        Ok(&*self.status.insert(status))
    }
}
