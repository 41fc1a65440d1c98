use super::{
    client::Core,
    handle::ItemHandle,
    models::{ChildrenPage, Drive},
};
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::{GraphError, GraphResult};
use std::sync::Arc;
use url::Url;

impl ItemHandle {
    /// 拉取当前文件夹的第一页子项。
    pub fn list_children(&self, cancel: &CancelToken) -> GraphResult<Children> {
        let url = self.core.urls.children(&self.drive.id, &self.item.id)?;
        let page: ChildrenPage = self.core.send(&Request::get(url), Auth::Bearer, cancel)?;
        Ok(Children::new(self.core.clone(), page, self.drive.clone()))
    }
}

/// 子项列表的一页，`items` 中的句柄与父项共享同一底座。
pub struct Children {
    core: Arc<Core>,
    next_link: Option<String>,
    drive: Drive,
    pub items: Vec<ItemHandle>,
}

impl Children {
    fn new(core: Arc<Core>, page: ChildrenPage, drive: Drive) -> Self {
        let items = page
            .value
            .into_iter()
            .map(|item| ItemHandle::new(core.clone(), item, drive.clone()))
            .collect();
        Self {
            core,
            next_link: page.next_link.filter(|link| !link.is_empty()),
            drive,
            items,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_link.is_some()
    }

    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// 按 `@odata.nextLink` 拉取下一页。
    /// 没有下一页时直接返回 `NoNextPage`，不发请求。
    pub fn next(&self, cancel: &CancelToken) -> GraphResult<Children> {
        let link = self.next_link.as_deref().ok_or(GraphError::NoNextPage)?;
        let url = Url::parse(link)?;
        let page: ChildrenPage = self.core.send(&Request::get(url), Auth::Bearer, cancel)?;
        Ok(Children::new(self.core.clone(), page, self.drive.clone()))
    }
}
