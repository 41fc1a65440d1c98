use super::handle::ItemHandle;
use crate::api::http::{Auth, Request};
use crate::cancel::CancelToken;
use crate::error::{GraphError, GraphResult};
use std::io::Write;
use tracing::info;
use url::Url;

impl ItemHandle {
    /// 把文件内容写入 `sink`，返回写入的字节数。
    /// - 优先使用快照中的 `@microsoft.graph.downloadUrl`，该地址已预授权，不带令牌；
    /// - 否则请求 `/content` 并跟随 302 跳转。
    /// - 文件夹没有内容可下载，返回 `DownloadUrlNotFound`。
    pub fn download(&self, sink: &mut dyn Write, cancel: &CancelToken) -> GraphResult<u64> {
        if self.item.is_folder() {
            return Err(GraphError::DownloadUrlNotFound);
        }
        let (url, auth) = match self.item.download_url.as_deref().filter(|u| !u.is_empty()) {
            Some(link) => (Url::parse(link)?, Auth::None),
            None => (
                self.core.urls.content(&self.drive.id, &self.item.id)?,
                Auth::Bearer,
            ),
        };
        cancel.check()?;
        let written = self
            .core
            .transport
            .download(&Request::get(url), auth, sink, cancel)?;
        info!(item = %self.item.id, bytes = written, "download finished");
        Ok(written)
    }
}
