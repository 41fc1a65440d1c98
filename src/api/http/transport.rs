use super::request::{Request, RequestBody};
use super::response::RawResponse;
use crate::api::auth::TokenSource;
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::{GraphError, GraphResult};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{
    blocking::{Client, RequestBuilder},
    redirect::Policy,
    StatusCode,
};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 是否附带 bearer 令牌。上传会话 URL 自带授权，分片 PUT 使用 `None`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    None,
}

/// 一次 HTTP 往返。实现需要在发送前检查取消信号，
/// 并在传输失败时让取消原因优先于传输错误。
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: &Request,
        auth: Auth,
        cancel: &CancelToken,
    ) -> GraphResult<RawResponse>;

    /// 把响应体写入 `sink`，返回写入字节数。默认实现先整体读入内存。
    fn download(
        &self,
        request: &Request,
        auth: Auth,
        sink: &mut dyn Write,
        cancel: &CancelToken,
    ) -> GraphResult<u64> {
        let response = self.execute(request, auth, cancel)?;
        ensure_download_status(response.status)?;
        sink.write_all(&response.body)?;
        Ok(response.body.len() as u64)
    }
}

pub(crate) fn ensure_download_status(status: StatusCode) -> GraphResult<()> {
    if status == StatusCode::OK || status == StatusCode::PARTIAL_CONTENT {
        Ok(())
    } else {
        Err(GraphError::UnexpectedStatus {
            status: status.as_u16(),
        })
    }
}

/// 基于 reqwest 阻塞客户端的默认实现。
pub struct BlockingTransport {
    client: Client,
    tokens: Arc<dyn TokenSource>,
    request_timeout: Duration,
    upload_timeout: Duration,
    download_timeout: Duration,
}

impl BlockingTransport {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> GraphResult<Self> {
        Ok(Self {
            client: build_blocking_client(config.max_redirects)?,
            tokens,
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
            download_timeout: config.download_timeout,
        })
    }

    fn prepare(
        &self,
        request: &Request,
        auth: Auth,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> GraphResult<RequestBuilder> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .timeout(cancel.cap_timeout(timeout));
        for (name, value) in request.headers().iter() {
            // 定长 body 会自动写入 Content-Length
            if name == CONTENT_LENGTH {
                continue;
            }
            builder = builder.header(name, value);
        }
        if auth == Auth::Bearer {
            builder = builder.bearer_auth(self.tokens.access_token()?);
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) | RequestBody::Fragment { bytes, .. } => {
                builder.body(bytes.clone())
            }
        };
        Ok(builder)
    }

    fn timeout_for(&self, request: &Request) -> Duration {
        if request.is_fragment() {
            self.upload_timeout
        } else {
            self.request_timeout
        }
    }
}

impl Transport for BlockingTransport {
    fn execute(
        &self,
        request: &Request,
        auth: Auth,
        cancel: &CancelToken,
    ) -> GraphResult<RawResponse> {
        cancel.check()?;
        debug!(method = %request.method(), url = %request.url(), ?auth, "sending graph request");
        let builder = self.prepare(request, auth, self.timeout_for(request), cancel)?;
        let response = builder.send().map_err(|e| transport_error(e, cancel))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(|e| transport_error(e, cancel))?;
        debug!(status = status.as_u16(), bytes = body.len(), "graph response received");
        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn download(
        &self,
        request: &Request,
        auth: Auth,
        sink: &mut dyn Write,
        cancel: &CancelToken,
    ) -> GraphResult<u64> {
        cancel.check()?;
        debug!(url = %request.url(), ?auth, "starting download");
        let builder = self.prepare(request, auth, self.download_timeout, cancel)?;
        let mut response = builder.send().map_err(|e| transport_error(e, cancel))?;
        ensure_download_status(response.status())?;
        let copied = io::copy(&mut response, sink).map_err(|e| {
            if let Err(reason) = cancel.check() {
                return reason;
            }
            GraphError::Io(e)
        })?;
        sink.flush()?;
        Ok(copied)
    }
}

/// 构建一个带有统一重定向策略的阻塞式 HTTP 客户端；超时按请求单独设置。
fn build_blocking_client(max_redirects: usize) -> GraphResult<Client> {
    Ok(Client::builder()
        .redirect(Policy::limited(max_redirects))
        .build()?)
}

fn transport_error(err: reqwest::Error, cancel: &CancelToken) -> GraphError {
    match cancel.check() {
        Err(reason) => reason,
        Ok(()) => GraphError::Http(err),
    }
}
