use crate::error::GraphResult;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

/// 请求体：无、JSON，或带字节区间的上传分片。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Fragment {
        start: u64,
        total: u64,
        bytes: Vec<u8>,
    },
}

/// 与具体 HTTP 实现无关的请求描述，Transport 负责真正发送。
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    url: Url,
    body: RequestBody,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: Method::DELETE,
            url,
            body: RequestBody::Empty,
        }
    }

    pub fn json<B: Serialize + ?Sized>(method: Method, url: Url, body: &B) -> GraphResult<Self> {
        Ok(Self {
            method,
            url,
            body: RequestBody::Json(serde_json::to_vec(body)?),
        })
    }

    /// 分片 PUT：`Content-Range: bytes {start}-{end}/{total}`，end 为闭区间。
    pub fn fragment(url: Url, start: u64, total: u64, bytes: Vec<u8>) -> Self {
        Self {
            method: Method::PUT,
            url,
            body: RequestBody::Fragment { start, total, bytes },
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn body_bytes(&self) -> &[u8] {
        match &self.body {
            RequestBody::Empty => &[],
            RequestBody::Json(bytes) => bytes,
            RequestBody::Fragment { bytes, .. } => bytes,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.body, RequestBody::Fragment { .. })
    }

    pub fn content_range(&self) -> Option<String> {
        match &self.body {
            RequestBody::Fragment { start, total, bytes } if !bytes.is_empty() => {
                let end = start + bytes.len() as u64 - 1;
                Some(format!("bytes {start}-{end}/{total}"))
            }
            _ => None,
        }
    }

    /// 该请求在线路上携带的全部头部（不含认证头）。
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match &self.body {
            RequestBody::Empty => {
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
            }
            RequestBody::Json(_) => {
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            RequestBody::Fragment { bytes, .. } => {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len() as u64));
                if let Some(range) = self.content_range() {
                    if let Ok(value) = HeaderValue::from_str(&range) {
                        headers.insert(CONTENT_RANGE, value);
                    }
                }
            }
        }
        headers
    }
}
