#![allow(dead_code)]

use reqwest::{Method, StatusCode};
use serde_json::Value;
use skydrivex_client::{
    Auth, CancelToken, ClientConfig, GraphResult, ItemHandle, OneDriveClient, RawResponse, Request,
    Transport,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE: &str = "https://graph.test/v1.0";
pub const UPLOAD_URL: &str = "https://upload.test/session/abc";

/// 一次被记录下来的请求。
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub url: String,
    pub auth: Auth,
    pub content_range: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// 按脚本依次返回响应并记录所有请求的假传输层。
/// 脚本耗尽后再收到请求会直接 panic。
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<Recorded>>,
    cancel_after: Mutex<Option<(usize, CancelToken)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: RawResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(RawResponse::json(StatusCode::from_u16(status).unwrap(), &body))
    }

    /// 第 `count` 个请求完成后触发取消。
    pub fn cancel_after(&self, count: usize, token: CancelToken) {
        *self.cancel_after.lock().unwrap() = Some((count, token));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Transport for FakeTransport {
    fn execute(
        &self,
        request: &Request,
        auth: Auth,
        cancel: &CancelToken,
    ) -> GraphResult<RawResponse> {
        cancel.check()?;
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(Recorded {
                method: request.method().clone(),
                url: request.url().to_string(),
                auth,
                content_range: request.content_range(),
                body: request.body_bytes().to_vec(),
            });
            requests.len()
        };
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                panic!(
                    "unexpected request #{count}: {} {}",
                    request.method(),
                    request.url()
                )
            });
        if let Some((after, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if count >= *after {
                token.cancel();
            }
        }
        Ok(response)
    }
}

pub fn client(transport: &Arc<FakeTransport>, fragment_size: usize) -> OneDriveClient {
    let config = ClientConfig::default()
        .with_graph_base(BASE)
        .with_fragment_size(fragment_size);
    OneDriveClient::with_transport(config, transport.clone()).unwrap()
}

/// 不发请求，直接构造 drive `d1` 下的文件夹 `p1`。
pub fn folder(client: &OneDriveClient) -> ItemHandle {
    client.drive_ref("d1").item_ref("p1")
}

pub fn session_created() -> Value {
    serde_json::json!({
        "uploadUrl": UPLOAD_URL,
        "expirationDateTime": "2999-01-01T00:00:00Z"
    })
}

pub fn progress(next: &str) -> Value {
    serde_json::json!({
        "expirationDateTime": "2999-01-01T00:00:00Z",
        "nextExpectedRanges": [next]
    })
}

pub fn completed(id: &str, name: &str, size: u64) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "size": size,
        "file": {"mimeType": "application/octet-stream"}
    })
}
