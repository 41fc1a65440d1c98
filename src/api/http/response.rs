use crate::error::{ErrorEnvelope, GraphError, GraphResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Transport 返回的原始响应：状态码、头部与完整响应体。
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 非法的头部名或值会被忽略。
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            self.headers.insert(name, value);
        }
        self
    }
}

/// 声明式的「响应头 -> 字段」映射项。
pub struct HeaderField<T> {
    pub header: &'static str,
    pub assign: fn(&mut T, String),
}

/// 可被 [`decode`] 解析的响应结构。
/// JSON 字段由 serde 处理；需要从响应头取值的字段在 `HEADER_FIELDS` 中登记。
pub trait ResponseShape: DeserializeOwned + Default + 'static {
    const HEADER_FIELDS: &'static [HeaderField<Self>] = &[];
}

/// 没有响应体的操作（DELETE 等）使用的占位结构。
#[derive(Debug, Default, serde::Deserialize)]
pub struct NoContent {}

impl ResponseShape for NoContent {}

/// 通用解码流程：
/// 1. 响应体存在错误信封时直接返回远端错误；
/// 2. 非 2xx 且无信封时返回 `UnexpectedStatus`；
/// 3. 204 或空响应体跳过 JSON 解码；
/// 4. 最后按登记表把响应头写入字段。
pub fn decode<T: ResponseShape>(response: &RawResponse) -> GraphResult<T> {
    if !response.body.is_empty() {
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&response.body) {
            if let Some(err) = envelope.into_error() {
                warn!(
                    status = response.status.as_u16(),
                    error = %err,
                    "graph api returned an error"
                );
                return Err(err);
            }
        }
    }
    if !response.status.is_success() {
        return Err(GraphError::UnexpectedStatus {
            status: response.status.as_u16(),
        });
    }

    let mut target = if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
        T::default()
    } else {
        serde_json::from_slice(&response.body)?
    };

    for field in T::HEADER_FIELDS {
        let value = response
            .headers
            .get(field.header)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());
        if let Some(value) = value {
            (field.assign)(&mut target, value.to_string());
        }
    }
    Ok(target)
}
