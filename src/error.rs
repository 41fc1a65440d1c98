use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// 客户端统一错误类型。
/// 本地前置校验、远端错误信封、传输失败与解码失败分属不同分支，调用方可按需匹配。
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("not a file")]
    NotAFile,

    #[error("empty file")]
    EmptyFile,

    #[error("children has no next page")]
    NoNextPage,

    #[error("async job not finished")]
    NotFinished,

    #[error("download url not found")]
    DownloadUrlNotFound,

    #[error("{0}")]
    Remote(RemoteError),

    #[error("graph api returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read upload source: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload source ended early: expected {expected} bytes, read {actual}")]
    TruncatedSource { expected: u64, actual: u64 },

    #[error("all bytes sent but session still expects ranges {next_expected_ranges:?}")]
    SessionIncomplete { next_expected_ranges: Vec<String> },

    #[error("upload session expired at {expiration}")]
    SessionExpired { expiration: String },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GraphError {
    /// 调用方主动取消或截止时间到达。
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GraphError::Cancelled | GraphError::DeadlineExceeded)
    }

    /// 远端错误码（如 `itemNotFound`），非远端错误返回 None。
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            GraphError::Remote(err) => Some(err.code.as_str()),
            _ => None,
        }
    }
}

/// Graph 错误信封中的 `error` 对象。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub localized_message: Option<String>,
    #[serde(default)]
    pub inner_error: Option<InnerError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InnerError {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "request-id", default)]
    pub request_id: Option<String>,
    #[serde(rename = "client-request-id", default)]
    pub client_request_id: Option<String>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.inner_error.as_ref().and_then(|inner| inner.date.as_deref());
        match date {
            Some(date) => write!(f, "{}-{} ({})", self.code, self.message, date),
            None => write!(f, "{}-{}", self.code, self.message),
        }
    }
}

/// 响应体外层结构，仅用于探测 `error` 字段是否存在。
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl ErrorEnvelope {
    pub(crate) fn into_error(self) -> Option<GraphError> {
        self.error.map(GraphError::Remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display_includes_inner_date() {
        let body = r#"{"error":{"code":"itemNotFound","message":"Item does not exist",
            "innerError":{"date":"2024-01-02T03:04:05","request-id":"r1"}}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        let err = envelope.into_error().unwrap();
        assert_eq!(err.to_string(), "itemNotFound-Item does not exist (2024-01-02T03:04:05)");
        assert_eq!(err.remote_code(), Some("itemNotFound"));
    }

    #[test]
    fn remote_error_display_without_inner() {
        let body = r#"{"error":{"code":"accessDenied","message":"nope"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.into_error().unwrap().to_string(), "accessDenied-nope");
    }

    #[test]
    fn success_body_has_no_envelope() {
        let envelope: ErrorEnvelope = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert!(envelope.into_error().is_none());
    }

    #[test]
    fn cancellation_kinds() {
        assert!(GraphError::Cancelled.is_cancellation());
        assert!(GraphError::DeadlineExceeded.is_cancellation());
        assert!(!GraphError::NotFinished.is_cancellation());
    }
}
