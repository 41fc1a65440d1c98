use crate::error::GraphResult;

/// 为需要认证的 Graph 请求提供 access token。
/// 令牌的获取与刷新不在本库范围内，由调用方实现。
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> GraphResult<String>;
}

/// 固定令牌，适合脚本或测试。
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> GraphResult<String> {
        Ok(self.0.clone())
    }
}

impl<F> TokenSource for F
where
    F: Fn() -> GraphResult<String> + Send + Sync,
{
    fn access_token(&self) -> GraphResult<String> {
        self()
    }
}
