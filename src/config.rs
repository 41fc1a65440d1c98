use crate::db::Database;
use crate::error::{GraphError, GraphResult};
use crate::settings;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";
/// 默认分片大小 10 MiB。
pub const DEFAULT_FRAGMENT_SIZE: usize = 10 * 1024 * 1024;

/// 客户端配置。可以直接构造，也可以从调用方的配置文件反序列化（缺省字段取默认值）。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub graph_base: String,
    pub fragment_size: usize,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub upload_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub download_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            fragment_size: DEFAULT_FRAGMENT_SIZE,
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(120),
            download_timeout: Duration::from_secs(600),
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    pub fn with_graph_base(mut self, base: impl Into<String>) -> Self {
        self.graph_base = base.into();
        self
    }

    pub fn with_fragment_size(mut self, size: usize) -> Self {
        self.fragment_size = size;
        self
    }

    /// 用设置表中持久化的分片大小覆盖当前值。
    pub fn with_stored_settings(mut self, db: &Database) -> GraphResult<Self> {
        self.fragment_size = settings::get_upload_fragment_size(db)?;
        Ok(self)
    }

    pub fn validate(&self) -> GraphResult<()> {
        let base = Url::parse(&self.graph_base)?;
        if base.cannot_be_a_base() {
            return Err(GraphError::Config(format!(
                "graph base {} cannot carry a path",
                self.graph_base
            )));
        }
        if self.fragment_size == 0 {
            return Err(GraphError::Config(
                "fragment size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
