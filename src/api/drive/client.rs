use super::urls::GraphUrls;
use crate::api::auth::TokenSource;
use crate::api::http::{decode, Auth, BlockingTransport, Request, ResponseShape, Transport};
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::GraphResult;
use std::sync::Arc;

/// 所有资源句柄共享的底座：传输层、URL 构造器与配置。
pub struct Core {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) urls: GraphUrls,
    pub(crate) config: ClientConfig,
}

impl Core {
    /// 发送请求并按目标结构解码。
    pub(crate) fn send<T: ResponseShape>(
        &self,
        request: &Request,
        auth: Auth,
        cancel: &CancelToken,
    ) -> GraphResult<T> {
        cancel.check()?;
        let response = self.transport.execute(request, auth, cancel)?;
        decode(&response)
    }
}

/// 客户端入口。可廉价克隆，克隆体共享同一传输层。
#[derive(Clone)]
pub struct OneDriveClient {
    pub(crate) core: Arc<Core>,
}

impl OneDriveClient {
    /// 使用默认的 reqwest 阻塞传输层。
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenSource>) -> GraphResult<Self> {
        let transport = BlockingTransport::new(&config, tokens)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// 注入自定义传输层（代理、录制回放或测试替身）。
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> GraphResult<Self> {
        config.validate()?;
        let urls = GraphUrls::new(&config.graph_base);
        Ok(Self {
            core: Arc::new(Core {
                transport,
                urls,
                config,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.core.config
    }

    pub fn urls(&self) -> &GraphUrls {
        &self.core.urls
    }
}
