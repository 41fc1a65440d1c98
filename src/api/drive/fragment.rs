use crate::api::http::Request;
use crate::error::{GraphError, GraphResult};
use std::io::{ErrorKind, Read};
use tracing::warn;
use url::Url;

/// 一个待上传的分片：起始偏移、文件总大小与分片字节。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub start: u64,
    pub total: u64,
    pub bytes: Vec<u8>,
}

impl Fragment {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 闭区间终点，即 `Content-Range` 中的 end。
    pub fn end(&self) -> u64 {
        (self.start + self.len()).saturating_sub(1)
    }

    pub fn into_request(self, upload_url: Url) -> Request {
        Request::fragment(upload_url, self.start, self.total, self.bytes)
    }
}

/// 按固定大小从数据源切分片，并累计已消费的字节数。
/// 不变量：`bytes_sent <= source_size`。
pub struct FragmentReader<R> {
    source: R,
    fragment_size: usize,
    source_size: u64,
    bytes_sent: u64,
}

impl<R: Read> FragmentReader<R> {
    /// `fragment_size` 为 0 时按 1 处理。
    pub fn new(source: R, source_size: u64, fragment_size: usize) -> Self {
        Self::starting_at(source, source_size, fragment_size, 0)
    }

    /// 从 `offset` 继续切分，调用方需保证数据源已定位到该位置。
    pub fn starting_at(source: R, source_size: u64, fragment_size: usize, offset: u64) -> Self {
        Self {
            source,
            fragment_size: fragment_size.max(1),
            source_size,
            bytes_sent: offset.min(source_size),
        }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn source_size(&self) -> u64 {
        self.source_size
    }

    pub fn has_more_fragments(&self) -> bool {
        self.bytes_sent < self.source_size
    }

    /// 读取下一个分片，长度为 `min(fragment_size, 剩余字节)`。
    /// 短读会循环补满；`Interrupted` 重试；数据源提前结束返回 `TruncatedSource`。
    /// 已无剩余字节时返回空分片。
    pub fn read_fragment(&mut self) -> GraphResult<Fragment> {
        let remaining = self.source_size - self.bytes_sent;
        let len = remaining.min(self.fragment_size as u64) as usize;
        let mut bytes = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.source.read(&mut bytes[filled..]) {
                Ok(0) => {
                    let actual = self.bytes_sent + filled as u64;
                    warn!(expected = self.source_size, actual, "upload source ended early");
                    return Err(GraphError::TruncatedSource {
                        expected: self.source_size,
                        actual,
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(GraphError::Io(err)),
            }
        }
        let fragment = Fragment {
            start: self.bytes_sent,
            total: self.source_size,
            bytes,
        };
        self.bytes_sent += len as u64;
        Ok(fragment)
    }
}
