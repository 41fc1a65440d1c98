use super::{
    handle::ItemHandle,
    fragment::FragmentReader,
    models::{UploadSessionResponse, UploadSessionResponseDto},
    resume::ResumeToken,
    source::UploadSource,
};
use crate::api::http::Auth;
use crate::cancel::CancelToken;
use crate::error::{GraphError, GraphResult};
use crate::upload_manager::UploadStore;
use std::io::Read;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// 分片上传的可选回调。
/// - `progress(bytes_sent, total)`：每个分片被服务端确认后调用；
/// - `checkpoint`：设置后在会话创建与每次进度确认后写入 [`ResumeToken`]，完成时删除。
#[derive(Default)]
pub struct UploadHooks<'a> {
    pub progress: Option<Box<dyn FnMut(u64, u64) + 'a>>,
    pub checkpoint: Option<&'a dyn UploadStore>,
}

impl<'a> UploadHooks<'a> {
    pub fn with_progress(mut self, progress: impl FnMut(u64, u64) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn with_checkpoint(mut self, store: &'a dyn UploadStore) -> Self {
        self.checkpoint = Some(store);
        self
    }

    fn report(&mut self, bytes_sent: u64, total: u64) {
        if let Some(progress) = self.progress.as_mut() {
            progress(bytes_sent, total);
        }
    }

    fn save(&self, token: &ResumeToken) {
        if let Some(store) = self.checkpoint {
            if let Err(err) = store.upsert(token) {
                warn!(
                    task_id = %token.task_id,
                    error = %err,
                    "failed to persist upload checkpoint"
                );
            }
        }
    }

    fn forget(&self, token: &ResumeToken) {
        if let Some(store) = self.checkpoint {
            if let Err(err) = store.remove(&token.task_id) {
                warn!(task_id = %token.task_id, error = %err, "failed to remove upload checkpoint");
            }
        }
    }
}

impl ItemHandle {
    /// 通过上传会话把 `file` 分片上传到当前文件夹，返回生成的文件。
    /// 任一分片失败即中止整个上传，不做自动续传。
    pub fn upload_large_file<S: UploadSource>(
        &self,
        file: &mut S,
        cancel: &CancelToken,
    ) -> GraphResult<ItemHandle> {
        self.upload_large_file_with_hooks(file, cancel, UploadHooks::default())
    }

    #[instrument(skip_all, fields(parent = %self.item.id, file = %file.name(), size = file.size()))]
    pub fn upload_large_file_with_hooks<S: UploadSource>(
        &self,
        file: &mut S,
        cancel: &CancelToken,
        hooks: UploadHooks<'_>,
    ) -> GraphResult<ItemHandle> {
        if file.is_dir() {
            return Err(GraphError::NotAFile);
        }
        let source_size = file.size();
        if source_size == 0 {
            return Err(GraphError::EmptyFile);
        }

        let file_name = file.name().into_owned();
        let session = self.create_upload_session(&file_name, cancel)?;
        let target = Url::parse(&session.upload_url)?;
        let token = ResumeToken::new(self, &file_name, &session, source_size);
        hooks.save(&token);

        let reader = FragmentReader::new(file, source_size, self.core.config.fragment_size);
        FragmentedUpload::new(reader, target, token).run(self, cancel, hooks)
    }
}

/// 一次分片上传的运行状态，只属于单个上传调用。
pub(crate) struct FragmentedUpload<R> {
    reader: FragmentReader<R>,
    target: Url,
    token: ResumeToken,
}

impl<R: Read> FragmentedUpload<R> {
    pub(crate) fn new(reader: FragmentReader<R>, target: Url, token: ResumeToken) -> Self {
        Self {
            reader,
            target,
            token,
        }
    }

    /// 按偏移顺序逐个发送分片，同一时刻只有一个请求在途。
    /// 分片 PUT 不带令牌，会话地址本身已授权。
    pub(crate) fn run(
        mut self,
        parent: &ItemHandle,
        cancel: &CancelToken,
        mut hooks: UploadHooks<'_>,
    ) -> GraphResult<ItemHandle> {
        let total = self.reader.source_size();
        let mut next_expected_ranges = Vec::new();

        while self.reader.has_more_fragments() {
            cancel.check()?;
            let fragment = self.reader.read_fragment()?;
            debug!(start = fragment.start, end = fragment.end(), total, "uploading fragment");
            let request = fragment.into_request(self.target.clone());
            let response: UploadSessionResponseDto =
                parent.core.send(&request, Auth::None, cancel)?;
            let bytes_sent = self.reader.bytes_sent();

            match UploadSessionResponse::from(response) {
                UploadSessionResponse::Progress(status) => {
                    hooks.report(bytes_sent, total);
                    self.token.bytes_sent = bytes_sent;
                    if status.expiration_date_time.is_some() {
                        self.token.expiration = status.expiration_date_time;
                    }
                    hooks.save(&self.token);
                    next_expected_ranges = status.next_expected_ranges;
                }
                UploadSessionResponse::Completed(item) => {
                    hooks.report(bytes_sent, total);
                    hooks.forget(&self.token);
                    info!(item = %item.id, bytes = bytes_sent, "large file upload completed");
                    return Ok(parent.wrap(*item));
                }
            }
        }

        warn!(?next_expected_ranges, "all bytes sent but the session did not complete");
        Err(GraphError::SessionIncomplete {
            next_expected_ranges,
        })
    }
}
