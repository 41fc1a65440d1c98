mod client;
mod copy;
mod delete;
mod details;
mod download;
mod folder;
mod fragment;
mod handle;
mod info;
mod list;
pub mod models;
mod move_item;
mod resume;
mod source;
mod upload;
mod upload_session;
mod urls;

pub use client::OneDriveClient;
pub use copy::AsyncJob;
pub use fragment::{Fragment, FragmentReader};
pub use handle::{DriveHandle, ItemHandle};
pub use list::Children;
pub use models::{
    AsyncJobState, AsyncJobStatus, ChildrenPage, Drive, DriveItem, ItemReference, UploadSession,
    UploadSessionResponse, UploadSessionStatus,
};
pub use resume::ResumeToken;
pub use source::{LocalFile, MemorySource, UploadSource};
pub use upload::UploadHooks;
pub use urls::{sanitize_file_name, GraphUrls};

use serde::Serialize;

/// 目标位置已存在同名项目时的处理方式。本库创建类操作固定使用 `Rename`。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    #[default]
    Rename,
    Replace,
    Fail,
}
