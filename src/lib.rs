//! OneDrive（Microsoft Graph）阻塞客户端，核心是基于上传会话的大文件分片上传。
//!
//! 所有请求同步顺序执行，每个操作都接收一个 [`CancelToken`]。

pub mod api;
pub mod cancel;
pub mod config;
pub mod db;
pub mod error;
pub mod settings;
pub mod upload_manager;

pub use api::auth::{StaticToken, TokenSource};
pub use api::drive::{
    AsyncJob, Children, ConflictBehavior, Drive, DriveHandle, DriveItem, ItemHandle, LocalFile,
    MemorySource, OneDriveClient, ResumeToken, UploadHooks, UploadSession, UploadSessionResponse,
    UploadSource,
};
pub use api::http::{Auth, BlockingTransport, RawResponse, Request, Transport};
pub use cancel::CancelToken;
pub use config::ClientConfig;
pub use db::Database;
pub use error::{GraphError, GraphResult, RemoteError};
pub use upload_manager::{SqliteUploadStore, UploadStore};
