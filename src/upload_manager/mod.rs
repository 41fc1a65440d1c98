pub mod storage;

pub use storage::{SqliteUploadStore, UploadStore};
