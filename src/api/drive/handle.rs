use super::client::Core;
use super::models::{Drive, DriveItem};
use std::fmt;
use std::sync::Arc;

/// drive 资源句柄：共享底座 + 不可变的 drive 快照。
#[derive(Clone)]
pub struct DriveHandle {
    pub(crate) core: Arc<Core>,
    pub(crate) drive: Drive,
}

impl DriveHandle {
    pub(crate) fn new(core: Arc<Core>, drive: Drive) -> Self {
        Self { core, drive }
    }

    pub fn resource(&self) -> &Drive {
        &self.drive
    }

    pub fn id(&self) -> &str {
        &self.drive.id
    }

    /// 为已知 id 的项目构造句柄而不发请求，例如从持久化的上传记录恢复。
    pub fn item_ref(&self, item_id: impl Into<String>) -> ItemHandle {
        let item = DriveItem {
            id: item_id.into(),
            ..Default::default()
        };
        ItemHandle::new(self.core.clone(), item, self.drive.clone())
    }
}

/// drive item 句柄：共享底座 + 项目快照 + 所属 drive。
/// 对项目的写操作返回新的句柄，原快照保持不变。
#[derive(Clone)]
pub struct ItemHandle {
    pub(crate) core: Arc<Core>,
    pub(crate) item: DriveItem,
    pub(crate) drive: Drive,
}

impl ItemHandle {
    pub(crate) fn new(core: Arc<Core>, item: DriveItem, drive: Drive) -> Self {
        Self { core, item, drive }
    }

    pub fn resource(&self) -> &DriveItem {
        &self.item
    }

    pub fn into_resource(self) -> DriveItem {
        self.item
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    pub(crate) fn wrap(&self, item: DriveItem) -> ItemHandle {
        ItemHandle::new(self.core.clone(), item, self.drive.clone())
    }
}

impl fmt::Debug for DriveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveHandle").field("drive", &self.drive).finish()
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandle")
            .field("drive_id", &self.drive.id)
            .field("item", &self.item)
            .finish()
    }
}
