use crate::api::http::{HeaderField, ResponseShape};
use serde::{Deserialize, Serialize};

/// OneDrive 的 drive 资源（`GET /me/drive`）。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Drive {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<IdentitySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<DriveQuota>,
}

impl ResponseShape for Drive {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveQuota {
    pub total: Option<u64>,
    pub used: Option<u64>,
    pub remaining: Option<u64>,
    pub deleted: Option<u64>,
    pub state: Option<String>,
    pub file_count: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentitySet {
    pub user: Option<Identity>,
    pub group: Option<Identity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// 文件或文件夹的完整快照。所有可选字段在序列化时省略，
/// 因此同一结构也可直接作为 PATCH 请求体。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "eTag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(rename = "cTag", skip_serializing_if = "Option::is_none")]
    pub c_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(
        rename = "@microsoft.graph.downloadUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DeletedFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system_info: Option<FileSystemInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

impl ResponseShape for DriveItem {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Hashes>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hashes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc32_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_xor_hash: Option<String>,
}

/// 空的 folder facet 序列化为 `{}`，创建文件夹时需要它。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFacet {
    pub height: Option<f64>,
    pub width: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletedFacet {
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileSystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// 子项列表的一页。
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChildrenPage {
    pub value: Vec<DriveItem>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl ResponseShape for ChildrenPage {}

/// 创建会话后返回的上传地址与过期时间。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSession {
    pub upload_url: String,
    pub expiration_date_time: Option<String>,
}

impl ResponseShape for UploadSession {}

/// 单个分片 PUT 的结果：中间进度或最终生成的文件。
#[derive(Clone, Debug, PartialEq)]
pub enum UploadSessionResponse {
    Progress(UploadSessionStatus),
    Completed(Box<DriveItem>),
}

/// 会话当前状态；同样的结构也由 `GET {uploadUrl}` 返回。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSessionStatus {
    pub expiration_date_time: Option<String>,
    pub next_expected_ranges: Vec<String>,
}

impl ResponseShape for UploadSessionStatus {}

impl UploadSessionStatus {
    /// 第一个待传区间的起点，例如 `"26-"` 或 `"26-40"` 返回 26。
    pub fn next_expected_offset(&self) -> Option<u64> {
        self.next_expected_ranges
            .first()
            .and_then(|range| range.split('-').next())
            .and_then(|start| start.trim().parse().ok())
    }
}

/// 分片响应的线上形态：进度字段与 DriveItem 字段平铺在同一对象里。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UploadSessionResponseDto {
    expiration_date_time: Option<String>,
    next_expected_ranges: Vec<String>,
    #[serde(flatten)]
    item: DriveItem,
}

impl ResponseShape for UploadSessionResponseDto {}

impl From<UploadSessionResponseDto> for UploadSessionResponse {
    fn from(value: UploadSessionResponseDto) -> Self {
        if value.item.id.is_empty() {
            UploadSessionResponse::Progress(UploadSessionStatus {
                expiration_date_time: value.expiration_date_time,
                next_expected_ranges: value.next_expected_ranges,
            })
        } else {
            UploadSessionResponse::Completed(Box::new(value.item))
        }
    }
}

/// 复制等异步操作的句柄，监控地址只来自 `Location` 响应头。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AsyncJobLocation {
    #[serde(skip)]
    pub monitor_url: String,
}

fn assign_monitor_url(job: &mut AsyncJobLocation, value: String) {
    job.monitor_url = value;
}

impl ResponseShape for AsyncJobLocation {
    const HEADER_FIELDS: &'static [HeaderField<Self>] = &[HeaderField {
        header: "Location",
        assign: assign_monitor_url,
    }];
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AsyncJobState {
    NotStarted,
    InProgress,
    Completed,
    Updating,
    Failed,
    DeletePending,
    DeleteFailed,
    Waiting,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsyncJobStatus {
    pub status: AsyncJobState,
    pub percentage_complete: Option<f64>,
    pub operation: Option<String>,
    pub resource_id: Option<String>,
}

impl ResponseShape for AsyncJobStatus {}

impl AsyncJobStatus {
    pub fn is_completed(&self) -> bool {
        self.status == AsyncJobState::Completed
    }
}
