use crate::error::GraphResult;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// 路径片段编码集：除 RFC 3986 unreserved 字符外全部编码（包括 `/` 与 `:`）。
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Graph 各资源族的 URL 构造器，基地址可配置（测试时指向本地假服务）。
#[derive(Clone, Debug)]
pub struct GraphUrls {
    base: String,
}

impl GraphUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn join(&self, relative: &str) -> GraphResult<Url> {
        Ok(Url::parse(&format!("{}{relative}", self.base))?)
    }

    /// GET /me/drive
    pub fn my_drive(&self) -> GraphResult<Url> {
        self.join("/me/drive")
    }

    /// GET /drives/{drive-id}/root 或 /drives/{drive-id}/root:/{path}
    pub fn item_by_path(&self, drive_id: &str, path: &str) -> GraphResult<Url> {
        let drive = encode_segment(drive_id);
        let encoded = encode_path(path);
        if encoded.is_empty() {
            self.join(&format!("/drives/{drive}/root"))
        } else {
            self.join(&format!("/drives/{drive}/root:/{encoded}"))
        }
    }

    /// GET|PATCH|DELETE /drives/{drive-id}/items/{item-id}
    pub fn item(&self, drive_id: &str, item_id: &str) -> GraphResult<Url> {
        self.join(&format!(
            "/drives/{}/items/{}",
            encode_segment(drive_id),
            encode_segment(item_id)
        ))
    }

    /// GET|POST /drives/{drive-id}/items/{item-id}/children
    pub fn children(&self, drive_id: &str, item_id: &str) -> GraphResult<Url> {
        self.join(&format!(
            "/drives/{}/items/{}/children",
            encode_segment(drive_id),
            encode_segment(item_id)
        ))
    }

    /// POST /drives/{drive-id}/items/{parent-id}:/{file-name}:/createUploadSession
    pub fn upload_session(
        &self,
        drive_id: &str,
        parent_id: &str,
        file_name: &str,
    ) -> GraphResult<Url> {
        self.join(&format!(
            "/drives/{}/items/{}:/{}:/createUploadSession",
            encode_segment(drive_id),
            encode_segment(parent_id),
            encode_segment(&sanitize_file_name(file_name))
        ))
    }

    /// POST /drives/{drive-id}/items/{item-id}/copy
    pub fn copy(&self, drive_id: &str, item_id: &str) -> GraphResult<Url> {
        self.join(&format!(
            "/drives/{}/items/{}/copy",
            encode_segment(drive_id),
            encode_segment(item_id)
        ))
    }

    /// GET /drives/{drive-id}/items/{item-id}/content
    pub fn content(&self, drive_id: &str, item_id: &str) -> GraphResult<Url> {
        self.join(&format!(
            "/drives/{}/items/{}/content",
            encode_segment(drive_id),
            encode_segment(item_id)
        ))
    }
}

/// 由非 UTF-8 文件名转换而来的替换字符统一改为 `x`，空名回退为 `upload.bin`。
pub fn sanitize_file_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c == char::REPLACEMENT_CHARACTER { 'x' } else { c })
        .collect();
    if replaced.trim().is_empty() {
        "upload.bin".to_string()
    } else {
        replaced
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// 按 `/` 拆分后逐段编码，自动忽略空段与首尾 `/`。
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
