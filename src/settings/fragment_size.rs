use crate::config::DEFAULT_FRAGMENT_SIZE;
use crate::db::{self, Database};
use crate::error::{GraphError, GraphResult};

const FRAGMENT_SIZE_KEY: &str = "upload_fragment_size";
/// Graph 要求分片长度为 320 KiB 的整数倍。
pub const FRAGMENT_SIZE_ALIGNMENT: usize = 320 * 1024;
pub const MIN_UPLOAD_FRAGMENT_SIZE: usize = FRAGMENT_SIZE_ALIGNMENT;
pub const MAX_UPLOAD_FRAGMENT_SIZE: usize = 60 * 1024 * 1024;

/// 从设置表读取上传分片大小；缺失时返回默认值，错误时透传。
pub fn get_upload_fragment_size(db: &Database) -> GraphResult<usize> {
    if let Some(value) = db::get_setting(db, FRAGMENT_SIZE_KEY)? {
        return parse_and_clamp(&value);
    }
    Ok(DEFAULT_FRAGMENT_SIZE)
}

/// 写入并校验分片大小，限定在 [MIN, MAX] 区间且必须按 320 KiB 对齐。
pub fn set_upload_fragment_size(db: &Database, value: usize) -> GraphResult<usize> {
    if !(MIN_UPLOAD_FRAGMENT_SIZE..=MAX_UPLOAD_FRAGMENT_SIZE).contains(&value) {
        return Err(GraphError::Config(format!(
            "upload fragment size must be between {} and {}",
            MIN_UPLOAD_FRAGMENT_SIZE, MAX_UPLOAD_FRAGMENT_SIZE
        )));
    }
    if value % FRAGMENT_SIZE_ALIGNMENT != 0 {
        return Err(GraphError::Config(format!(
            "upload fragment size must be a multiple of {FRAGMENT_SIZE_ALIGNMENT}"
        )));
    }
    db::set_setting(db, FRAGMENT_SIZE_KEY, &value.to_string())?;
    Ok(value)
}

pub fn default_upload_fragment_size() -> usize {
    DEFAULT_FRAGMENT_SIZE
}

fn parse_and_clamp(raw: &str) -> GraphResult<usize> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|e| GraphError::Config(format!("invalid upload fragment size value: {e}")))?;
    let clamped = parsed.clamp(MIN_UPLOAD_FRAGMENT_SIZE, MAX_UPLOAD_FRAGMENT_SIZE);
    Ok(clamped - clamped % FRAGMENT_SIZE_ALIGNMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("client.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn missing_setting_uses_default() {
        let (_dir, db) = temp_db();
        assert_eq!(get_upload_fragment_size(&db).unwrap(), DEFAULT_FRAGMENT_SIZE);
    }

    #[test]
    fn stored_value_is_returned() {
        let (_dir, db) = temp_db();
        set_upload_fragment_size(&db, 5 * FRAGMENT_SIZE_ALIGNMENT).unwrap();
        assert_eq!(
            get_upload_fragment_size(&db).unwrap(),
            5 * FRAGMENT_SIZE_ALIGNMENT
        );
    }

    #[test]
    fn misaligned_and_out_of_range_values_are_rejected() {
        let (_dir, db) = temp_db();
        assert!(set_upload_fragment_size(&db, FRAGMENT_SIZE_ALIGNMENT + 1).is_err());
        assert!(set_upload_fragment_size(&db, 1024).is_err());
        let too_large = MAX_UPLOAD_FRAGMENT_SIZE + FRAGMENT_SIZE_ALIGNMENT;
        assert!(set_upload_fragment_size(&db, too_large).is_err());
    }

    #[test]
    fn hand_edited_values_are_clamped_and_aligned() {
        let (_dir, db) = temp_db();
        db::set_setting(&db, FRAGMENT_SIZE_KEY, "1").unwrap();
        assert_eq!(get_upload_fragment_size(&db).unwrap(), MIN_UPLOAD_FRAGMENT_SIZE);
        db::set_setting(&db, FRAGMENT_SIZE_KEY, &(FRAGMENT_SIZE_ALIGNMENT * 3 + 7).to_string())
            .unwrap();
        assert_eq!(get_upload_fragment_size(&db).unwrap(), FRAGMENT_SIZE_ALIGNMENT * 3);
        db::set_setting(&db, FRAGMENT_SIZE_KEY, "lots").unwrap();
        assert!(matches!(get_upload_fragment_size(&db), Err(GraphError::Config(_))));
    }
}
