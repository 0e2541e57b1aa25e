// ==========================================
// Quản lý kho cám - mix - JSON 文档读写
// ==========================================
// 职责: 扁平 JSON 文档的读取与整体重写
// 写入: 同目录临时文件 → rename,避免写到一半的文件
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 读取 JSON 文档
///
/// # 返回
/// - Ok(None): 文件不存在
/// - Ok(Some(T)): 解析成功
/// - Err(CorruptData): 文件存在但解析失败
/// - Err(Io): 读取失败
pub fn read_json<T: DeserializeOwned>(path: &Path) -> RepositoryResult<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RepositoryError::io(path, e)),
    };

    // 手工编辑的文件可能带 BOM
    let raw = raw.trim_start_matches('\u{feff}');
    if raw.trim().is_empty() {
        return Err(RepositoryError::corrupt(path, "文件为空"));
    }

    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| RepositoryError::corrupt(path, e))
}

/// 原子写入 JSON 文档（UTF-8,缩进格式,非 ASCII 原样输出）
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> RepositoryResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| RepositoryError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| RepositoryError::InternalError(format!("JSON 序列化失败: {}", e)))?;
        writer.flush().map_err(|e| RepositoryError::io(path, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| RepositoryError::io(path, e))?;

    temp.persist(path)
        .map_err(|e| RepositoryError::io(path, e.error))?;

    tracing::debug!("已写入 {}", path.display());
    Ok(())
}

/// 写入新文件,目标已存在时失败（不覆盖）
pub fn write_json_new<T: Serialize + ?Sized>(path: &Path, value: &T) -> RepositoryResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| RepositoryError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| RepositoryError::InternalError(format!("JSON 序列化失败: {}", e)))?;
        writer.flush().map_err(|e| RepositoryError::io(path, e))?;
    }

    temp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            RepositoryError::AlreadyExists {
                entity: "file".to_string(),
                id: path.display().to_string(),
            }
        } else {
            RepositoryError::io(path, e.error)
        }
    })?;

    tracing::debug!("已创建 {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let value: Option<BTreeMap<String, f64>> =
            read_json(&dir.path().join("absent.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("feed_inventory.json");

        let mut map = BTreeMap::new();
        map.insert("Bắp".to_string(), 1250.5);
        write_json_atomic(&path, &map).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Bắp"));

        let back: BTreeMap<String, f64> = read_json(&path).unwrap().unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let result: RepositoryResult<Option<BTreeMap<String, f64>>> = read_json(&path);
        assert!(matches!(result, Err(RepositoryError::CorruptData { .. })));
    }

    #[test]
    fn test_write_new_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report_20260101.json");
        write_json_new(&path, &BTreeMap::<String, f64>::new()).unwrap();

        let second = write_json_new(&path, &BTreeMap::<String, f64>::new());
        assert!(matches!(second, Err(RepositoryError::AlreadyExists { .. })));
    }
}
