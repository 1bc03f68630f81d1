//! 键值持久化模块
//!
//! # 设计思路
//!
//! 引擎对持久化后端只有 local-storage 式的要求：字符串键、
//! 不透明 JSON 值、同步读写。通过 `KvStore` trait 把这一
//! 依赖抽成接缝，宿主可接入任意后端；本模块自带基于单个
//! JSON 文件的实现与内存实现。
//!
//! # 实现思路
//!
//! - 缺失的键视为"使用默认值"，损坏的值同样回退默认并告警，绝不崩溃。
//! - `JsonFileStore` 打开时整体读入，之后写穿（`to_string_pretty`）。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::ConvertError;

/// 引擎面向的键值存储接口
///
/// 读取永不失败（缺失/损坏都折算为 `None`），写入可能失败并返回
/// `ConvertError::Storage`。
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), ConvertError>;
    fn remove(&self, key: &str) -> Result<(), ConvertError>;
}

/// 单 JSON 文件实现：整个存储是文件中的一个 JSON 对象
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// 打开（或初始化）给定路径上的存储
    ///
    /// 文件不存在 → 空存储；内容不是合法 JSON 对象 → 空存储并告警。
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConvertError::Storage(format!("创建存储目录失败: {}", e)))?;
        }

        let entries = Self::load_entries(&path);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn load_entries(path: &Path) -> BTreeMap<String, Value> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };

        match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("存储文件解析失败，回退为空存储: {} ({})", err, path.display());
                BTreeMap::new()
            }
        }
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), ConvertError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ConvertError::Storage(format!("序列化存储内容失败: {}", e)))?;
        fs::write(&self.path, content)
            .map_err(|e| ConvertError::Storage(format!("写入存储文件失败: {}", e)))
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("存储状态锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock_entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), ConvertError> {
        let mut entries = self.lock_entries();
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ConvertError> {
        let mut entries = self.lock_entries();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// 内存实现，供测试与无持久化需求的宿主使用
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lock_entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), ConvertError> {
        self.lock_entries().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConvertError> {
        self.lock_entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);

        store.set("k", json!({"a": 1})).expect("set value");
        assert_eq!(store.get("k"), Some(json!({"a": 1})));

        store.remove("k").expect("remove value");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).expect("open store");
            store.set("tbc-category", json!("Hash")).expect("set value");
        }

        let reopened = JsonFileStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get("tbc-category"), Some(json!("Hash")));
    }

    #[test]
    fn file_store_tolerates_corrupt_content() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json at all").expect("write garbage");

        let store = JsonFileStore::open(&path).expect("open despite corruption");
        assert_eq!(store.get("anything"), None);

        // 损坏内容被丢弃后仍可正常写入
        store.set("k", json!(1)).expect("set after corruption");
        assert_eq!(store.get("k"), Some(json!(1)));
    }

    #[test]
    fn file_store_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = JsonFileStore::open(dir.path().join("s.json")).expect("open store");
        store.remove("nope").expect("remove missing key");
    }
}
