//! 方法配置存储模块
//!
//! # 设计思路
//!
//! 每个 (分类, 方法) 组合拥有独立的持久化配置（密钥 / IV /
//! 自动执行 / 大小写敏感）。切换方法不会清除其他方法的配置，
//! 用户稍后回到某方法时密钥与 IV 原样可用。
//!
//! # 实现思路
//!
//! - 每次读取都经过"默认值合并"，返回**完整**的结构体，
//!   杜绝切换方法时的未定义字段问题。
//! - 写入走部分更新（`ConfigPatch`），合并到旧值后整体落盘。
//! - 描述符未声明的字段即使残留在存储中也会被执行器忽略，
//!   不会泄漏进执行过程。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::registry::Category;
use crate::storage::KvStore;

const CONFIG_KEY_PREFIX: &str = "tbc-config";

/// 一个方法的完整配置
///
/// 所有字段总是被填充；未持久化过的方法返回默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MethodConfig {
    pub key: String,
    pub iv: String,
    pub auto_run: bool,
    pub case_sensitive: bool,
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            iv: String::new(),
            auto_run: true,
            case_sensitive: false,
        }
    }
}

/// 部分配置更新：`None` 字段保留旧值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    pub key: Option<String>,
    pub iv: Option<String>,
    pub auto_run: Option<bool>,
    pub case_sensitive: Option<bool>,
}

/// 将部分更新合并到既有配置上（显式、全量的默认值填充步骤）
fn merge_patch(mut base: MethodConfig, patch: ConfigPatch) -> MethodConfig {
    if let Some(key) = patch.key {
        base.key = key;
    }
    if let Some(iv) = patch.iv {
        base.iv = iv;
    }
    if let Some(auto_run) = patch.auto_run {
        base.auto_run = auto_run;
    }
    if let Some(case_sensitive) = patch.case_sensitive {
        base.case_sensitive = case_sensitive;
    }
    base
}

/// 按 (分类, 方法) 维护配置的存储
pub struct ConfigStore {
    store: Arc<dyn KvStore>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn storage_key(category: Category, method: &str) -> String {
        format!("{}/{}/{}", CONFIG_KEY_PREFIX, category.as_str(), method)
    }

    /// 读取某方法的配置；从未设置或已损坏 → 默认值
    pub fn get(&self, category: Category, method: &str) -> MethodConfig {
        let key = Self::storage_key(category, method);
        let Some(raw) = self.store.get(&key) else {
            return MethodConfig::default();
        };

        match serde_json::from_value::<MethodConfig>(raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("配置条目损坏，回退默认值: {} ({})", key, err);
                MethodConfig::default()
            }
        }
    }

    /// 合并部分更新并持久化，返回合并后的完整配置
    pub fn set(
        &self,
        category: Category,
        method: &str,
        patch: ConfigPatch,
    ) -> Result<MethodConfig, ConvertError> {
        let merged = merge_patch(self.get(category, method), patch);
        let raw = serde_json::to_value(&merged)
            .map_err(|e| ConvertError::Storage(format!("序列化配置失败: {}", e)))?;
        self.store.set(&Self::storage_key(category, method), raw)?;
        Ok(merged)
    }

    /// 显式重置：删除持久化条目，下次读取回到默认值
    pub fn reset(&self, category: Category, method: &str) -> Result<(), ConvertError> {
        self.store.remove(&Self::storage_key(category, method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn unset_method_resolves_to_defaults() {
        let config = store().get(Category::EncodeDecode, "Base64");
        assert_eq!(config, MethodConfig::default());
        assert!(config.auto_run);
        assert!(!config.case_sensitive);
    }

    #[test]
    fn patch_merges_onto_prior_value() {
        let cs = store();
        cs.set(
            Category::EncryptDecrypt,
            "AES",
            ConfigPatch {
                key: Some("k".repeat(32)),
                ..Default::default()
            },
        )
        .expect("set key");

        let merged = cs
            .set(
                Category::EncryptDecrypt,
                "AES",
                ConfigPatch {
                    iv: Some("i".repeat(16)),
                    ..Default::default()
                },
            )
            .expect("set iv");

        // 第二次更新不能丢失第一次写入的密钥
        assert_eq!(merged.key, "k".repeat(32));
        assert_eq!(merged.iv, "i".repeat(16));
        assert!(merged.auto_run);
    }

    #[test]
    fn methods_have_independent_configs() {
        let cs = store();
        cs.set(
            Category::EncodeDecode,
            "Base64",
            ConfigPatch {
                case_sensitive: Some(true),
                ..Default::default()
            },
        )
        .expect("set base64 config");

        cs.set(
            Category::EncodeDecode,
            "URL",
            ConfigPatch {
                auto_run: Some(false),
                ..Default::default()
            },
        )
        .expect("set url config");

        assert!(cs.get(Category::EncodeDecode, "Base64").case_sensitive);
        assert!(cs.get(Category::EncodeDecode, "Base64").auto_run);
        assert!(!cs.get(Category::EncodeDecode, "URL").auto_run);
        assert!(!cs.get(Category::EncodeDecode, "URL").case_sensitive);
    }

    #[test]
    fn reset_restores_defaults() {
        let cs = store();
        cs.set(
            Category::EncodeDecode,
            "Base64",
            ConfigPatch {
                key: Some("secret".into()),
                ..Default::default()
            },
        )
        .expect("set config");

        cs.reset(Category::EncodeDecode, "Base64").expect("reset");
        assert_eq!(cs.get(Category::EncodeDecode, "Base64"), MethodConfig::default());
    }

    #[test]
    fn corrupt_entry_resolves_to_defaults() {
        let backing = Arc::new(MemoryStore::new());
        backing
            .set("tbc-config/Encode - Decode/Base64", json!([1, 2, 3]))
            .expect("inject corrupt value");

        let cs = ConfigStore::new(backing);
        assert_eq!(cs.get(Category::EncodeDecode, "Base64"), MethodConfig::default());
    }
}
