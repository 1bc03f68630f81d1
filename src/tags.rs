//! 快捷标签模块
//!
//! # 设计思路
//!
//! 快捷标签是 (分类, 方法, 子模式) 三元组的命名书签，点一下
//! 即可跳转到常用转换。首次运行播种一组默认标签；用户增删
//! 后整表持久化，列表保持插入顺序。
//!
//! # 实现思路
//!
//! - 标签以 JSON 数组存于键 `tbc-custom-tags` 下。
//! - 存储值损坏时重新播种默认标签并告警，绝不让标签功能整体失效。
//! - `add` 先查重（`DuplicateId`），失败不产生任何可见变更。

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::error::ConvertError;
use crate::registry::Category;
use crate::storage::KvStore;

const TAGS_KEY: &str = "tbc-custom-tags";

/// 一个快捷标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTag {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submode: Option<String>,
}

impl QuickTag {
    pub fn new(id: &str, label: &str, category: Category, method: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category,
            method: method.to_string(),
            submode: None,
        }
    }
}

/// 首次运行播种的默认标签
fn default_tags() -> Vec<QuickTag> {
    vec![
        QuickTag::new("json-yaml", "JSON ↔ YAML", Category::Convert, "JSON ↔ YAML"),
        QuickTag::new("base64", "Base64", Category::EncodeDecode, "Base64"),
        QuickTag::new("url", "URL", Category::EncodeDecode, "URL"),
        QuickTag::new("html", "HTML 实体", Category::EncodeDecode, "HTML Entities"),
        QuickTag::new("md5", "MD5", Category::Hash, "MD5"),
        QuickTag::new("sha256", "SHA-256", Category::Hash, "SHA-256"),
        QuickTag::new("all-hashes", "全部哈希", Category::Hash, "All"),
    ]
}

/// 标签管理器，持有内存副本并写穿到存储
pub struct TagManager {
    store: Arc<dyn KvStore>,
    tags: Mutex<Vec<QuickTag>>,
}

impl TagManager {
    /// 从存储加载标签；键缺失或内容损坏时播种默认标签
    pub fn new(store: Arc<dyn KvStore>) -> Result<Self, ConvertError> {
        let tags = match store.get(TAGS_KEY) {
            None => {
                let seeded = default_tags();
                persist(store.as_ref(), &seeded)?;
                seeded
            }
            Some(raw) => match serde_json::from_value::<Vec<QuickTag>>(raw) {
                Ok(tags) => tags,
                Err(err) => {
                    log::warn!("标签存储损坏，重新播种默认标签: {}", err);
                    let seeded = default_tags();
                    persist(store.as_ref(), &seeded)?;
                    seeded
                }
            },
        };

        Ok(Self {
            store,
            tags: Mutex::new(tags),
        })
    }

    fn lock_tags(&self) -> std::sync::MutexGuard<'_, Vec<QuickTag>> {
        match self.tags.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("标签状态锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 按插入顺序列出全部标签
    pub fn list(&self) -> Vec<QuickTag> {
        self.lock_tags().clone()
    }

    /// 追加标签；ID 已存在时返回 `DuplicateId` 且不产生任何变更
    pub fn add(&self, tag: QuickTag) -> Result<(), ConvertError> {
        let mut tags = self.lock_tags();
        if tags.iter().any(|t| t.id == tag.id) {
            return Err(ConvertError::DuplicateId(tag.id));
        }
        tags.push(tag);
        persist(self.store.as_ref(), &tags)
    }

    /// 删除标签；返回是否确实删除了
    pub fn remove(&self, id: &str) -> Result<bool, ConvertError> {
        let mut tags = self.lock_tags();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        if tags.len() == before {
            return Ok(false);
        }
        persist(self.store.as_ref(), &tags)?;
        Ok(true)
    }
}

fn persist(store: &dyn KvStore, tags: &[QuickTag]) -> Result<(), ConvertError> {
    let raw = serde_json::to_value(tags)
        .map_err(|e| ConvertError::Storage(format!("序列化标签失败: {}", e)))?;
    store.set(TAGS_KEY, raw)
}
