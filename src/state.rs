//! 选择状态模块
//!
//! # 设计思路
//!
//! 当前的 (分类, 方法, 子模式) 选择跨会话持久化，重新打开时
//! 回到上次的工作现场。持久化值可能指向已下线的方法，读取时
//! 一律经注册表校验，校验不过回退默认选择而不是报错。
//!
//! 应用快捷标签只切换选择，各方法的配置（密钥等）原样保留。

use std::sync::Arc;

use crate::config_store::{ConfigPatch, ConfigStore, MethodConfig};
use crate::engine::{ConversionRequest, ConversionResult, Mode, execute};
use crate::error::ConvertError;
use crate::registry::{Category, registry};
use crate::storage::KvStore;
use crate::tags::QuickTag;

const CATEGORY_KEY: &str = "tbc-category";
const METHOD_KEY: &str = "tbc-method";
const SUBMODE_KEY: &str = "tbc-submode";

/// 当前选中的 (分类, 方法, 子模式)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: Category,
    pub method: String,
    pub submode: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            category: Category::EncodeDecode,
            method: "Base64".to_string(),
            submode: None,
        }
    }
}

/// 引擎门面：选择状态 + 方法配置，面向宿主的主要入口
pub struct EngineState {
    store: Arc<dyn KvStore>,
    configs: ConfigStore,
}

impl EngineState {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let configs = ConfigStore::new(Arc::clone(&store));
        Self { store, configs }
    }

    fn read_string(&self, key: &str) -> Option<String> {
        self.store.get(key).and_then(|v| v.as_str().map(String::from))
    }

    /// 读取当前选择；持久化值缺失或校验不过时回退默认
    pub fn selection(&self) -> Selection {
        let default = Selection::default();

        let category = self
            .read_string(CATEGORY_KEY)
            .and_then(|label| Category::parse(&label))
            .unwrap_or(default.category);

        let method = self
            .read_string(METHOD_KEY)
            .filter(|persisted| registry().lookup(category, persisted).is_some())
            .unwrap_or_else(|| default_method(category));

        let submode = self
            .read_string(SUBMODE_KEY)
            .and_then(|persisted| normalize_submode(category, &method, Some(&persisted)));

        Selection {
            category,
            method,
            submode,
        }
    }

    /// 切换选择并持久化
    ///
    /// 方法必须存在于注册表；子模式规整为方法声明的规范值
    /// （未声明子模式的方法忽略传入值）。
    pub fn set_selection(
        &self,
        category: Category,
        method: &str,
        submode: Option<&str>,
    ) -> Result<Selection, ConvertError> {
        let descriptor = registry().lookup(category, method).ok_or_else(|| {
            ConvertError::UnknownMethod(format!("{} / {}", category.as_str(), method))
        })?;

        let selection = Selection {
            category,
            method: descriptor.name.to_string(),
            submode: normalize_submode(category, descriptor.name, submode),
        };

        self.store
            .set(CATEGORY_KEY, serde_json::Value::String(category.as_str().to_string()))?;
        self.store
            .set(METHOD_KEY, serde_json::Value::String(selection.method.clone()))?;
        match &selection.submode {
            Some(submode) => self
                .store
                .set(SUBMODE_KEY, serde_json::Value::String(submode.clone()))?,
            None => self.store.remove(SUBMODE_KEY)?,
        }

        Ok(selection)
    }

    /// 应用快捷标签：只切换选择，不触碰任何方法的配置
    pub fn apply_tag(&self, tag: &QuickTag) -> Result<Selection, ConvertError> {
        self.set_selection(tag.category, &tag.method, tag.submode.as_deref())
    }

    /// 当前选中方法的配置
    pub fn config(&self) -> MethodConfig {
        let selection = self.selection();
        self.configs.get(selection.category, &selection.method)
    }

    /// 更新当前选中方法的配置
    pub fn update_config(&self, patch: ConfigPatch) -> Result<MethodConfig, ConvertError> {
        let selection = self.selection();
        self.configs.set(selection.category, &selection.method, patch)
    }

    pub fn configs(&self) -> &ConfigStore {
        &self.configs
    }

    /// 用当前选择与配置组装一次转换请求
    pub fn snapshot(&self, input: &str, mode: Mode) -> ConversionRequest {
        let selection = self.selection();
        let config = self.configs.get(selection.category, &selection.method);
        ConversionRequest {
            category: selection.category,
            method: selection.method,
            submode: selection.submode,
            mode,
            input: input.to_string(),
            config,
        }
    }

    /// 按当前选择执行一次转换
    pub fn convert(&self, input: &str, mode: Mode) -> ConversionResult {
        execute(&self.snapshot(input, mode))
    }
}

/// 分类的默认方法：默认分类用 Base64，其余取注册顺序首个
fn default_method(category: Category) -> String {
    if category == Selection::default().category {
        return Selection::default().method;
    }
    registry()
        .list_methods(category)
        .first()
        .map(|descriptor| descriptor.name.to_string())
        .unwrap_or_else(|| Selection::default().method)
}

/// 将子模式规整为方法声明的规范值；方法无子模式时恒为 `None`
fn normalize_submode(category: Category, method: &str, requested: Option<&str>) -> Option<String> {
    let descriptor = registry().lookup(category, method)?;
    if descriptor.submodes.is_empty() {
        return None;
    }

    let canonical = requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|r| {
            descriptor
                .submodes
                .iter()
                .find(|s| s.eq_ignore_ascii_case(r))
        })
        .copied()
        .unwrap_or(descriptor.submodes[0]);
    Some(canonical.to_string())
}
