//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 转换引擎的所有失败都是**本地可恢复**的：校验失败、输入格式错误、
//! 配置缺失等都应作为值返回给上层渲染，绝不以 panic 的形式冒泡。
//! 因此定义全局统一的 `ConvertError` 枚举，替代分散的
//! `.map_err(|e| e.to_string())`、`format!(...)` 等不一致模式。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 实现 `Serialize` 将错误序列化为字符串，便于跨 IPC 边界透传给前端。
//! - `kind()` 返回稳定的分类名，供上层按类别展示或测试断言。

use serde::Serialize;

/// 转换引擎统一错误类型
///
/// 执行器、嗅探器、配置存储与标签管理均返回此类型，
/// 确保外部宿主收到一致的错误格式。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// 注册表中不存在的 (分类, 方法) 组合
    #[error("未知转换方法: {0}")]
    UnknownMethod(String),

    /// 对单向方法（哈希）请求了解码
    #[error("该方法不可逆: {0}")]
    NotInvertible(String),

    /// 方法要求的配置字段为空（如密钥）
    #[error("缺少必要配置: {0}")]
    MissingConfig(String),

    /// 配置字段存在但不合法（如 IV 长度与块大小不符）
    #[error("配置不合法: {0}")]
    InvalidConfig(String),

    /// 输入无法按所选方法解析（坏字母表、坏填充、损坏密文等）
    #[error("输入格式错误: {0}")]
    MalformedInput(String),

    /// 疑似图片的载荷不是合法 Base64 流
    #[error("无效的 Base64 数据: {0}")]
    InvalidBase64Data(String),

    /// Base64 解码成功但字节无法作为图片解析
    #[error("图片加载失败: {0}")]
    ImageLoadFailed(String),

    /// 快捷标签 ID 重复
    #[error("标签 ID 重复: {0}")]
    DuplicateId(String),

    /// 持久化读写失败
    #[error("存储错误: {0}")]
    Storage(String),
}

impl ConvertError {
    /// 返回稳定的错误分类名
    ///
    /// 前端与测试按该分类区分行为，消息文本仅用于展示。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownMethod(_) => "UnknownMethod",
            Self::NotInvertible(_) => "NotInvertible",
            Self::MissingConfig(_) => "MissingConfig",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::MalformedInput(_) => "MalformedInput",
            Self::InvalidBase64Data(_) => "InvalidBase64Data",
            Self::ImageLoadFailed(_) => "ImageLoadFailed",
            Self::DuplicateId(_) => "DuplicateId",
            Self::Storage(_) => "Storage",
        }
    }
}

/// IPC 边界要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for ConvertError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
