//! 图片嗅探模块
//!
//! # 设计思路
//!
//! 转换成功后的文本输出可能实际是一张 Base64 编码的图片
//! （比如解码了一个 data URI 的载荷）。嗅探器对文本做两级判定：
//!
//! 1. **data URI 路径**：`data:image/...;base64,` 前缀是用户的明确
//!    声明，载荷解不开就报错（`InvalidBase64Data` / `ImageLoadFailed`），
//!    不能静默吞掉。
//! 2. **裸签名路径**：足够长且以常见图片格式的 Base64 签名开头的
//!    文本只是**猜测**，解不开时静默判定为普通文本，不打断转换结果。
//!
//! # 实现思路
//!
//! 先用 `infer` 按魔数做廉价类型判断，再用 `image` 真正解码确认
//! 字节可渲染，两步都过才算图片。

use base64::{Engine as _, engine::general_purpose};
use infer::MatcherType;

use crate::error::ConvertError;

/// 裸签名判定的最小长度，短文本撞上签名前缀的概率太高
const MIN_RAW_CANDIDATE_LEN: usize = 100;

/// 常见图片格式 Base64 编码后的起始签名
/// (JPEG / PNG / GIF / BMP / RIFF-WebP)
const IMAGE_SIGNATURES: &[&str] = &["/9j/", "iVBORw0KGgo", "R0lGOD", "Qk0", "UklGR"];

/// 判定文本是否为 Base64 编码的图片
///
/// `Ok(true)` 表示确认是图片；data URI 路径的失败以错误返回，
/// 裸签名路径的失败折算为 `Ok(false)`。
pub fn sniff_image(text: &str) -> Result<bool, ConvertError> {
    let trimmed = text.trim();

    if let Some(payload) = data_uri_payload(trimmed) {
        let bytes = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ConvertError::InvalidBase64Data(format!("data URI 载荷解码失败: {}", e)))?;
        verify_image_bytes(&bytes)?;
        return Ok(true);
    }

    if trimmed.len() >= MIN_RAW_CANDIDATE_LEN
        && IMAGE_SIGNATURES.iter().any(|sig| trimmed.starts_with(sig))
    {
        let Ok(bytes) = general_purpose::STANDARD.decode(trimmed) else {
            return Ok(false);
        };
        return Ok(verify_image_bytes(&bytes).is_ok());
    }

    Ok(false)
}

/// 提取 `data:image/...;base64,` 后的载荷；非图片 data URI 返回 `None`
fn data_uri_payload(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("data:image/")?;
    let comma = rest.find(";base64,")?;
    Some(&rest[comma + ";base64,".len()..])
}

fn verify_image_bytes(bytes: &[u8]) -> Result<(), ConvertError> {
    let matched = infer::get(bytes)
        .filter(|t| t.matcher_type() == MatcherType::Image)
        .ok_or_else(|| ConvertError::ImageLoadFailed("字节流没有已知图片格式的魔数".to_string()))?;

    image::load_from_memory(bytes).map_err(|e| {
        ConvertError::ImageLoadFailed(format!("{} 解码失败: {}", matched.mime_type(), e))
    })?;
    Ok(())
}
