//! 格式转换实现（Convert 分类）
//!
//! # 设计思路
//!
//! JSON ↔ YAML 经 `serde_json::Value` 做中间表示：YAML 特有结构
//! （锚点、非字符串键）在进入 `Value` 时丢失，该方法因此登记为
//! 有损。进制转换接受可选的 `0b`/`0o`/`0x` 前缀与符号，输出不带
//! 前缀。时间戳转换固定 UTC，输出 RFC 3339。

use chrono::DateTime;

use crate::error::ConvertError;

/// `Encode` = JSON → YAML，`Decode` = YAML → JSON（pretty 输出）
pub(super) fn json_yaml(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ConvertError::MalformedInput(format!("JSON 解析失败: {}", e)))?;
        return serde_yaml_ng::to_string(&value)
            .map_err(|e| ConvertError::MalformedInput(format!("YAML 序列化失败: {}", e)));
    }

    let value: serde_json::Value = serde_yaml_ng::from_str(input)
        .map_err(|e| ConvertError::MalformedInput(format!("YAML 解析失败: {}", e)))?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| ConvertError::MalformedInput(format!("JSON 序列化失败: {}", e)))
}

fn radix_of(submode: &str) -> u32 {
    match submode {
        "Binary" => 2,
        "Octal" => 8,
        _ => 16,
    }
}

fn format_radix(value: u128, radix: u32) -> String {
    match radix {
        2 => format!("{:b}", value),
        8 => format!("{:o}", value),
        _ => format!("{:x}", value),
    }
}

/// `Encode` = 十进制 → 目标进制，`Decode` = 目标进制 → 十进制
///
/// 解码接受与进制匹配的 `0b`/`0o`/`0x` 前缀（大小写不敏感）。
pub(super) fn number_bases(input: &str, encode: bool, submode: &str) -> Result<String, ConvertError> {
    let radix = radix_of(submode);
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let sign = if negative { "-" } else { "" };

    if encode {
        let value: u128 = digits
            .parse()
            .map_err(|_| ConvertError::MalformedInput(format!("不是十进制整数: {}", trimmed)))?;
        return Ok(format!("{}{}", sign, format_radix(value, radix)));
    }

    let prefix = match radix {
        2 => "0b",
        8 => "0o",
        _ => "0x",
    };
    let digits = digits
        .strip_prefix(prefix)
        .or_else(|| digits.strip_prefix(&prefix.to_uppercase()))
        .unwrap_or(digits);
    let value = u128::from_str_radix(digits, radix).map_err(|_| {
        ConvertError::MalformedInput(format!("不是合法的 {} 进制整数: {}", radix, trimmed))
    })?;
    Ok(format!("{}{}", sign, value))
}

/// 大小写互换：自反变换，编码与解码同义
pub(super) fn case_swap(input: &str) -> String {
    input
        .chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else if c.is_lowercase() {
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                vec![c]
            }
        })
        .collect()
}

/// `Encode` = Unix 秒 → RFC 3339 (UTC)，`Decode` = RFC 3339 → Unix 秒
pub(super) fn unix_timestamp(input: &str, encode: bool) -> Result<String, ConvertError> {
    let trimmed = input.trim();

    if encode {
        let secs: i64 = trimmed
            .parse()
            .map_err(|_| ConvertError::MalformedInput(format!("不是整数时间戳: {}", trimmed)))?;
        let datetime = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ConvertError::MalformedInput(format!("时间戳超出可表示范围: {}", secs)))?;
        return Ok(datetime.to_rfc3339());
    }

    let datetime = DateTime::parse_from_rfc3339(trimmed)
        .map_err(|e| ConvertError::MalformedInput(format!("不是 RFC 3339 时间: {}", e)))?;
    Ok(datetime.timestamp().to_string())
}
