//! 转义/反转义实现（Escape 分类）
//!
//! # 设计思路
//!
//! Escape 分类复用 Encode/Decode 的方向语义：`Encode` 为转义，
//! `Decode` 为反转义。Unicode/Hex 的反转义用正则批量还原
//! `\uXXXX` / `\u{...}` / `\xNN` 三种形态，正则经
//! `once_cell::sync::Lazy` 只编译一次。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ConvertError;

/// 字符串字面量转义：反斜杠、引号与常见控制字符
pub(super) fn string_literal(input: &str, escape: bool) -> Result<String, ConvertError> {
    if escape {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\'' => out.push_str("\\'"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\0' => out.push_str("\\0"),
                c => out.push(c),
            }
        }
        return Ok(out);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            // 未知转义序列原样保留
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => {
                return Err(ConvertError::MalformedInput(
                    "字符串以孤立的反斜杠结尾".to_string(),
                ));
            }
        }
    }
    Ok(out)
}

static UNICODE_ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\u\{([0-9a-fA-F]{1,6})\}|\\u([0-9a-fA-F]{4})|\\x([0-9a-fA-F]{2})")
        .expect("unicode escape pattern is valid")
});

/// Unicode/Hex 转义：ASCII 可打印字符原样保留，
/// 其余码点转为 `\uXXXX`（BMP 外为 `\u{...}`）
pub(super) fn unicode_hex(input: &str, escape: bool) -> Result<String, ConvertError> {
    if escape {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            let code = c as u32;
            if (0x20..0x7f).contains(&code) {
                out.push(c);
            } else if code <= 0xffff {
                out.push_str(&format!("\\u{:04x}", code));
            } else {
                out.push_str(&format!("\\u{{{:x}}}", code));
            }
        }
        return Ok(out);
    }

    let result = UNICODE_ESCAPE_RE.replace_all(input, |caps: &Captures| {
        let digits = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            // 非法码点（如孤立代理项）原样保留
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(result.into_owned())
}

const XML_ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&apos;"),
];

/// HTML/XML 五个预定义实体的转义与还原
pub(super) fn html_xml(input: &str, escape: bool) -> Result<String, ConvertError> {
    if escape {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match XML_ENTITIES.iter().find(|(ch, _)| *ch == c) {
                Some((_, entity)) => out.push_str(entity),
                None => out.push(c),
            }
        }
        return Ok(out);
    }

    let mut out = input.to_string();
    // &amp; 最后还原，避免二次解码
    for (c, entity) in XML_ENTITIES.iter().rev() {
        out = out.replace(entity, &c.to_string());
    }
    Ok(out)
}

pub(super) fn url(input: &str, escape: bool) -> Result<String, ConvertError> {
    super::encoding::url_codec(input, escape)
}

const REGEX_METACHARS: &str = r"\.+*?()|[]{}^$#&-~";

/// 正则元字符转义；反转义剥掉元字符前的反斜杠
pub(super) fn regex_escape(input: &str, escape: bool) -> Result<String, ConvertError> {
    if escape {
        return Ok(regex::escape(input));
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && chars
                .peek()
                .is_some_and(|next| REGEX_METACHARS.contains(*next) || next.is_whitespace())
        {
            continue;
        }
        out.push(c);
    }
    Ok(out)
}
