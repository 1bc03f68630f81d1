//! 编码/解码转换实现（Encode - Decode 分类）
//!
//! # 设计思路
//!
//! 全部为无状态纯函数：输入字符串 + 方向，输出字符串或
//! `ConvertError::MalformedInput`。二进制到文本的编码统一在
//! 解码侧用 `from_utf8_lossy` 呈现字节，避免对任意字节 panic。

use base64::{Engine as _, engine::general_purpose};
use data_encoding::BASE32;

use crate::error::ConvertError;

pub(super) fn base64_codec(input: &str, encode: bool, url_safe: bool) -> Result<String, ConvertError> {
    let engine = if url_safe {
        &general_purpose::URL_SAFE
    } else {
        &general_purpose::STANDARD
    };

    if encode {
        return Ok(engine.encode(input.as_bytes()));
    }

    let decoded = engine
        .decode(input.trim())
        .map_err(|e| ConvertError::MalformedInput(format!("Base64 解码失败: {}", e)))?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Base16 (Hex)。编码固定输出小写；解码在大小写敏感模式下
/// 只接受小写字母，不敏感模式下接受混合大小写。
pub(super) fn base16(input: &str, encode: bool, case_sensitive: bool) -> Result<String, ConvertError> {
    if encode {
        return Ok(hex::encode(input.as_bytes()));
    }

    let trimmed = input.trim();
    if case_sensitive && trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(ConvertError::MalformedInput(
            "大小写敏感模式下 Hex 输入只接受小写字母".to_string(),
        ));
    }

    let decoded = hex::decode(trimmed)
        .map_err(|e| ConvertError::MalformedInput(format!("Hex 解码失败: {}", e)))?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Base32 (RFC 4648)。编码固定输出大写；解码在不敏感模式下先折叠为大写。
pub(super) fn base32(input: &str, encode: bool, case_sensitive: bool) -> Result<String, ConvertError> {
    if encode {
        return Ok(BASE32.encode(input.as_bytes()));
    }

    let trimmed = input.trim();
    let folded;
    let candidate = if case_sensitive {
        trimmed
    } else {
        folded = trimmed.to_ascii_uppercase();
        &folded
    };

    let decoded = BASE32
        .decode(candidate.as_bytes())
        .map_err(|e| ConvertError::MalformedInput(format!("Base32 解码失败: {}", e)))?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

pub(super) fn base58(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        return Ok(bs58::encode(input.as_bytes()).into_string());
    }

    let decoded = bs58::decode(input.trim())
        .into_vec()
        .map_err(|e| ConvertError::MalformedInput(format!("Base58 解码失败: {}", e)))?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Adobe 风格 ASCII85：4 字节一组映射为 5 个 `!`..`u` 字符，
/// 输出带 `<~` / `~>` 定界符；解码接受 `z` 零组缩写并忽略空白。
pub(super) fn ascii85(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        let mut out = String::from("<~");
        for chunk in input.as_bytes().chunks(4) {
            let mut value: u32 = 0;
            for j in 0..4 {
                value = (value << 8) | u32::from(chunk.get(j).copied().unwrap_or(0));
            }
            let mut digits = [0u8; 5];
            for digit in digits.iter_mut().rev() {
                *digit = (value % 85) as u8;
                value /= 85;
            }
            // 尾组 n 字节只输出前 n+1 个字符
            for &digit in digits.iter().take(chunk.len() + 1) {
                out.push((b'!' + digit) as char);
            }
        }
        out.push_str("~>");
        return Ok(out);
    }

    let trimmed = input.trim();
    let body = trimmed.strip_prefix("<~").unwrap_or(trimmed);
    let body = body.strip_suffix("~>").unwrap_or(body);

    let mut bytes = Vec::new();
    let mut group = [0u8; 5];
    let mut len = 0usize;
    for c in body.chars().filter(|c| !c.is_whitespace()) {
        if c == 'z' && len == 0 {
            bytes.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let digit = (c as u32)
            .checked_sub(u32::from(b'!'))
            .filter(|d| *d < 85)
            .ok_or_else(|| ConvertError::MalformedInput(format!("无效的 ASCII85 字符: {}", c)))?;
        group[len] = digit as u8;
        len += 1;
        if len == 5 {
            bytes.extend_from_slice(&fold_ascii85_group(&group)?);
            len = 0;
        }
    }

    match len {
        0 => {}
        1 => {
            return Err(ConvertError::MalformedInput(
                "ASCII85 尾组长度不能为 1".to_string(),
            ));
        }
        _ => {
            // 尾组补最大字符 `u`，只取前 len-1 个字节
            for digit in group.iter_mut().take(5).skip(len) {
                *digit = 84;
            }
            let decoded = fold_ascii85_group(&group)?;
            bytes.extend_from_slice(&decoded[..len - 1]);
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn fold_ascii85_group(group: &[u8; 5]) -> Result<[u8; 4], ConvertError> {
    let mut value: u64 = 0;
    for &digit in group {
        value = value * 85 + u64::from(digit);
    }
    if value > u64::from(u32::MAX) {
        return Err(ConvertError::MalformedInput(
            "ASCII85 组数值超出 32 位范围".to_string(),
        ));
    }
    Ok((value as u32).to_be_bytes())
}

pub(super) fn quoted_printable_codec(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        return Ok(quoted_printable::encode_to_str(input.as_bytes()));
    }

    let decoded = quoted_printable::decode(input.as_bytes(), quoted_printable::ParseMode::Strict)
        .map_err(|e| ConvertError::MalformedInput(format!("Quoted-Printable 解码失败: {}", e)))?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// URL 查询转义字符集：保留 RFC 3986 非保留字符，其余全部转义。
const URL_ESCAPE_SET: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(super) fn url_codec(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        return Ok(percent_encoding::utf8_percent_encode(input, URL_ESCAPE_SET).to_string());
    }

    // 解码侧额外接受 `+` 作为空格，兼容查询字符串风格的输入
    let normalized = input.replace('+', " ");
    let decoded = percent_encoding::percent_decode_str(&normalized)
        .decode_utf8()
        .map_err(|e| ConvertError::MalformedInput(format!("URL 解码结果不是合法 UTF-8: {}", e)))?;
    Ok(decoded.into_owned())
}

pub(super) fn html_entities(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        Ok(html_escape::encode_safe(input).into_owned())
    } else {
        Ok(html_escape::decode_html_entities(input).into_owned())
    }
}

/// 每字节 8 位二进制，空格分隔
pub(super) fn binary_bits(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        let groups: Vec<String> = input.bytes().map(|b| format!("{:08b}", b)).collect();
        return Ok(groups.join(" "));
    }

    let mut bytes = Vec::new();
    for group in input.split_whitespace() {
        let byte = u8::from_str_radix(group, 2)
            .map_err(|_| ConvertError::MalformedInput(format!("无效的二进制分组: {}", group)))?;
        bytes.push(byte);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"), ('B', "-..."), ('C', "-.-."), ('D', "-.."), ('E', "."),
    ('F', "..-."), ('G', "--."), ('H', "...."), ('I', ".."), ('J', ".---"),
    ('K', "-.-"), ('L', ".-.."), ('M', "--"), ('N', "-."), ('O', "---"),
    ('P', ".--."), ('Q', "--.-"), ('R', ".-."), ('S', "..."), ('T', "-"),
    ('U', "..-"), ('V', "...-"), ('W', ".--"), ('X', "-..-"), ('Y', "-.--"),
    ('Z', "--.."), ('1', ".----"), ('2', "..---"), ('3', "...--"),
    ('4', "....-"), ('5', "....."), ('6', "-...."), ('7', "--..."),
    ('8', "---.."), ('9', "----."), ('0', "-----"), (' ', "/"),
];

/// Morse 码：有损（折叠大小写，丢弃表外字符）
pub(super) fn morse(input: &str, encode: bool) -> Result<String, ConvertError> {
    if encode {
        let groups: Vec<&str> = input
            .to_uppercase()
            .chars()
            .filter_map(|c| MORSE_TABLE.iter().find(|(ch, _)| *ch == c).map(|(_, m)| *m))
            .collect();
        return Ok(groups.join(" "));
    }

    let text: String = input
        .split(' ')
        .filter_map(|code| MORSE_TABLE.iter().find(|(_, m)| *m == code).map(|(ch, _)| *ch))
        .collect();
    Ok(text)
}

/// ROT13：自反变换，编码与解码为同一操作
pub(super) fn rot13(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'a'..='z' => (b'a' + (c as u8 - b'a' + 13) % 26) as char,
            'A'..='Z' => (b'A' + (c as u8 - b'A' + 13) % 26) as char,
            _ => c,
        })
        .collect()
}

/// ROT47：可见 ASCII 区（33–126）的自反移位
pub(super) fn rot47(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let v = c as u32;
            if (33..=126).contains(&v) {
                char::from_u32(33 + (v - 33 + 47) % 94).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_encodes_hello() {
        assert_eq!(base64_codec("hello", true, false).expect("encode"), "aGVsbG8=");
    }

    #[test]
    fn base64_rejects_bad_alphabet() {
        let err = base64_codec("!!!not-base64!!!", false, false).expect_err("must fail");
        assert_eq!(err.kind(), "MalformedInput");
    }

    #[test]
    fn base64_url_safe_uses_url_alphabet() {
        let encoded = base64_codec("\u{fffd}\u{fffd}?", true, true).expect("encode");
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn hex_decode_accepts_mixed_case_when_insensitive() {
        assert_eq!(base16("68656C6C6F", false, false).expect("decode"), "hello");
    }

    #[test]
    fn hex_decode_rejects_uppercase_when_sensitive() {
        let err = base16("68656C6C6F", false, true).expect_err("must fail");
        assert_eq!(err.kind(), "MalformedInput");
        assert_eq!(base16("68656c6c6f", false, true).expect("decode"), "hello");
    }

    #[test]
    fn base32_round_trip_with_case_folding() {
        let encoded = base32("hello", true, false).expect("encode");
        assert_eq!(encoded, "NBSWY3DP");
        assert_eq!(base32(&encoded.to_lowercase(), false, false).expect("decode"), "hello");
    }

    #[test]
    fn base58_round_trip() {
        let encoded = base58("hello", true).expect("encode");
        assert_eq!(base58(&encoded, false).expect("decode"), "hello");
    }

    #[test]
    fn ascii85_matches_adobe_framing() {
        // 经典向量: "Man" -> 9jqo^
        assert_eq!(ascii85("Man", true).expect("encode"), "<~9jqo~>");
        assert_eq!(ascii85("<~9jqo~>", false).expect("decode"), "Man");

        let encoded = ascii85("sure.", true).expect("encode");
        assert!(encoded.starts_with("<~") && encoded.ends_with("~>"));
        assert_eq!(ascii85(&encoded, false).expect("decode"), "sure.");
    }

    #[test]
    fn ascii85_decodes_zero_group_shorthand() {
        assert_eq!(ascii85("<~z~>", false).expect("decode"), "\0\0\0\0");
    }

    #[test]
    fn ascii85_rejects_bad_input() {
        assert_eq!(
            ascii85("<~9jqo\u{7f}~>", false).expect_err("bad char").kind(),
            "MalformedInput"
        );
        // 孤立的单字符尾组无法携带任何字节
        assert_eq!(
            ascii85("<~9~>", false).expect_err("short tail").kind(),
            "MalformedInput"
        );
    }

    #[test]
    fn quoted_printable_round_trip() {
        let raw = "中文=equals\ttab";
        let encoded = quoted_printable_codec(raw, true).expect("encode");
        assert!(encoded.contains("=3D"));
        assert_eq!(quoted_printable_codec(&encoded, false).expect("decode"), raw);
    }

    #[test]
    fn quoted_printable_rejects_bad_escape() {
        let err = quoted_printable_codec("broken=Z1", false).expect_err("must fail");
        assert_eq!(err.kind(), "MalformedInput");
    }

    #[test]
    fn url_encodes_space_and_reserved() {
        assert_eq!(url_codec("a b&c", true).expect("encode"), "a%20b%26c");
        assert_eq!(url_codec("a%20b%26c", false).expect("decode"), "a b&c");
        assert_eq!(url_codec("a+b", false).expect("decode"), "a b");
    }

    #[test]
    fn html_entities_round_trip() {
        let encoded = html_entities("<a href=\"x\">&'", true).expect("encode");
        assert!(!encoded.contains('<'));
        assert_eq!(html_entities(&encoded, false).expect("decode"), "<a href=\"x\">&'");
    }

    #[test]
    fn binary_round_trip_and_rejects_garbage() {
        let encoded = binary_bits("Hi", true).expect("encode");
        assert_eq!(encoded, "01001000 01101001");
        assert_eq!(binary_bits(&encoded, false).expect("decode"), "Hi");
        assert!(binary_bits("01001000 21101001", false).is_err());
    }

    #[test]
    fn morse_encodes_and_decodes_sos() {
        assert_eq!(morse("SOS", true).expect("encode"), "... --- ...");
        assert_eq!(morse("... --- ...", false).expect("decode"), "SOS");
    }

    #[test]
    fn rot13_is_self_inverse() {
        assert_eq!(rot13("Hello"), "Uryyb");
        assert_eq!(rot13(&rot13("Hello, 世界")), "Hello, 世界");
    }

    #[test]
    fn rot47_is_self_inverse() {
        assert_eq!(rot47(&rot47("Hello!")), "Hello!");
    }
}
