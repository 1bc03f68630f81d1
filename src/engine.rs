//! 转换执行器模块
//!
//! # 设计思路
//!
//! 执行器是所有转换请求的唯一入口，对每个请求执行固定顺序的
//! 校验流水线，保证错误分类稳定可预期：
//!
//! 1. 注册表查找 → `UnknownMethod`
//! 2. 单向方法请求解码 → `NotInvertible`
//! 3. 必要配置字段为空 → `MissingConfig`
//! 4. 配置字段长度/取值不合法 → `InvalidConfig`
//! 5. 分发执行，内部失败 → `MalformedInput`
//!
//! 执行本身是纯函数：相同 (请求, 配置) 永远产生相同结果，
//! 不读写任何共享状态。文本输出在成功后交给嗅探器判定是否
//! 为 Base64 图片。
//!
//! # 实现思路
//!
//! 注册表解析出 `TransformKind` 后在 `dispatch` 做单次 `match`，
//! 这是方法路由在整个 crate 中的唯一位置；各分类的具体实现
//! 放在子模块中保持纯函数形态。

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config_store::MethodConfig;
use crate::error::ConvertError;
use crate::registry::{Category, Directionality, MethodDescriptor, TransformKind, registry};
use crate::sniffer;

mod encoding;
mod encryption;
mod escape;
mod formatting;
mod hashing;

/// 转换方向。对 Escape 分类，`Encode` 为转义、`Decode` 为反转义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Encode,
    Decode,
}

/// 一次转换请求的全部输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub category: Category,
    pub method: String,
    /// 子模式；`None` 时使用方法的默认子模式
    #[serde(default)]
    pub submode: Option<String>,
    pub mode: Mode,
    pub input: String,
    #[serde(default)]
    pub config: MethodConfig,
}

/// 转换输出：单段文本，或 "Hash: All" 的多摘要表
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversionOutput {
    Text(String),
    Digests(IndexMap<String, String>),
}

/// 转换结果。`output` 与 `error` 互斥，恰有一个为 `Some`。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ConversionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConvertError>,
    /// 文本输出被嗅探器确认为 Base64 图片
    pub is_image: bool,
}

impl ConversionResult {
    fn success(output: ConversionOutput, is_image: bool) -> Self {
        Self {
            output: Some(output),
            error: None,
            is_image,
        }
    }

    fn failure(error: ConvertError) -> Self {
        Self {
            output: None,
            error: Some(error),
            is_image: false,
        }
    }
}

/// 执行一次转换
///
/// 所有失败都折算进 `ConversionResult::error`，本函数自身不失败，
/// 便于宿主无条件渲染结果。
pub fn execute(request: &ConversionRequest) -> ConversionResult {
    match run(request) {
        Ok(output) => {
            let is_image = match &output {
                ConversionOutput::Text(text) => match sniffer::sniff_image(text) {
                    Ok(is_image) => is_image,
                    Err(err) => return ConversionResult::failure(err),
                },
                ConversionOutput::Digests(_) => false,
            };
            ConversionResult::success(output, is_image)
        }
        Err(err) => {
            log::debug!(
                "转换失败: {} / {} ({}): {}",
                request.category.as_str(),
                request.method,
                err.kind(),
                err
            );
            ConversionResult::failure(err)
        }
    }
}

fn run(request: &ConversionRequest) -> Result<ConversionOutput, ConvertError> {
    let descriptor = registry()
        .lookup(request.category, &request.method)
        .ok_or_else(|| {
            ConvertError::UnknownMethod(format!(
                "{} / {}",
                request.category.as_str(),
                request.method
            ))
        })?;

    if request.mode == Mode::Decode && descriptor.directionality == Directionality::OneWay {
        return Err(ConvertError::NotInvertible(format!(
            "{} 是单向方法，不支持解码",
            descriptor.name
        )));
    }

    let submode = resolve_submode(descriptor, request.submode.as_deref())?;
    validate_config(descriptor, submode, &request.config)?;
    dispatch(descriptor, submode, request)
}

/// 将请求中的子模式规整为方法声明的规范值
///
/// 无子模式的方法忽略请求中的残留值；有子模式的方法在缺省时
/// 取首个（默认）子模式，未声明的值报 `InvalidConfig`。
fn resolve_submode(
    descriptor: &MethodDescriptor,
    requested: Option<&str>,
) -> Result<&'static str, ConvertError> {
    if descriptor.submodes.is_empty() {
        return Ok("");
    }

    let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(descriptor.submodes[0]);
    };

    descriptor
        .submodes
        .iter()
        .find(|s| s.eq_ignore_ascii_case(requested))
        .copied()
        .ok_or_else(|| {
            ConvertError::InvalidConfig(format!(
                "{} 不支持子模式 {}（可选: {}）",
                descriptor.name,
                requested,
                descriptor.submodes.join(", ")
            ))
        })
}

/// 配置校验：先查空（`MissingConfig`），再查长度（`InvalidConfig`）
fn validate_config(
    descriptor: &MethodDescriptor,
    submode: &str,
    config: &MethodConfig,
) -> Result<(), ConvertError> {
    if descriptor.requires_key && config.key.is_empty() {
        return Err(ConvertError::MissingConfig(format!(
            "{} 需要非空密钥",
            descriptor.name
        )));
    }
    if descriptor.requires_iv && config.iv.is_empty() {
        return Err(ConvertError::MissingConfig(format!(
            "{} 需要非空 IV/nonce",
            descriptor.name
        )));
    }

    match descriptor.kind {
        TransformKind::Aes => encryption::validate_aes_material(submode, &config.key, &config.iv),
        TransformKind::ChaCha20 => encryption::validate_chacha_material(&config.key, &config.iv),
        _ => Ok(()),
    }
}

fn dispatch(
    descriptor: &MethodDescriptor,
    submode: &str,
    request: &ConversionRequest,
) -> Result<ConversionOutput, ConvertError> {
    use TransformKind as K;

    let encode = request.mode == Mode::Encode;
    let input = request.input.as_str();
    let config = &request.config;
    // 大小写敏感配置仅对声明了折叠歧义的方法生效
    let case_sensitive = descriptor.case_foldable && config.case_sensitive;

    let text = match descriptor.kind {
        K::Base64 { url_safe } => encoding::base64_codec(input, encode, url_safe)?,
        K::Base16 => encoding::base16(input, encode, case_sensitive)?,
        K::Base32 => encoding::base32(input, encode, case_sensitive)?,
        K::Base58 => encoding::base58(input, encode)?,
        K::Ascii85 => encoding::ascii85(input, encode)?,
        K::UrlCodec => encoding::url_codec(input, encode)?,
        K::QuotedPrintable => encoding::quoted_printable_codec(input, encode)?,
        K::HtmlEntities => encoding::html_entities(input, encode)?,
        K::BinaryBits => encoding::binary_bits(input, encode)?,
        K::MorseCode => encoding::morse(input, encode)?,
        K::Rot13 => encoding::rot13(input),
        K::Rot47 => encoding::rot47(input),
        K::Aes => {
            if submode == "GCM" {
                encryption::aes_gcm(input, encode, &config.key, &config.iv)?
            } else {
                encryption::aes_cbc(input, encode, &config.key, &config.iv)?
            }
        }
        K::Xor => encryption::xor(input, encode, &config.key)?,
        K::Rc4 => encryption::rc4(input, encode, &config.key)?,
        K::ChaCha20 => encryption::chacha20(input, encode, &config.key, &config.iv)?,
        K::EscapeStringLiteral => escape::string_literal(input, encode)?,
        K::EscapeUnicodeHex => escape::unicode_hex(input, encode)?,
        K::EscapeHtmlXml => escape::html_xml(input, encode)?,
        K::EscapeUrl => escape::url(input, encode)?,
        K::EscapeRegex => escape::regex_escape(input, encode)?,
        K::JsonYaml => formatting::json_yaml(input, encode)?,
        K::NumberBases => formatting::number_bases(input, encode, submode)?,
        K::CaseSwap => formatting::case_swap(input),
        K::UnixTimestamp => formatting::unix_timestamp(input, encode)?,
        K::HashAll => {
            return Ok(ConversionOutput::Digests(hashing::compute_all(input, config)));
        }
        K::HashDigest(algo) => hashing::compute(algo, input, config)?,
    };

    Ok(ConversionOutput::Text(text))
}
