//! 转换方法注册表模块
//!
//! # 设计思路
//!
//! 所有 (分类, 方法) 组合与其能力元数据（可逆性、密钥/IV 需求、
//! 大小写折叠、子模式列表）集中登记在一张只读表中，进程启动时
//! 构建一次，之后纯查询、永不变更。执行器通过查表获得
//! `TransformKind` 标签后做单点分发，调用侧不再出现任何
//! 字符串比较式的方法路由。
//!
//! # 实现思路
//!
//! - 通过 `once_cell::sync::Lazy` 在首次访问时构建，后续零成本复用。
//! - 方法名在分类内唯一；查找按 ASCII 大小写不敏感匹配。
//! - `OneWay` 的方法永远不暴露解码动作（哈希不可逆）。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// 转换方法所属的顶层分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Encrypt - Decrypt")]
    EncryptDecrypt,
    #[serde(rename = "Encode - Decode")]
    EncodeDecode,
    #[serde(rename = "Escape")]
    Escape,
    #[serde(rename = "Convert")]
    Convert,
    #[serde(rename = "Hash")]
    Hash,
}

impl Category {
    /// 分类的展示标签（与持久化值一致）
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EncryptDecrypt => "Encrypt - Decrypt",
            Self::EncodeDecode => "Encode - Decode",
            Self::Escape => "Escape",
            Self::Convert => "Convert",
            Self::Hash => "Hash",
        }
    }

    /// 从持久化标签解析分类，未知值返回 `None`
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Encrypt - Decrypt" => Some(Self::EncryptDecrypt),
            "Encode - Decode" => Some(Self::EncodeDecode),
            "Escape" => Some(Self::Escape),
            "Convert" => Some(Self::Convert),
            "Hash" => Some(Self::Hash),
            _ => None,
        }
    }
}

/// 方法的方向性：双向（编码 + 解码）或单向（仅正向计算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Directionality {
    Bidirectional,
    OneWay,
}

/// 哈希算法标识，供 `TransformKind::HashDigest` 与 "All" 扇出共用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Blake2b,
    Blake3,
    Ripemd160,
    Crc32,
    Adler32,
    Murmur3,
    XxHash64,
    Fnv1a,
    HmacSha256,
}

/// 分发标签：注册表把 (分类, 方法) 解析为固定的实现变体，
/// 执行器对其做单次 `match`，这是方法路由的唯一位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Base64 { url_safe: bool },
    Base16,
    Base32,
    Base58,
    Ascii85,
    UrlCodec,
    QuotedPrintable,
    HtmlEntities,
    BinaryBits,
    MorseCode,
    Rot13,
    Rot47,
    Aes,
    Xor,
    Rc4,
    ChaCha20,
    EscapeStringLiteral,
    EscapeUnicodeHex,
    EscapeHtmlXml,
    EscapeUrl,
    EscapeRegex,
    JsonYaml,
    NumberBases,
    CaseSwap,
    UnixTimestamp,
    HashAll,
    HashDigest(HashAlgorithm),
}

/// 一个已注册转换方法的完整描述
///
/// 注册后不可变；全体描述符构成注册表。
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    pub category: Category,
    pub name: &'static str,
    pub directionality: Directionality,
    /// 执行前要求非空密钥
    pub requires_key: bool,
    /// 执行前要求 IV/nonce，长度在执行器中按具体算法校验
    pub requires_iv: bool,
    /// 字母表存在大小写折叠歧义（`caseSensitive` 配置仅对这些方法生效）
    pub case_foldable: bool,
    /// 设计上有损（如 Morse 丢弃未知字符），往返律对其豁免
    pub lossy: bool,
    /// 方法特定的子模式变体（有序，可为空）
    pub submodes: &'static [&'static str],
    pub kind: TransformKind,
}

impl MethodDescriptor {
    const fn new(category: Category, name: &'static str, kind: TransformKind) -> Self {
        Self {
            category,
            name,
            directionality: Directionality::Bidirectional,
            requires_key: false,
            requires_iv: false,
            case_foldable: false,
            lossy: false,
            submodes: &[],
            kind,
        }
    }

    const fn one_way(mut self) -> Self {
        self.directionality = Directionality::OneWay;
        self
    }

    const fn with_key(mut self) -> Self {
        self.requires_key = true;
        self
    }

    const fn with_iv(mut self) -> Self {
        self.requires_iv = true;
        self
    }

    const fn case_foldable(mut self) -> Self {
        self.case_foldable = true;
        self
    }

    const fn lossy(mut self) -> Self {
        self.lossy = true;
        self
    }

    const fn with_submodes(mut self, submodes: &'static [&'static str]) -> Self {
        self.submodes = submodes;
        self
    }
}

/// AES 的子模式列表（首个为默认值）
pub const AES_SUBMODES: &[&str] = &["CBC", "GCM"];
/// 进制转换的子模式列表
pub const NUMBER_BASE_SUBMODES: &[&str] = &["Binary", "Octal", "Hexadecimal"];

const CATEGORY_ORDER: [Category; 5] = [
    Category::EncryptDecrypt,
    Category::EncodeDecode,
    Category::Escape,
    Category::Convert,
    Category::Hash,
];

fn build_descriptors() -> Vec<MethodDescriptor> {
    use Category::*;
    use HashAlgorithm as Algo;
    use MethodDescriptor as D;
    use TransformKind as K;

    vec![
        // Encrypt - Decrypt
        D::new(EncryptDecrypt, "AES", K::Aes)
            .with_key()
            .with_iv()
            .with_submodes(AES_SUBMODES),
        D::new(EncryptDecrypt, "XOR", K::Xor).with_key(),
        D::new(EncryptDecrypt, "RC4", K::Rc4).with_key(),
        D::new(EncryptDecrypt, "ChaCha20", K::ChaCha20).with_key().with_iv(),
        // Encode - Decode
        D::new(EncodeDecode, "Base16 (Hex)", K::Base16).case_foldable(),
        D::new(EncodeDecode, "Base32", K::Base32).case_foldable(),
        D::new(EncodeDecode, "Base58", K::Base58),
        D::new(EncodeDecode, "Base64", K::Base64 { url_safe: false }),
        D::new(EncodeDecode, "Base64URL", K::Base64 { url_safe: true }),
        D::new(EncodeDecode, "Base85", K::Ascii85),
        D::new(EncodeDecode, "URL", K::UrlCodec),
        D::new(EncodeDecode, "HTML Entities", K::HtmlEntities),
        D::new(EncodeDecode, "Binary", K::BinaryBits),
        D::new(EncodeDecode, "Morse Code", K::MorseCode).lossy(),
        D::new(EncodeDecode, "ROT13", K::Rot13),
        D::new(EncodeDecode, "ROT47", K::Rot47),
        D::new(EncodeDecode, "Quoted-Printable", K::QuotedPrintable),
        // Escape
        D::new(Escape, "String Literal", K::EscapeStringLiteral),
        D::new(Escape, "Unicode/Hex", K::EscapeUnicodeHex),
        D::new(Escape, "HTML/XML", K::EscapeHtmlXml),
        D::new(Escape, "URL", K::EscapeUrl),
        D::new(Escape, "Regex", K::EscapeRegex),
        // Convert
        D::new(Convert, "JSON ↔ YAML", K::JsonYaml).lossy(),
        D::new(Convert, "Number Bases", K::NumberBases).with_submodes(NUMBER_BASE_SUBMODES),
        D::new(Convert, "Case Swapping", K::CaseSwap),
        D::new(Convert, "Unix Timestamp ↔ ISO 8601", K::UnixTimestamp),
        // Hash（全部单向）
        D::new(Hash, "All", K::HashAll).one_way(),
        D::new(Hash, "MD5", K::HashDigest(Algo::Md5)).one_way(),
        D::new(Hash, "SHA-1", K::HashDigest(Algo::Sha1)).one_way(),
        D::new(Hash, "SHA-224", K::HashDigest(Algo::Sha224)).one_way(),
        D::new(Hash, "SHA-256", K::HashDigest(Algo::Sha256)).one_way(),
        D::new(Hash, "SHA-384", K::HashDigest(Algo::Sha384)).one_way(),
        D::new(Hash, "SHA-512", K::HashDigest(Algo::Sha512)).one_way(),
        D::new(Hash, "SHA-3", K::HashDigest(Algo::Sha3_256)).one_way(),
        D::new(Hash, "BLAKE2b", K::HashDigest(Algo::Blake2b)).one_way(),
        D::new(Hash, "BLAKE3", K::HashDigest(Algo::Blake3)).one_way(),
        D::new(Hash, "RIPEMD-160", K::HashDigest(Algo::Ripemd160)).one_way(),
        D::new(Hash, "CRC32", K::HashDigest(Algo::Crc32)).one_way(),
        D::new(Hash, "Adler-32", K::HashDigest(Algo::Adler32)).one_way(),
        D::new(Hash, "MurmurHash3", K::HashDigest(Algo::Murmur3)).one_way(),
        D::new(Hash, "xxHash", K::HashDigest(Algo::XxHash64)).one_way(),
        D::new(Hash, "FNV-1a", K::HashDigest(Algo::Fnv1a)).one_way(),
        D::new(Hash, "HMAC", K::HashDigest(Algo::HmacSha256)).one_way().with_key(),
    ]
}

/// 只读注册表，持有全部方法描述符
pub struct Registry {
    descriptors: Vec<MethodDescriptor>,
}

impl Registry {
    fn build() -> Self {
        let descriptors = build_descriptors();
        assert_unique_names(&descriptors);
        Self { descriptors }
    }

    /// 按 (分类, 方法名) 查找描述符；未知组合返回 `None`，
    /// 调用方应将其视为配置错误而非崩溃。
    pub fn lookup(&self, category: Category, method: &str) -> Option<&MethodDescriptor> {
        let method = method.trim();
        self.descriptors
            .iter()
            .find(|d| d.category == category && d.name.eq_ignore_ascii_case(method))
    }

    /// 列出某分类下的全部方法（注册顺序）
    pub fn list_methods(&self, category: Category) -> Vec<&MethodDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// 列出全部分类（固定顺序）
    pub fn list_categories(&self) -> &'static [Category] {
        &CATEGORY_ORDER
    }

    /// "Hash: All" 扇出的算法集合：分类内全部无密钥哈希（注册顺序）
    pub(crate) fn fan_out_hashes(&self) -> impl Iterator<Item = (&'static str, HashAlgorithm)> + '_ {
        self.descriptors.iter().filter_map(|d| match d.kind {
            TransformKind::HashDigest(algo) if !d.requires_key => Some((d.name, algo)),
            _ => None,
        })
    }
}

/// 分类内方法名唯一是注册表的根本不变量，启动期即验证
fn assert_unique_names(descriptors: &[MethodDescriptor]) {
    for (i, a) in descriptors.iter().enumerate() {
        for b in &descriptors[i + 1..] {
            assert!(
                !(a.category == b.category && a.name.eq_ignore_ascii_case(b.name)),
                "注册表中存在重复方法: {} / {}",
                a.category.as_str(),
                a.name
            );
        }
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::build);

/// 访问进程级注册表（首次访问时构建，之后只读）
pub fn registry() -> &'static Registry {
    &REGISTRY
}
