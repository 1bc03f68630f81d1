//! 哈希计算实现（Hash 分类，全部单向）
//!
//! # 实现思路
//!
//! RustCrypto 系列算法统一经 `digest::Digest` 泛型入口输出小写
//! 十六进制；校验和类（CRC32 / Adler-32 / FNV-1a）按各自惯例
//! 定宽格式化。"All" 扇出遍历注册表中全部无密钥算法，输出
//! 保持注册顺序。

use digest::Digest;
use hmac::{Hmac, Mac};
use indexmap::IndexMap;
use std::hash::Hasher as _;

use crate::config_store::MethodConfig;
use crate::error::ConvertError;
use crate::registry::{HashAlgorithm, registry};

fn hex_digest<D: Digest>(input: &[u8]) -> String {
    hex::encode(D::digest(input))
}

fn hmac_sha256(input: &[u8], key: &str) -> Result<String, ConvertError> {
    let mut mac = Hmac::<sha2::Sha256>::new_from_slice(key.as_bytes())
        .map_err(|e| ConvertError::InvalidConfig(format!("HMAC 密钥不可用: {}", e)))?;
    mac.update(input);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub(super) fn compute(
    algo: HashAlgorithm,
    input: &str,
    config: &MethodConfig,
) -> Result<String, ConvertError> {
    let bytes = input.as_bytes();
    let digest = match algo {
        HashAlgorithm::Md5 => hex_digest::<md5::Md5>(bytes),
        HashAlgorithm::Sha1 => hex_digest::<sha1::Sha1>(bytes),
        HashAlgorithm::Sha224 => hex_digest::<sha2::Sha224>(bytes),
        HashAlgorithm::Sha256 => hex_digest::<sha2::Sha256>(bytes),
        HashAlgorithm::Sha384 => hex_digest::<sha2::Sha384>(bytes),
        HashAlgorithm::Sha512 => hex_digest::<sha2::Sha512>(bytes),
        HashAlgorithm::Sha3_256 => hex_digest::<sha3::Sha3_256>(bytes),
        HashAlgorithm::Blake2b => hex_digest::<blake2::Blake2b512>(bytes),
        HashAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        HashAlgorithm::Ripemd160 => hex_digest::<ripemd::Ripemd160>(bytes),
        HashAlgorithm::Crc32 => format!("{:08x}", crc32fast::hash(bytes)),
        HashAlgorithm::Adler32 => {
            format!("{:08x}", adler32::RollingAdler32::from_buffer(bytes).hash())
        }
        HashAlgorithm::Murmur3 => {
            let hash = murmur3::murmur3_32(&mut std::io::Cursor::new(bytes), 0)
                .map_err(|e| ConvertError::MalformedInput(format!("MurmurHash3 计算失败: {}", e)))?;
            format!("{:08x}", hash)
        }
        HashAlgorithm::XxHash64 => {
            let mut hasher = twox_hash::XxHash64::with_seed(0);
            hasher.write(bytes);
            format!("{:016x}", hasher.finish())
        }
        HashAlgorithm::Fnv1a => {
            let mut hasher = fnv::FnvHasher::default();
            hasher.write(bytes);
            format!("{:016x}", hasher.finish())
        }
        HashAlgorithm::HmacSha256 => hmac_sha256(bytes, &config.key)?,
    };
    Ok(digest)
}

/// "All" 扇出：注册表内全部无密钥哈希，方法名 → 摘要
pub(super) fn compute_all(input: &str, config: &MethodConfig) -> IndexMap<String, String> {
    registry()
        .fan_out_hashes()
        .map(|(name, algo)| {
            let digest = match compute(algo, input, config) {
                Ok(digest) => digest,
                Err(err) => format!("Error: {}", err),
            };
            (name.to_string(), digest)
        })
        .collect()
}
