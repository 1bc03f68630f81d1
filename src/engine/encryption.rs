//! 加密/解密转换实现（Encrypt - Decrypt 分类）
//!
//! # 设计思路
//!
//! 对称密码的输出是任意字节，统一用标准 Base64 包装成文本；
//! 解密侧先解 Base64 再走密码。密钥与 IV 的**存在性**由执行器
//! 校验（空 → `MissingConfig`），**长度**校验在本模块的
//! `validate_material` 中集中完成（不符 → `InvalidConfig`），
//! 保证所有密码走同一套校验顺序。
//!
//! # 实现思路
//!
//! - AES 固定 256 位密钥，子模式选择 CBC（PKCS#7 填充，IV 16 字节）
//!   或 GCM（带认证标签，nonce 12 字节）。
//! - ChaCha20 为流密码，密钥 32 字节 + nonce 12 字节。
//! - XOR / RC4 接受任意非空密钥。RC4 的 KSA + PRGA 手写实现，
//!   仅用于格式兼容，不提供现代安全性。

use aes::Aes256;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{Engine as _, engine::general_purpose};
use chacha20::ChaCha20;
use cipher::block_padding::Pkcs7;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};

use crate::error::ConvertError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub(super) const AES_KEY_LEN: usize = 32;
pub(super) const CBC_IV_LEN: usize = 16;
pub(super) const GCM_NONCE_LEN: usize = 12;
pub(super) const CHACHA_KEY_LEN: usize = 32;
pub(super) const CHACHA_NONCE_LEN: usize = 12;

/// AES 密钥/IV 长度校验，子模式决定 IV 长度
pub(super) fn validate_aes_material(submode: &str, key: &str, iv: &str) -> Result<(), ConvertError> {
    if key.len() != AES_KEY_LEN {
        return Err(ConvertError::InvalidConfig(format!(
            "AES-256 密钥必须为 {} 字节，当前 {} 字节",
            AES_KEY_LEN,
            key.len()
        )));
    }
    let expected_iv = if submode == "GCM" { GCM_NONCE_LEN } else { CBC_IV_LEN };
    if iv.len() != expected_iv {
        return Err(ConvertError::InvalidConfig(format!(
            "AES-{} 的 IV 必须为 {} 字节，当前 {} 字节",
            submode,
            expected_iv,
            iv.len()
        )));
    }
    Ok(())
}

pub(super) fn validate_chacha_material(key: &str, iv: &str) -> Result<(), ConvertError> {
    if key.len() != CHACHA_KEY_LEN {
        return Err(ConvertError::InvalidConfig(format!(
            "ChaCha20 密钥必须为 {} 字节，当前 {} 字节",
            CHACHA_KEY_LEN,
            key.len()
        )));
    }
    if iv.len() != CHACHA_NONCE_LEN {
        return Err(ConvertError::InvalidConfig(format!(
            "ChaCha20 nonce 必须为 {} 字节，当前 {} 字节",
            CHACHA_NONCE_LEN,
            iv.len()
        )));
    }
    Ok(())
}

fn decode_ciphertext(input: &str) -> Result<Vec<u8>, ConvertError> {
    general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| ConvertError::MalformedInput(format!("密文不是合法 Base64: {}", e)))
}

pub(super) fn aes_cbc(input: &str, encode: bool, key: &str, iv: &str) -> Result<String, ConvertError> {
    if encode {
        let enc = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv.as_bytes())
            .map_err(|e| ConvertError::InvalidConfig(format!("AES-CBC 初始化失败: {}", e)))?;
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(input.as_bytes());
        return Ok(general_purpose::STANDARD.encode(ciphertext));
    }

    let ciphertext = decode_ciphertext(input)?;
    let dec = Aes256CbcDec::new_from_slices(key.as_bytes(), iv.as_bytes())
        .map_err(|e| ConvertError::InvalidConfig(format!("AES-CBC 初始化失败: {}", e)))?;
    let plaintext = dec
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| ConvertError::MalformedInput("AES-CBC 解密失败，填充无效（密钥/IV 不匹配或密文损坏）".to_string()))?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

pub(super) fn aes_gcm(input: &str, encode: bool, key: &str, iv: &str) -> Result<String, ConvertError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| ConvertError::InvalidConfig(format!("AES-GCM 初始化失败: {}", e)))?;
    let nonce = Nonce::from_slice(iv.as_bytes());

    if encode {
        let ciphertext = cipher
            .encrypt(nonce, input.as_bytes())
            .map_err(|_| ConvertError::MalformedInput("AES-GCM 加密失败".to_string()))?;
        return Ok(general_purpose::STANDARD.encode(ciphertext));
    }

    let ciphertext = decode_ciphertext(input)?;
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| ConvertError::MalformedInput("AES-GCM 解密失败，认证标签校验不通过（密钥/nonce 不匹配或密文损坏）".to_string()))?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

pub(super) fn chacha20(input: &str, encode: bool, key: &str, iv: &str) -> Result<String, ConvertError> {
    let mut data = if encode {
        input.as_bytes().to_vec()
    } else {
        decode_ciphertext(input)?
    };

    let mut cipher = ChaCha20::new_from_slices(key.as_bytes(), iv.as_bytes())
        .map_err(|e| ConvertError::InvalidConfig(format!("ChaCha20 初始化失败: {}", e)))?;
    cipher.apply_keystream(&mut data);

    if encode {
        Ok(general_purpose::STANDARD.encode(data))
    } else {
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

/// 循环密钥异或
pub(super) fn xor(input: &str, encode: bool, key: &str) -> Result<String, ConvertError> {
    let key_bytes = key.as_bytes();
    let data = if encode {
        input.as_bytes().to_vec()
    } else {
        decode_ciphertext(input)?
    };

    let mixed: Vec<u8> = data
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ key_bytes[i % key_bytes.len()])
        .collect();

    if encode {
        Ok(general_purpose::STANDARD.encode(mixed))
    } else {
        Ok(String::from_utf8_lossy(&mixed).into_owned())
    }
}

pub(super) fn rc4(input: &str, encode: bool, key: &str) -> Result<String, ConvertError> {
    let data = if encode {
        input.as_bytes().to_vec()
    } else {
        decode_ciphertext(input)?
    };

    let mixed = rc4_keystream(key.as_bytes(), &data);
    if encode {
        Ok(general_purpose::STANDARD.encode(mixed))
    } else {
        Ok(String::from_utf8_lossy(&mixed).into_owned())
    }
}

/// RC4 的 KSA + PRGA
fn rc4_keystream(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);

    let mut j: usize = 0;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) % 256;
        s.swap(i, j);
    }

    let mut i: usize = 0;
    let mut j: usize = 0;
    data.iter()
        .map(|b| {
            i = (i + 1) % 256;
            j = (j + s[i] as usize) % 256;
            s.swap(i, j);
            b ^ s[(s[i] as usize + s[j] as usize) % 256]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY32: &str = "0123456789abcdef0123456789abcdef";
    const IV16: &str = "0123456789abcdef";
    const NONCE12: &str = "0123456789ab";

    #[test]
    fn aes_cbc_round_trip() {
        let ciphertext = aes_cbc("机密 payload", true, KEY32, IV16).expect("encrypt");
        assert_ne!(ciphertext, "机密 payload");
        assert_eq!(aes_cbc(&ciphertext, false, KEY32, IV16).expect("decrypt"), "机密 payload");
    }

    #[test]
    fn aes_cbc_wrong_key_fails_as_malformed() {
        let ciphertext = aes_cbc("secret", true, KEY32, IV16).expect("encrypt");
        let other_key = "fedcba9876543210fedcba9876543210";
        let err = aes_cbc(&ciphertext, false, other_key, IV16).expect_err("must fail");
        assert_eq!(err.kind(), "MalformedInput");
    }

    #[test]
    fn aes_gcm_round_trip_and_detects_tampering() {
        let ciphertext = aes_gcm("secret", true, KEY32, NONCE12).expect("encrypt");
        assert_eq!(aes_gcm(&ciphertext, false, KEY32, NONCE12).expect("decrypt"), "secret");

        let mut tampered = general_purpose::STANDARD.decode(&ciphertext).expect("decode");
        tampered[0] ^= 0x01;
        let tampered = general_purpose::STANDARD.encode(tampered);
        assert!(aes_gcm(&tampered, false, KEY32, NONCE12).is_err());
    }

    #[test]
    fn chacha20_round_trip() {
        let ciphertext = chacha20("hello", true, KEY32, NONCE12).expect("encrypt");
        assert_eq!(chacha20(&ciphertext, false, KEY32, NONCE12).expect("decrypt"), "hello");
    }

    #[test]
    fn xor_round_trip_with_short_key() {
        let ciphertext = xor("hello world", true, "k").expect("encrypt");
        assert_eq!(xor(&ciphertext, false, "k").expect("decrypt"), "hello world");
    }

    #[test]
    fn rc4_round_trip_matches_known_vector() {
        // RFC 6229 风格经典向量: Key="Key", Plaintext="Plaintext"
        let ciphertext = rc4("Plaintext", true, "Key").expect("encrypt");
        let raw = general_purpose::STANDARD.decode(&ciphertext).expect("decode");
        assert_eq!(hex::encode(raw), "bbf316e8d940af0ad3");
        assert_eq!(rc4(&ciphertext, false, "Key").expect("decrypt"), "Plaintext");
    }

    #[test]
    fn validate_rejects_bad_lengths() {
        assert_eq!(
            validate_aes_material("CBC", "short", IV16).expect_err("bad key").kind(),
            "InvalidConfig"
        );
        assert_eq!(
            validate_aes_material("CBC", KEY32, NONCE12).expect_err("bad iv").kind(),
            "InvalidConfig"
        );
        assert!(validate_aes_material("GCM", KEY32, NONCE12).is_ok());
        assert_eq!(
            validate_chacha_material(KEY32, IV16).expect_err("bad nonce").kind(),
            "InvalidConfig"
        );
    }

    #[test]
    fn decode_rejects_non_base64_ciphertext() {
        let err = aes_cbc("!!! 不是密文 !!!", false, KEY32, IV16).expect_err("must fail");
        assert_eq!(err.kind(), "MalformedInput");
    }
}
