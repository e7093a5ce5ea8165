//! # 签名模块
//!
//! 使用 RSA PKCS#1 v1.5 + SHA-256 对载荷签名与验签，密钥以 PKCS#1 PEM 保存。
//! 与编解码器没有数据依赖：两者只是处理同一段字节。签名长度等于公钥模数的字节数，
//! 因此把签名附在载荷之后隐藏时，恢复方可以凭公钥把它切分出来。

use crate::error::SignError;
use rsa::pkcs1::{
    DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding,
};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::rand_core::OsRng;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// 一对 RSA 密钥。
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    /// 生成 `bits` 位的新密钥对。
    pub fn generate(bits: usize) -> Result<Self, SignError> {
        let private = RsaPrivateKey::new(&mut OsRng, bits).map_err(SignError::KeyGeneration)?;
        Ok(Self::from(private))
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// 私钥的 PKCS#1 PEM 文本 (`RSA PRIVATE KEY`)。
    pub fn private_pem(&self) -> Result<String, SignError> {
        let pem = self.private.to_pkcs1_pem(LineEnding::LF)?;
        Ok(pem.as_str().to_owned())
    }

    /// 公钥的 PKCS#1 PEM 文本 (`RSA PUBLIC KEY`)。
    pub fn public_pem(&self) -> Result<String, SignError> {
        Ok(self.public.to_pkcs1_pem(LineEnding::LF)?)
    }
}

impl From<RsaPrivateKey> for KeyPair {
    fn from(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }
}

pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey, SignError> {
    Ok(RsaPrivateKey::from_pkcs1_pem(pem)?)
}

pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, SignError> {
    Ok(RsaPublicKey::from_pkcs1_pem(pem)?)
}

/// 签名的字节数，即模数长度。
pub fn signature_len(key: &RsaPublicKey) -> usize {
    key.size()
}

/// 以 SHA-256 摘要对数据签名。
pub fn sign(key: &RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>, SignError> {
    let signature = SigningKey::<Sha256>::new(key.clone())
        .try_sign(data)
        .map_err(SignError::Signing)?;
    Ok(signature.to_vec())
}

/// 校验签名。
///
/// # Errors
///
/// * 签名长度与公钥模数不符：[`SignError::SignatureLength`]。
/// * 签名与数据不匹配：[`SignError::VerificationFailed`]。
pub fn verify(key: &RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<(), SignError> {
    let expected = signature_len(key);
    if signature.len() != expected {
        return Err(SignError::SignatureLength {
            expected,
            actual: signature.len(),
        });
    }

    let signature =
        Signature::try_from(signature).map_err(|_| SignError::VerificationFailed)?;
    VerifyingKey::<Sha256>::new(key.clone())
        .verify(data, &signature)
        .map_err(|_| SignError::VerificationFailed)
}

/// 将签名附在载荷之后。
pub fn attach(key: &RsaPrivateKey, payload: &[u8]) -> Result<Vec<u8>, SignError> {
    let mut signed = payload.to_vec();
    signed.extend(sign(key, payload)?);
    Ok(signed)
}

/// 从末尾切下签名并校验，成功时返回去掉签名的载荷。
pub fn detach<'a>(key: &RsaPublicKey, signed: &'a [u8]) -> Result<&'a [u8], SignError> {
    let expected = signature_len(key);
    if signed.len() < expected {
        return Err(SignError::SignatureLength {
            expected,
            actual: signed.len(),
        });
    }

    let (payload, signature) = signed.split_at(signed.len() - expected);
    verify(key, payload, signature)?;
    Ok(payload)
}
