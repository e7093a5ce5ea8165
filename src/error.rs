//! # 错误类型模块
//!
//! 编解码器只会因容量问题失败 (`StegoError`)；签名相关的失败单独归入 `SignError`。
//! 文件 I/O 等应用层错误不在这里，由 `handler` 以 `anyhow` 附上上下文。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 图像像素数少于载荷位数。
    #[error(
        "Capacity Error: the payload needs {required} bits but the image only carries {available}"
    )]
    InsufficientCapacity { required: u64, available: u64 },

    /// 请求读取的位数超过图像像素数。
    #[error("Decode Error: requested {requested} bits but the image only carries {available}")]
    InsufficientPixels { requested: u64, available: u64 },

    /// 封装帧头声明的长度无法放入图像
    #[error("Frame Error: declared payload of {declared} bytes does not fit into the image")]
    FrameTooLarge { declared: u64 },

    /// 封装帧中的摘要与载荷不一致。
    #[error("Integrity Error: payload digest mismatch")]
    IntegrityMismatch,
}

#[derive(Error, Debug)]
pub enum SignError {
    /// RSA 密钥对生成失败。
    #[error("Key Error: unable to generate an RSA key pair")]
    KeyGeneration(#[source] rsa::Error),

    /// PEM 编码或解码失败，例如文件中没有 PKCS#1 密钥。
    #[error("Key Error: invalid PKCS#1 PEM data")]
    Pem(#[from] rsa::pkcs1::Error),

    /// 签名计算失败。
    #[error("Signing Error: unable to sign the payload")]
    Signing(#[source] rsa::signature::Error),

    /// 签名长度与公钥不符。
    #[error("Signature Error: expected a {expected} byte signature, got {actual} bytes")]
    SignatureLength { expected: usize, actual: usize },

    /// 签名与数据不匹配。
    #[error("Signature Error: signature does not match the payload")]
    VerificationFailed,
}
