//! # 封装帧模块
//!
//! 原始模式要求调用方自行保存位数。封装模式在载荷前写入长度、在载荷后写入摘要，
//! 使图像本身即可解出载荷并检查完整性：
//!
//! ```text
//! [ 载荷字节数: 8 字节 (u64 BE) | 载荷 | SHA-256(载荷): 32 字节 ]
//! ```
//!
//! 帧仍通过 [`LsbCodec`] 逐位写入，因此与原始模式共用通道和遍历顺序。

use crate::constants::{FRAME_DIGEST_BYTES, FRAME_HEADER_BYTES};
use crate::error::StegoError;
use crate::raster::Raster;
use crate::steganography::LsbCodec;
use sha2::{Digest, Sha256};

/// 载荷封装为帧后需要的总位数。
pub fn sealed_bits(payload_len: usize) -> u64 {
    (FRAME_HEADER_BYTES + payload_len + FRAME_DIGEST_BYTES) as u64 * 8
}

/// 给定可用位数，返回原始模式与封装模式下最多可隐藏的字节数 `(raw, sealed)`。
pub fn max_payload_bytes(capacity_bits: u64) -> (u64, u64) {
    let raw = capacity_bits / 8;
    let sealed = raw.saturating_sub((FRAME_HEADER_BYTES + FRAME_DIGEST_BYTES) as u64);
    (raw, sealed)
}

/// 构造帧并写入图像副本。
///
/// # Errors
///
/// 图像装不下整个帧时返回 [`StegoError::InsufficientCapacity`]。
pub fn seal(codec: &LsbCodec, raster: &Raster, payload: &[u8]) -> Result<Raster, StegoError> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_BYTES + payload.len() + FRAME_DIGEST_BYTES);
    frame.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&Sha256::digest(payload));

    codec.encode(raster, &frame)
}

/// 读取帧头得到长度，再读出载荷并校验摘要。
///
/// # Errors
///
/// * 图像连帧头都放不下：[`StegoError::InsufficientPixels`]。
/// * 帧头声明的长度超出图像容量：[`StegoError::FrameTooLarge`]。
/// * 摘要不匹配 (图像未封装数据或已被修改)：[`StegoError::IntegrityMismatch`]。
pub fn unseal(codec: &LsbCodec, raster: &Raster) -> Result<Vec<u8>, StegoError> {
    let header = codec.decode(raster, FRAME_HEADER_BYTES as u64 * 8)?;
    let mut len_bytes = [0u8; FRAME_HEADER_BYTES];
    len_bytes.copy_from_slice(&header);
    let declared = u64::from_be_bytes(len_bytes);

    let frame_bits = declared
        .checked_add((FRAME_HEADER_BYTES + FRAME_DIGEST_BYTES) as u64)
        .and_then(|bytes| bytes.checked_mul(8))
        .filter(|&bits| bits <= codec.capacity_bits(raster))
        .ok_or(StegoError::FrameTooLarge { declared })?;

    let frame = codec.decode(raster, frame_bits)?;
    let body = &frame[FRAME_HEADER_BYTES..];
    let (payload, digest) = body.split_at(body.len() - FRAME_DIGEST_BYTES);

    if Sha256::digest(payload).as_slice() != digest {
        return Err(StegoError::IntegrityMismatch);
    }

    Ok(payload.to_vec())
}
