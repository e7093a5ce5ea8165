//! # LSB 编解码核心
//!
//! 每个像素在指定通道的最低位上承载 1 位数据，像素按行优先顺序遍历
//! (先行内从左到右，再从上到下)。编码与解码共用同一遍历顺序和同一通道，
//! 这是往返正确的前提。
//!
//! 图像中不保存载荷长度：解码时调用方必须提供编码时的位数 (`payload.len() * 8`)。
//! 位数给错时得到的只是无法察觉的错误数据；需要自描述长度与完整性校验时请使用
//! [`crate::framing`]。

use crate::bits::{BitAccumulator, bits_msb_first, lsb, set_lsb};
use crate::error::StegoError;
use crate::raster::{CHANNELS, Channel, Raster};

/// 单通道 LSB 编解码器。
///
/// 只保存承载数据的通道，默认 (`Default`) 为红色通道；
/// 编码与解码必须使用同一通道的编解码器。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsbCodec {
    channel: Channel,
}

impl LsbCodec {
    /// 创建在 `channel` 上读写数据的编解码器。
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// 承载数据的通道。
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// 图像可承载的位数，即像素数。
    pub fn capacity_bits(&self, raster: &Raster) -> u64 {
        raster.pixel_count()
    }

    /// 将载荷写入图像副本，原图不会被修改。
    ///
    /// # Errors
    ///
    /// 像素数少于载荷位数时返回 [`StegoError::InsufficientCapacity`]，此时不做任何写入。
    pub fn encode(&self, raster: &Raster, payload: &[u8]) -> Result<Raster, StegoError> {
        let required = payload.len() as u64 * 8;
        let available = self.capacity_bits(raster);
        if required > available {
            return Err(StegoError::InsufficientCapacity {
                required,
                available,
            });
        }

        Ok(self.encode_truncating(raster, payload))
    }

    /// 兼容旧行为的编码：像素用尽后剩余的载荷位被静默丢弃。
    pub fn encode_truncating(&self, raster: &Raster, payload: &[u8]) -> Raster {
        let mut output = raster.clone();
        let offset = self.channel.offset();

        output
            .as_raw_mut()
            .chunks_exact_mut(CHANNELS)
            .zip(bits_msb_first(payload))
            .for_each(|(pixel, bit)| set_lsb(&mut pixel[offset], bit));

        output
    }

    /// 读出 `bit_count` 位并重组为字节，结果长度为 `ceil(bit_count / 8)`。
    /// 位数不是 8 的倍数时，最后一个字节的低位以 0 补齐。
    ///
    /// # Errors
    ///
    /// `bit_count` 超过像素数时返回 [`StegoError::InsufficientPixels`]。
    pub fn decode(&self, raster: &Raster, bit_count: u64) -> Result<Vec<u8>, StegoError> {
        let available = self.capacity_bits(raster);
        if bit_count > available {
            return Err(StegoError::InsufficientPixels {
                requested: bit_count,
                available,
            });
        }

        Ok(self.decode_partial(raster, bit_count))
    }

    /// 兼容旧行为的解码：图像在读满 `bit_count` 位之前耗尽时，
    /// 返回已完成的字节加上补零后的残余字节，不报错。
    pub fn decode_partial(&self, raster: &Raster, bit_count: u64) -> Vec<u8> {
        let offset = self.channel.offset();
        let readable = bit_count.min(raster.pixel_count());
        let mut payload = Vec::with_capacity(readable.div_ceil(8) as usize);
        let mut acc = BitAccumulator::new();

        for pixel in raster
            .as_raw()
            .chunks_exact(CHANNELS)
            .take(readable as usize)
        {
            if let Some(byte) = acc.push(lsb(pixel[offset])) {
                payload.push(byte);
            }
        }

        payload.extend(acc.finish());
        payload
    }
}
