//! # lsb_stego 库
//!
//! 本库包含单通道 LSB 隐写工具的核心逻辑：位运算工具、像素网格、
//! 原始模式编解码器、带长度与摘要的封装帧，
//! 以及对载荷做 RSA 签名与验签的工具。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod raster;
pub mod signing;
pub mod steganography;

pub use error::{SignError, StegoError};
pub use raster::{Channel, Raster};
pub use steganography::LsbCodec;
