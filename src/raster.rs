//! # 像素网格模块
//!
//! `Raster` 是编解码器操作的像素缓冲区：宽、高以及按行优先存放的 RGBA 字节。
//! 与文件格式相关的解码、编码都交给 `image` crate，本模块只负责两者之间的转换。

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use image::{ExtendedColorType, ImageFormat, RgbaImage};
use std::path::Path;

/// 每个像素的通道数 (R, G, B, A)。
pub const CHANNELS: usize = 4;

/// 承载隐藏数据的颜色通道。Alpha 通道从不用于隐写。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    /// 通道在一个 RGBA 像素中的偏移。
    pub fn offset(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// 行优先存储的 RGBA 像素网格，原点位于左上角。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// 创建一个全零 (透明黑) 的网格。
    ///
    /// # Panics
    ///
    /// `width * height * 4` 超出 `usize` 时 panic，与 `Vec` 分配失败的行为一致。
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0; 4])
    }

    /// 由原始 RGBA 字节构造网格。字节数与尺寸不符时返回 `None`。
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (Some(data.len()) == buffer_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// 创建一个每个像素都相同的网格。
    ///
    /// # Panics
    ///
    /// 与 [`Raster::new`] 相同，缓冲区大小溢出时 panic。
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let len = buffer_len(width, height).expect("raster dimensions overflow usize");
        Self {
            width,
            height,
            data: pixel.repeat(len / CHANNELS),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// 读取 `(x, y)` 处的像素。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic，与切片索引的行为一致。
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = self.index_of(x, y);
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.data[start..start + CHANNELS]);
        pixel
    }

    /// 写入 `(x, y)` 处的像素。坐标越界时 panic。
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let start = self.index_of(x, y);
        self.data[start..start + CHANNELS].copy_from_slice(&pixel);
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) is outside of a {}x{} raster",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// 从文件读取图像，任意 `image` 支持的格式都会被转换为 RGBA8。
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
        Ok(Self::from(img.to_rgba8()))
    }

    /// 将网格写入文件，格式由扩展名决定，且必须是无损格式。
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path).with_context(|| {
            format!(
                "Unable to determine image format from extension: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

        anyhow::ensure!(
            is_lossless(format),
            "Output format {:?} would destroy the hidden bits. \nUse PNG, BMP, TIFF, WebP or QOI instead.",
            format
        );

        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
            format,
        )
        .with_context(|| {
            format!(
                "Unable to write image file: {}",
                path.to_string_lossy().red().bold()
            )
        })
    }

    /// 转换为 `image::RgbaImage`，直接移交底层缓冲区。
    pub fn into_image(self) -> RgbaImage {
        let (width, height) = (self.width, self.height);
        // data.len() == width * height * 4
        RgbaImage::from_raw(width, height, self.data)
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }
}

impl From<RgbaImage> for Raster {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// `width * height * 4`，溢出时为 `None`。
fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

fn is_lossless(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Qoi
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_stored_row_major() {
        let mut raster = Raster::new(3, 2);
        raster.set_pixel(2, 0, [1, 2, 3, 4]);
        raster.set_pixel(0, 1, [5, 6, 7, 8]);

        assert_eq!(&raster.as_raw()[8..12], &[1, 2, 3, 4]);
        assert_eq!(&raster.as_raw()[12..16], &[5, 6, 7, 8]);
        assert_eq!(raster.pixel(0, 1), [5, 6, 7, 8]);
    }

    #[test]
    fn from_raw_rejects_mismatched_length() {
        assert!(Raster::from_raw(2, 2, vec![0; 15]).is_none());
        assert!(Raster::from_raw(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn image_conversion_keeps_every_channel() {
        let mut raster = Raster::filled(4, 3, [10, 20, 30, 255]);
        raster.set_pixel(3, 2, [1, 2, 3, 4]);

        let back = Raster::from(raster.clone().into_image());
        assert_eq!(back, raster);
    }

    #[test]
    fn oversized_dimensions_are_rejected_without_allocating() {
        assert!(Raster::from_raw(u32::MAX, u32::MAX, Vec::new()).is_none());
    }

    #[test]
    fn save_then_open_keeps_every_channel() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("grid.png");
        let mut raster = Raster::filled(5, 4, [200, 100, 51, 255]);
        raster.set_pixel(4, 3, [1, 2, 3, 128]);

        raster.save(&path).expect("Failed to save raster");
        assert_eq!(Raster::open(&path).expect("Failed to open raster"), raster);
    }

    #[test]
    fn save_refuses_lossy_formats() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let raster = Raster::new(2, 2);

        let result = raster.save(&dir.path().join("out.jpg"));
        assert!(result.is_err());
    }
}
