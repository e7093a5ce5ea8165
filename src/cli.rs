//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::DEFAULT_KEY_BITS;
use crate::raster::Channel;
use clap::{Args, Parser};
use std::path::PathBuf;

/// 一款基于单通道 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于单通道 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。\n每个像素只承载 1 位，原始模式下恢复时必须提供隐藏时输出的位数。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复)、capacity (容量查询) 以及 RSA 签名相关的 keygen、sign、verify。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的数据。
    Recover(RecoverArgs),

    /// 显示图像最多能隐藏多少数据。
    Capacity(CapacityArgs),

    /// 生成 RSA 密钥对并以 PKCS#1 PEM 格式保存。
    Keygen(KeygenArgs),

    /// 用私钥对文件签名 (PKCS#1 v1.5, SHA-256)。
    Sign(SignArgs),

    /// 用公钥校验文件的签名。
    Verify(VerifyArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Args, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的载荷文件路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 结果图像的输出路径。默认为输入图像旁的 `doctored_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 承载数据的颜色通道。
    #[arg(short, long, value_enum, default_value_t = Channel::Red)]
    pub channel: Channel,

    /// 在载荷前写入长度、在载荷后写入 SHA-256 摘要，恢复时无需提供位数。
    #[arg(short, long)]
    pub sealed: bool,

    /// 用该私钥 (PEM) 对载荷签名，并把签名附在载荷之后一起隐藏。
    #[arg(short = 'k', long)]
    pub sign_key: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复数据的输出路径。默认为输入图像旁的 `recovered_<文件名>.bin`。
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// 隐藏时写入的位数 (原始模式必填)。
    #[arg(short, long, required_unless_present = "sealed", conflicts_with = "sealed")]
    pub bits: Option<u64>,

    /// 图像中的数据以封装帧写入。
    #[arg(short, long)]
    pub sealed: bool,

    /// 承载数据的颜色通道，必须与隐藏时一致。
    #[arg(short, long, value_enum, default_value_t = Channel::Red)]
    pub channel: Channel,

    /// 用该公钥 (PEM) 校验附在载荷末尾的签名，校验通过后只保存载荷本身。
    #[arg(short = 'k', long)]
    pub verify_key: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}

/// 'keygen' 命令所需的参数。
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// 写出 `private.pem` 与 `public.pem` 的目录。
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// RSA 模数位数。
    #[arg(short, long, default_value_t = DEFAULT_KEY_BITS)]
    pub bits: usize,

    /// 覆盖已存在的密钥文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'sign' 命令所需的参数。
#[derive(Args, Debug)]
pub struct SignArgs {
    /// 私钥文件路径 (PKCS#1 PEM)。
    #[arg(short, long)]
    pub key: PathBuf,

    /// 要签名的文件路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 签名的输出路径。默认为 `<载荷路径>.sig`。
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'verify' 命令所需的参数。
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// 公钥文件路径 (PKCS#1 PEM)。
    #[arg(short, long)]
    pub key: PathBuf,

    /// 被签名的文件路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 签名文件路径。
    #[arg(short, long)]
    pub signature: PathBuf,
}
