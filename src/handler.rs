//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover`、`capacity` 以及 `keygen`、`sign`、`verify` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写与签名算法以及向用户报告结果。
//! 编解码器本身只会因容量问题失败，其余所有错误都在这里以 `anyhow` 的形式附上上下文。

use crate::cli::{CapacityArgs, HideArgs, KeygenArgs, RecoverArgs, SignArgs, VerifyArgs};
use crate::constants::{
    HIDDEN_IMAGE_PREFIX, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, RECOVERED_EXTENSION, RECOVERED_PREFIX,
    SIGNATURE_EXTENSION,
};
use crate::framing::{max_payload_bytes, seal, sealed_bits, unseal};
use crate::raster::Raster;
use crate::signing::{
    KeyPair, attach, detach, private_key_from_pem, public_key_from_pem, sign, verify,
};
use crate::steganography::LsbCodec;
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和载荷文件、(可选) 对载荷签名、检查隐写空间是否足够、调用编码器写入载荷，
/// 最后将结果写入目标图像文件。原始模式下会打印恢复时需要的位数。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及编码选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像、载荷或私钥文件。
/// * 图像没有足够的像素来隐藏载荷。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let picture = Raster::open(&args.image)?;

    let mut payload = fs::read(&args.payload).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    if let Some(key_path) = &args.sign_key {
        let key = read_private_key(key_path)?;
        payload = attach(&key, &payload).context("Failed to sign the payload.")?;
        debug!("signed payload with {}", key_path.display());
    }

    let codec = LsbCodec::new(args.channel);
    let available_space = codec.capacity_bits(&picture);
    let required_space = if args.sealed {
        sealed_bits(payload.len())
    } else {
        payload.len() as u64 * 8
    };
    debug!(
        "hide: {}x{} image, {} payload bytes, channel {:?}, sealed {}",
        picture.width(),
        picture.height(),
        payload.len(),
        args.channel,
        args.sealed
    );

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the payload. \nRequired: {} bits, Available: {} bits",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let hidden = if args.sealed {
        seal(&codec, &picture, &payload)
    } else {
        codec.encode(&picture, &payload)
    }
    .context("Failed to embed the payload into the image.")?;

    hidden.save(&dest)?;
    info!("wrote {} bits into {}", required_space, dest.display());

    println!(
        "The payload has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    if !args.sealed {
        println!(
            "Keep this bit count, it is required to recover the payload: {}",
            required_space.to_string().yellow().bold()
        );
    }

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、按给定位数 (或封装帧) 调用解码器，
/// (可选) 校验并剥离末尾的签名，最后将恢复的数据写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或公钥文件。
/// * 请求的位数超过图像像素数，或封装帧损坏。
/// * 签名校验失败。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&out, args.force)?;

    let picture = Raster::open(&args.image)?;

    let codec = LsbCodec::new(args.channel);
    let recovered = match (args.sealed, args.bits) {
        (true, _) => unseal(&codec, &picture).with_context(|| {
            format!(
                "Failed to recover a sealed payload from '{}'. \nThe image may not contain a sealed frame or is corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?,
        (false, Some(bits)) => codec.decode(&picture, bits).with_context(|| {
            format!(
                "Failed to recover {} bits from '{}'.",
                bits.to_string().red().bold(),
                args.image.to_string_lossy().red().bold()
            )
        })?,
        (false, None) => anyhow::bail!(
            "The bit count is required to recover a raw payload. \nPass {} or {}.",
            "--bits <N>".yellow().bold(),
            "--sealed".yellow().bold()
        ),
    };
    debug!(
        "recovered {} bytes from {}",
        recovered.len(),
        args.image.display()
    );

    let payload = match &args.verify_key {
        Some(key_path) => {
            let key = read_public_key(key_path)?;
            let payload = detach(&key, &recovered).with_context(|| {
                format!(
                    "The signature hidden in '{}' does not match the payload.",
                    args.image.to_string_lossy().red().bold()
                )
            })?;
            println!("{}", "Signature verified.".green().bold());
            payload
        }
        None => &recovered[..],
    };

    fs::write(&out, payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            out.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The payload has been successfully recovered and saved: {}",
        out.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：打印图像的像素数及两种模式下可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = Raster::open(&args.image)?;

    let bits = LsbCodec::default().capacity_bits(&picture);
    let (raw_bytes, sealed_bytes) = max_payload_bytes(bits);

    println!(
        "{}x{} pixels, {} bits available",
        picture.width(),
        picture.height(),
        bits.to_string().green().bold()
    );
    println!(
        "Max payload: {} bytes (raw), {} bytes (sealed)",
        raw_bytes.to_string().green().bold(),
        sealed_bytes.to_string().green().bold()
    );
    Ok(())
}

/// 处理 'Keygen' 命令：生成密钥对并写出 `private.pem` 与 `public.pem`。
///
/// # Errors
///
/// 密钥文件已存在且未指定 `--force`、密钥生成失败或无法写入文件时返回错误。
pub fn handle_keygen(args: KeygenArgs) -> Result<()> {
    let private_path = args.out_dir.join(PRIVATE_KEY_FILE);
    let public_path = args.out_dir.join(PUBLIC_KEY_FILE);
    ensure_writable(&private_path, args.force)?;
    ensure_writable(&public_path, args.force)?;

    let keys = KeyPair::generate(args.bits).with_context(|| {
        format!(
            "Unable to generate a {}-bit RSA key pair.",
            args.bits.to_string().red().bold()
        )
    })?;
    debug!("generated {}-bit key pair", args.bits);

    write_file(&private_path, keys.private_pem()?.as_bytes())?;
    write_file(&public_path, keys.public_pem()?.as_bytes())?;

    println!(
        "The key pair has been generated: {}, {}",
        private_path.to_string_lossy().green().bold(),
        public_path.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Sign' 命令：对载荷文件签名并把原始签名字节写入文件。
pub fn handle_sign(args: SignArgs) -> Result<()> {
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_signature_path(&args.payload));
    ensure_writable(&out, args.force)?;

    let key = read_private_key(&args.key)?;
    let payload = read_file(&args.payload)?;
    let signature = sign(&key, &payload).context("Failed to sign the payload.")?;

    write_file(&out, &signature)?;
    println!(
        "The signature has been saved: {}",
        out.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Verify' 命令：校验签名文件是否与载荷、公钥匹配。
///
/// # Errors
///
/// 任一文件无法读取，或签名无效时返回错误。
pub fn handle_verify(args: VerifyArgs) -> Result<()> {
    let key = read_public_key(&args.key)?;
    let payload = read_file(&args.payload)?;
    let signature = read_file(&args.signature)?;

    verify(&key, &payload, &signature).with_context(|| {
        format!(
            "Unverified signature for: {}",
            args.payload.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Verified signature for: {}",
        args.payload.to_string_lossy().green().bold()
    );
    Ok(())
}

fn read_private_key(path: &Path) -> Result<RsaPrivateKey> {
    let pem = fs::read_to_string(path).with_context(|| {
        format!(
            "Unable to read private key file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    private_key_from_pem(&pem).with_context(|| {
        format!(
            "No PKCS#1 private key found in: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn read_public_key(path: &Path) -> Result<RsaPublicKey> {
    let pem = fs::read_to_string(path).with_context(|| {
        format!(
            "Unable to read public key file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    public_key_from_pem(&pem).with_context(|| {
        format!(
            "No PKCS#1 public key found in: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| {
        format!(
            "Unable to read file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// `dir/name.png` -> `dir/doctored_name.png`
fn default_hidden_path(image: &Path) -> PathBuf {
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_owned());
    image.with_file_name(format!("{HIDDEN_IMAGE_PREFIX}{name}"))
}

/// `dir/name.png` -> `dir/recovered_name.bin`
fn default_recovered_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payload".to_owned());
    image.with_file_name(format!("{RECOVERED_PREFIX}{stem}.{RECOVERED_EXTENSION}"))
}

/// `dir/photo.jpg` -> `dir/photo.jpg.sig`
fn default_signature_path(payload: &Path) -> PathBuf {
    let mut path = OsString::from(payload.as_os_str());
    path.push(".");
    path.push(SIGNATURE_EXTENSION);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_beside_the_input() {
        let image = Path::new("shots/cat.png");
        assert_eq!(
            default_hidden_path(image),
            PathBuf::from("shots/doctored_cat.png")
        );
        assert_eq!(
            default_recovered_path(&default_hidden_path(image)),
            PathBuf::from("shots/recovered_doctored_cat.bin")
        );
        assert_eq!(
            default_signature_path(Path::new("shots/photo.jpg")),
            PathBuf::from("shots/photo.jpg.sig")
        );
    }
}
