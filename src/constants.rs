/// 封装帧头的字节数。
/// 载荷长度以 `u64` 大端序保存，占 8 字节，即 64 个像素。
pub const FRAME_HEADER_BYTES: usize = 8;

/// 封装帧尾部 SHA-256 摘要的字节数。
pub const FRAME_DIGEST_BYTES: usize = 32;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复出的载荷文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 恢复出的载荷文件的默认扩展名。
pub const RECOVERED_EXTENSION: &str = "bin";

/// `keygen` 默认生成的 RSA 模数位数。
pub const DEFAULT_KEY_BITS: usize = 2048;

/// `keygen` 写出的私钥文件名 (PKCS#1 PEM)。
pub const PRIVATE_KEY_FILE: &str = "private.pem";

/// `keygen` 写出的公钥文件名 (PKCS#1 PEM)。
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// 未指定输出路径时，独立签名文件追加的扩展名。
pub const SIGNATURE_EXTENSION: &str = "sig";
