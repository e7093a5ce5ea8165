//! # 位操作工具模块
//!
//! 编码器与解码器共享的单字节位运算，以及 MSB 优先的位序约定。
//! 编码按 `bits_msb_first` 的顺序写入位，解码用 `BitAccumulator` 按同一顺序重组字节，
//! 两侧的位序必须一致，往返才能成立。

/// 返回 `byte` 中第 `index` 位，从最高位 (index 0) 开始计数。
///
/// `index` 只取低 3 位，即 0..=7。
pub fn bit_at(byte: u8, index: u8) -> u8 {
    (byte >> (7 - (index & 0x7))) & 1
}

/// 返回字节的最低有效位：偶数为 0，奇数为 1。
pub fn lsb(byte: u8) -> u8 {
    byte & 1
}

/// 清除最低位后写入 `bit`，其余 7 位保持不变。
pub fn set_lsb(byte: &mut u8, bit: u8) {
    *byte = (*byte & 0xFE) | (bit & 1);
}

/// 按载荷字节顺序、每字节从最高位开始，逐位产出载荷。
pub fn bits_msb_first(payload: &[u8]) -> impl Iterator<Item = u8> + '_ {
    payload
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| bit_at(byte, i)))
}

/// 解码时的定宽位累加器，保存当前字节中尚未凑满的 0–7 位。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitAccumulator {
    value: u8,
    len: u8,
}

impl BitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一位 (先到的位落在高位)。凑满 8 位时返回完整字节并清空累加器。
    pub fn push(&mut self, bit: u8) -> Option<u8> {
        self.value = (self.value << 1) | (bit & 1);
        self.len += 1;

        if self.len == 8 {
            let byte = self.value;
            *self = Self::default();
            Some(byte)
        } else {
            None
        }
    }

    /// 当前已累积但尚未成字节的位数。
    pub fn pending(&self) -> u8 {
        self.len
    }

    /// 结束累积：若存在不足 8 位的残余，则在右侧补零成一个字节。
    pub fn finish(self) -> Option<u8> {
        match self.len {
            0 => None,
            n => Some(self.value << (8 - n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_at_counts_from_most_significant_bit() {
        let byte = 0b1011_0000;
        let bits: Vec<u8> = (0..8).map(|i| bit_at(byte, i)).collect();
        assert_eq!(bits, vec![1, 0, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn lsb_reflects_parity() {
        assert_eq!(lsb(0), 0);
        assert_eq!(lsb(7), 1);
        assert_eq!(lsb(254), 0);
        assert_eq!(lsb(255), 1);
    }

    #[test]
    fn set_lsb_only_touches_low_bit() {
        let mut byte = 0b1010_1010;
        set_lsb(&mut byte, 1);
        assert_eq!(byte, 0b1010_1011);
        set_lsb(&mut byte, 0);
        assert_eq!(byte, 0b1010_1010);

        let mut full = 0xFF;
        set_lsb(&mut full, 0);
        assert_eq!(full, 0xFE);
    }

    #[test]
    fn accumulator_rebuilds_msb_first_order() {
        let payload = [0xA5u8, 0x3C];
        let mut acc = BitAccumulator::new();
        let rebuilt: Vec<u8> = bits_msb_first(&payload)
            .filter_map(|bit| acc.push(bit))
            .collect();

        assert_eq!(rebuilt, payload);
        assert_eq!(acc.pending(), 0);
        assert_eq!(acc.finish(), None);
    }

    #[test]
    fn accumulator_pads_partial_byte_with_zeros() {
        let mut acc = BitAccumulator::new();
        for bit in [1, 1, 0] {
            assert_eq!(acc.push(bit), None);
        }
        assert_eq!(acc.pending(), 3);
        assert_eq!(acc.finish(), Some(0b1100_0000));
    }
}
