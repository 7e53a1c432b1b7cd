// Bit string
//------------------------------------------------------------------------------

/// Growable MSB-first bit buffer backing the per-tier encodings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length in whole bytes, the final partial byte zero-padded.
    pub fn byte_len(&self) -> usize {
        (self.len + 7) >> 3
    }

    /// Packed bits, MSB first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len, "Bit index out of range: {i} >= {}", self.len);
        self.data[i >> 3] >> (7 - (i & 7)) & 1 == 1
    }

    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    /// Pushes the low `size` bits of `bits`, most significant first.
    pub fn push_bits(&mut self, bits: u32, size: usize) {
        debug_assert!(
            size == 32 || bits >> size == 0,
            "Bit count exceeds bit length: Length {size}, Bits {bits}"
        );

        for i in (0..size).rev() {
            self.push(bits >> i & 1 == 1);
        }
    }

    pub fn extend(&mut self, other: &BitString) {
        for i in 0..other.len {
            self.push(other.bit(i));
        }
    }
}

#[cfg(test)]
mod bitstring_tests {
    use super::BitString;

    #[test]
    fn test_len() {
        let mut bs = BitString::new();
        assert_eq!(bs.len(), 0);
        assert!(bs.is_empty());
        bs.push_bits(0, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000, 8);
        assert_eq!(bs.len(), 12);
        assert_eq!(bs.byte_len(), 2);
    }

    #[test]
    fn test_push_bits() {
        let mut bs = BitString::new();
        bs.push_bits(0b0100, 4);
        bs.push_bits(0b01001000, 8);
        assert_eq!(bs.data(), &[0b01000100, 0b10000000]);
        assert!(!bs.bit(0));
        assert!(bs.bit(1));
        assert!(bs.bit(8));
    }

    #[test]
    fn test_extend() {
        let mut head = BitString::new();
        head.push_bits(0b101, 3);
        let mut tail = BitString::new();
        tail.push_bits(0b01101, 5);
        head.extend(&tail);
        assert_eq!(head.len(), 8);
        assert_eq!(head.data(), &[0b10101101]);
    }
}
