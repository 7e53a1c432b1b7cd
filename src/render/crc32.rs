use lazy_static::lazy_static;

// CRC-32
//------------------------------------------------------------------------------

// Reflected polynomial for the PNG chunk checksum
const CRC32_POLY: u32 = 0xEDB88320;

lazy_static! {
    static ref CRC_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        for (n, slot) in table.iter_mut().enumerate() {
            let mut c = n as u32;
            for _ in 0..8 {
                c = if c & 1 == 1 { CRC32_POLY ^ (c >> 1) } else { c >> 1 };
            }
            *slot = c;
        }
        table
    };

    // The same table with each word split into its four big-endian byte
    // lanes, driving the carry-chained byte-wise variant
    static ref CRC_BYTE_TABLE: [[u8; 4]; 256] = {
        let mut table = [[0u8; 4]; 256];
        for (n, slot) in table.iter_mut().enumerate() {
            let mut c = (n as u32).to_be_bytes();
            for _ in 0..8 {
                let carry = [c[0] & 1, c[1] & 1, c[2] & 1, c[3] & 1];
                c[0] = (c[0] >> 1) ^ if carry[3] == 1 { 0xED } else { 0 };
                c[1] = (c[1] >> 1)
                    ^ if carry[3] == 1 { 0xB8 } else { 0 }
                    ^ if carry[0] == 1 { 0x80 } else { 0 };
                c[2] = (c[2] >> 1)
                    ^ if carry[3] == 1 { 0x83 } else { 0 }
                    ^ if carry[1] == 1 { 0x80 } else { 0 };
                c[3] = (c[3] >> 1)
                    ^ if carry[3] == 1 { 0x20 } else { 0 }
                    ^ if carry[2] == 1 { 0x80 } else { 0 };
            }
            *slot = c;
        }
        table
    };
}

/// Table-driven word-at-a-time checksum.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = !0u32;
    for &byte in data {
        c = CRC_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
    }
    !c
}

/// Checksum computed in four byte lanes with explicit carries. Bit-identical
/// to [`crc32`].
pub fn crc32_bytewise(data: &[u8]) -> u32 {
    let mut c = [0xFFu8; 4];
    for &byte in data {
        let e = CRC_BYTE_TABLE[(c[3] ^ byte) as usize];
        c = [e[0], e[1] ^ c[0], e[2] ^ c[1], e[3] ^ c[2]];
    }
    u32::from_be_bytes(c.map(|b| b ^ 0xFF))
}

/// Checksum used by the PNG serializer; the `bytewise-crc32` feature swaps
/// in the byte-lane variant.
pub fn checksum(data: &[u8]) -> u32 {
    #[cfg(feature = "bytewise-crc32")]
    {
        crc32_bytewise(data)
    }
    #[cfg(not(feature = "bytewise-crc32"))]
    {
        crc32(data)
    }
}

#[cfg(test)]
mod crc32_tests {
    use test_case::test_case;

    use super::{crc32, crc32_bytewise};

    #[test_case(b"", 0x00000000)]
    #[test_case(b"123456789", 0xCBF43926)]
    #[test_case(b"IEND", 0xAE426082)]
    fn test_known_checksums(data: &[u8], expected: u32) {
        assert_eq!(crc32(data), expected);
        assert_eq!(crc32_bytewise(data), expected);
    }

    #[test]
    fn test_variants_agree() {
        let data: Vec<u8> = (0..=255).cycle().take(1000).collect();
        assert_eq!(crc32(&data), crc32_bytewise(&data));
    }
}
