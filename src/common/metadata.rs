use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use super::error::{QRError, QRResult};

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

pub static EC_LEVELS: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

impl ECLevel {
    /// Two-bit level indicator used in the format info word.
    pub(crate) fn format_bits(self) -> u32 {
        match self {
            Self::L => 1,
            Self::M => 0,
            Self::Q => 3,
            Self::H => 2,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> QRResult<Self> {
        match s {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidLevel),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let c = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(c)
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(pub u8);

impl Version {
    /// Side length of the symbol in modules.
    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }
}

// Capacity template
//------------------------------------------------------------------------------

/// Block layout for one (version, level) pair: total data bytes, error
/// correction bytes per block and the sizes of the data blocks.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Template {
    pub version: Version,
    pub ec_level: ECLevel,
    pub data_len: usize,
    pub ec_len: usize,
    pub blocks: Vec<usize>,
}

impl Template {
    pub fn new(version: Version, ec_level: ECLevel) -> Self {
        debug_assert!((1..=40).contains(&version.0), "Invalid version {}", version.0);

        let row = &CAPACITY_TABLE[version.0 as usize - 1];
        let total = row[0];
        let ec_codewords = row[1 + 2 * ec_level as usize];
        let block_count = row[2 + 2 * ec_level as usize];

        let data_len = total - ec_codewords;
        let ec_len = ec_codewords / block_count;

        // Data blocks differ by at most one byte, smallest first
        let mut blocks = Vec::with_capacity(block_count);
        let mut remaining = data_len;
        for k in (1..=block_count).rev() {
            let size = remaining / k;
            blocks.push(size);
            remaining -= size;
        }

        Self { version, ec_level, data_len, ec_len, blocks }
    }
}

// Global constants
//------------------------------------------------------------------------------

/// Per version: [total codewords, ec codewords and block count for L, M, Q, H].
static CAPACITY_TABLE: [[usize; 9]; 40] = [
    [26, 7, 1, 10, 1, 13, 1, 17, 1],
    [44, 10, 1, 16, 1, 22, 1, 28, 1],
    [70, 15, 1, 26, 1, 36, 2, 44, 2],
    [100, 20, 1, 36, 2, 52, 2, 64, 4],
    [134, 26, 1, 48, 2, 72, 4, 88, 4],
    [172, 36, 2, 64, 4, 96, 4, 112, 4],
    [196, 40, 2, 72, 4, 108, 6, 130, 5],
    [242, 48, 2, 88, 4, 132, 6, 156, 6],
    [292, 60, 2, 110, 5, 160, 8, 192, 8],
    [346, 72, 4, 130, 5, 192, 8, 224, 8],
    [404, 80, 4, 150, 5, 224, 8, 264, 11],
    [466, 96, 4, 176, 8, 260, 10, 308, 11],
    [532, 104, 4, 198, 9, 288, 12, 352, 16],
    [581, 120, 4, 216, 9, 320, 16, 384, 16],
    [655, 132, 6, 240, 10, 360, 12, 432, 18],
    [733, 144, 6, 280, 10, 408, 17, 480, 16],
    [815, 168, 6, 308, 11, 448, 16, 532, 19],
    [901, 180, 6, 338, 13, 504, 18, 588, 21],
    [991, 196, 7, 364, 14, 546, 21, 650, 25],
    [1085, 224, 8, 416, 16, 600, 20, 700, 25],
    [1156, 224, 8, 442, 17, 644, 23, 750, 25],
    [1258, 252, 9, 476, 17, 690, 23, 816, 34],
    [1364, 270, 9, 504, 18, 750, 25, 900, 30],
    [1474, 300, 10, 560, 20, 810, 27, 960, 32],
    [1588, 312, 12, 588, 21, 870, 29, 1050, 35],
    [1706, 336, 12, 644, 23, 952, 34, 1110, 37],
    [1828, 360, 12, 700, 25, 1020, 34, 1200, 40],
    [1921, 390, 13, 728, 26, 1050, 35, 1260, 42],
    [2051, 420, 14, 784, 28, 1140, 38, 1350, 45],
    [2185, 450, 15, 812, 29, 1200, 40, 1440, 48],
    [2323, 480, 16, 868, 31, 1290, 43, 1530, 51],
    [2465, 510, 17, 924, 33, 1350, 45, 1620, 54],
    [2611, 540, 18, 980, 35, 1440, 48, 1710, 57],
    [2761, 570, 19, 1036, 37, 1530, 51, 1800, 60],
    [2876, 570, 19, 1064, 38, 1590, 53, 1890, 63],
    [3034, 600, 20, 1120, 40, 1680, 56, 1980, 66],
    [3196, 630, 21, 1204, 43, 1770, 59, 2100, 70],
    [3362, 660, 22, 1260, 45, 1860, 62, 2220, 74],
    [3532, 720, 24, 1316, 47, 1950, 65, 2310, 77],
    [3706, 750, 25, 1372, 49, 2040, 68, 2430, 81],
];

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::{ECLevel, Template, Version};
    use crate::common::error::QRError;

    #[test]
    fn test_level_from_str() {
        assert_eq!("L".parse::<ECLevel>(), Ok(ECLevel::L));
        assert_eq!("H".parse::<ECLevel>(), Ok(ECLevel::H));
        assert_eq!("X".parse::<ECLevel>(), Err(QRError::InvalidLevel));
        assert_eq!("l".parse::<ECLevel>(), Err(QRError::InvalidLevel));
    }

    #[test_case(Version(1), 21)]
    #[test_case(Version(7), 45)]
    #[test_case(Version(40), 177)]
    fn test_width(version: Version, width: usize) {
        assert_eq!(version.width(), width);
    }

    #[test]
    fn test_template_v1_m() {
        let t = Template::new(Version(1), ECLevel::M);
        assert_eq!(t.data_len, 16);
        assert_eq!(t.ec_len, 10);
        assert_eq!(t.blocks, vec![16]);
    }

    #[test]
    fn test_template_v5_q() {
        let t = Template::new(Version(5), ECLevel::Q);
        assert_eq!(t.data_len, 62);
        assert_eq!(t.ec_len, 18);
        assert_eq!(t.blocks, vec![15, 15, 16, 16]);
    }

    #[test]
    fn test_template_blocks_sum() {
        for v in 1..=40 {
            for &l in &super::EC_LEVELS {
                let t = Template::new(Version(v), l);
                assert_eq!(t.blocks.iter().sum::<usize>(), t.data_len, "v{v} {l}");
                assert!(t.blocks.windows(2).all(|w| w[1] - w[0] <= 1), "v{v} {l}");
            }
        }
    }
}
