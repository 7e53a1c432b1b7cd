pub mod matrix;

use crate::common::codec::{encode, EncodedPayload, Source};
use crate::common::ec::error_code;
use crate::common::error::{QRError, QRResult};
use crate::common::mask::apply_best_mask;
use crate::common::metadata::{ECLevel, Template, Version};

pub use matrix::Matrix;

// Codewords
//------------------------------------------------------------------------------

/// Padded data blocks with their error correction blocks, ready for matrix
/// placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codewords {
    pub version: Version,
    pub ec_level: ECLevel,
    pub blocks: Vec<Vec<u8>>,
    pub ec: Vec<Vec<u8>>,
    pub ec_len: usize,
}

// Version selection
//------------------------------------------------------------------------------

/// Picks the smallest version whose data capacity fits the payload's bit
/// stream for that tier.
pub(crate) fn select_template(
    payload: &EncodedPayload,
    ec_level: ECLevel,
) -> QRResult<Template> {
    let mut v = 1;

    for (stream, limit) in
        [(payload.v1.as_ref(), 10), (payload.v10.as_ref(), 27), (Some(&payload.v27), 41)]
    {
        let Some(stream) = stream else {
            v = limit;
            continue;
        };
        let len = stream.byte_len();
        while v < limit {
            let template = Template::new(Version(v), ec_level);
            if template.data_len >= len {
                return Ok(template);
            }
            v += 1;
        }
    }

    Err(QRError::DataTooLarge)
}

// Codeword assembly
//------------------------------------------------------------------------------

/// Lays the tier's bit stream into the template: terminator padding, filler
/// bytes, block split and per-block error correction.
pub(crate) fn fill_template(payload: &EncodedPayload, template: &Template) -> QRResult<Codewords> {
    let stream = match template.version.0 {
        1..=9 => payload.v1.as_ref(),
        10..=26 => payload.v10.as_ref(),
        _ => Some(&payload.v27),
    }
    .ok_or(QRError::InvalidArgument)?;

    let mut data = vec![0u8; template.data_len];
    data[..stream.byte_len()].copy_from_slice(stream.data());

    // Alternating filler bytes after the 4-bit terminator
    let mut filler = 0xEC;
    let start = ((stream.len() + 4 + 7) / 8).min(template.data_len);
    for byte in data[start..].iter_mut() {
        *byte = filler;
        filler ^= 0xEC ^ 0x11;
    }

    let mut blocks = Vec::with_capacity(template.blocks.len());
    let mut ec = Vec::with_capacity(template.blocks.len());
    let mut offset = 0;
    for &size in &template.blocks {
        let block = data[offset..offset + size].to_vec();
        ec.push(error_code(&block, template.ec_len)?);
        blocks.push(block);
        offset += size;
    }

    Ok(Codewords {
        version: template.version,
        ec_level: template.ec_level,
        blocks,
        ec,
        ec_len: template.ec_len,
    })
}

// Matrix assembly
//------------------------------------------------------------------------------

/// Stamps function patterns, runs the mask search and commits the winner.
pub(crate) fn draw(codewords: &Codewords) -> Matrix {
    let mut canvas = matrix::Canvas::new(codewords.version, codewords.ec_level);
    canvas.fill_finders();
    canvas.fill_alignment_and_timing();
    canvas.fill_stub();

    let (_, committed) = apply_best_mask(&canvas, codewords);
    committed.to_matrix()
}

/// Full pipeline from input data to a finished module matrix.
pub fn build_matrix<'a>(
    data: impl Into<Source<'a>>,
    ec_level: ECLevel,
    parse_url: bool,
) -> QRResult<Matrix> {
    let payload = encode(data, parse_url)?;
    let template = select_template(&payload, ec_level)?;
    let codewords = fill_template(&payload, &template)?;
    Ok(draw(&codewords))
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{build_matrix, fill_template, select_template};
    use crate::common::codec::encode;
    use crate::common::error::QRError;
    use crate::common::metadata::{ECLevel, Version};

    #[test_case("12345", ECLevel::M, Version(1))]
    #[test_case("HELLO WORLD", ECLevel::Q, Version(1))]
    fn test_select_smallest_version(data: &str, level: ECLevel, version: Version) {
        let payload = encode(data, true).unwrap();
        let template = select_template(&payload, level).unwrap();
        assert_eq!(template.version, version);
    }

    #[test]
    fn test_select_skips_absent_tiers() {
        // 2000 digits overflow the 10-bit count field of the low tier
        let payload = encode(&"7".repeat(2000), true).unwrap();
        assert!(payload.v1.is_none());
        let template = select_template(&payload, ECLevel::L).unwrap();
        assert!(template.version.0 >= 10);
    }

    #[test]
    fn test_select_too_large() {
        let payload = encode(&"7".repeat(7089), true).unwrap();
        let res = select_template(&payload, ECLevel::H);
        assert_eq!(res.unwrap_err(), QRError::DataTooLarge);
    }

    #[test]
    fn test_max_capacity_fits_at_level_l() {
        let payload = encode(&"7".repeat(7089), true).unwrap();
        let template = select_template(&payload, ECLevel::L).unwrap();
        assert_eq!(template.version, Version(40));
    }

    #[test]
    fn test_fill_template_padding() {
        // "01234567" at 1-M is the classic worked example
        let payload = encode("01234567", true).unwrap();
        let template = select_template(&payload, ECLevel::M).unwrap();
        let codewords = fill_template(&payload, &template).unwrap();

        assert_eq!(codewords.blocks.len(), 1);
        assert_eq!(
            codewords.blocks[0],
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
                0x11, 0xEC, 0x11
            ]
        );
        assert_eq!(codewords.ec[0].len(), 10);
    }

    #[test]
    fn test_fill_template_block_split() {
        let payload = encode(&"A".repeat(90), true).unwrap();
        let template = select_template(&payload, ECLevel::Q).unwrap();
        let codewords = fill_template(&payload, &template).unwrap();

        assert_eq!(codewords.blocks.len(), template.blocks.len());
        for (block, &size) in codewords.blocks.iter().zip(template.blocks.iter()) {
            assert_eq!(block.len(), size);
        }
        for block in &codewords.ec {
            assert_eq!(block.len(), template.ec_len);
        }
    }

    #[test]
    fn test_build_matrix_shape() {
        let matrix = build_matrix("HELLO WORLD", ECLevel::M, true).unwrap();
        assert_eq!(matrix.width(), 21);
        // Finder corners
        assert!(matrix.get(0, 0));
        assert!(matrix.get(0, 20));
        assert!(matrix.get(20, 0));
        // Fixed dark module
        assert!(matrix.get(21 - 8, 8));
    }

    #[test]
    fn test_build_matrix_deterministic() {
        let a = build_matrix("determinism", ECLevel::M, true).unwrap();
        let b = build_matrix("determinism", ECLevel::M, true).unwrap();
        assert_eq!(a, b);
    }
}
