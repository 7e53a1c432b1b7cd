use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::crc32::checksum;
use crate::builder::Matrix;
use crate::common::error::{QRError, QRResult};

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PngOptions {
    /// Quiet zone width in modules
    pub margin: usize,
    /// Pixels per module
    pub pixel_size: usize,
    /// Accepted for interface parity; output is grayscale 255/0
    pub background: String,
    /// Accepted for interface parity; output is grayscale 255/0
    pub foreground: String,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            margin: 1,
            pixel_size: 1,
            background: "white".to_string(),
            foreground: "black".to_string(),
        }
    }
}

// PNG serializer
//------------------------------------------------------------------------------

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// 8-bit grayscale PNG, one scanline filter byte of zero per row, image data
/// deflated at maximum compression.
pub(crate) fn render_png(matrix: &Matrix, options: &PngOptions) -> QRResult<Vec<u8>> {
    let n = matrix.width();
    let size = options.pixel_size.max(1);
    let width = (n + 2 * options.margin) * size;
    let stride = width + 1;

    let mut raster = vec![255u8; stride * width];
    for row in 0..width {
        raster[row * stride] = 0;
    }
    for i in 0..n {
        for j in 0..n {
            if !matrix.get(i, j) {
                continue;
            }
            let offset = ((options.margin + i) * stride + options.margin + j) * size + 1;
            for c in 0..size {
                let start = offset + c * stride;
                raster[start..start + size].fill(0);
            }
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&raster).map_err(|_| QRError::InvalidArgument)?;
    let compressed = encoder.finish().map_err(|_| QRError::InvalidArgument)?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    // Bit depth 8, grayscale, deflate, filter method 0, no interlace
    ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    push_chunk(&mut png, b"IHDR", &ihdr);
    push_chunk(&mut png, b"IDAT", &compressed);
    push_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    let body_start = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    let crc = checksum(&out[body_start..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

#[cfg(test)]
mod png_tests {
    use super::{render_png, PngOptions, PNG_SIGNATURE};
    use crate::builder::Matrix;

    fn checkerboard(width: usize) -> Matrix {
        let grid = (0..width * width).map(|i| (i / width + i % width) % 2 == 0).collect();
        Matrix::from_bits(width, grid)
    }

    #[test]
    fn test_png_signature_and_iend() {
        let png = render_png(&checkerboard(5), &PngOptions::default()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(&png[png.len() - 12..], &[0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130]);
    }

    #[test]
    fn test_png_ihdr() {
        let options = PngOptions { margin: 2, pixel_size: 3, ..Default::default() };
        let png = render_png(&checkerboard(5), &options).unwrap();
        // (5 + 2 * 2) * 3 = 27 pixels square
        assert_eq!(&png[8..16], &[0, 0, 0, 13, 73, 72, 68, 82]);
        assert_eq!(&png[16..20], &27u32.to_be_bytes());
        assert_eq!(&png[20..24], &27u32.to_be_bytes());
        // Depth 8, grayscale
        assert_eq!(&png[24..29], &[8, 0, 0, 0, 0]);
    }

    #[test]
    fn test_png_decodes_back() {
        let matrix = checkerboard(5);
        let options = PngOptions { margin: 1, pixel_size: 2, ..Default::default() };
        let png = render_png(&matrix, &options).unwrap();

        let img = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(img.width(), 14);
        assert_eq!(img.height(), 14);
        for i in 0..5 {
            for j in 0..5 {
                let expected = if matrix.get(i, j) { 0 } else { 255 };
                let px = img.get_pixel((2 + 2 * j + 1) as u32, (2 + 2 * i + 1) as u32).0[0];
                assert_eq!(px, expected, "module ({i}, {j})");
            }
        }
    }
}
