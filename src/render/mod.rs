pub mod crc32;
pub mod eps;
pub(crate) mod path;
pub mod pdf;
pub mod png;
pub mod svg;

use crate::builder::{build_matrix, Matrix};
use crate::common::codec::Source;
use crate::common::error::QRResult;
use crate::common::metadata::{ECLevel, Version};

pub use eps::EpsOptions;
pub use pdf::PdfOptions;
pub use png::PngOptions;
pub use svg::SvgOptions;

// Options
//------------------------------------------------------------------------------

/// Requested serialization of the finished symbol.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum OutputFormat {
    Matrix,
    #[default]
    Svg,
    CompactSvg,
    SvgDataUrl,
    Png,
    Pdf,
    Eps,
}

/// Options for the one-call [`qrcode`] entry point.
#[derive(Debug, Clone)]
pub struct QrOptions {
    pub ec_level: ECLevel,
    /// Split http(s) URLs so the host compresses in alphanumeric mode
    pub parse_url: bool,
    pub format: OutputFormat,
    pub svg: SvgOptions,
    pub png: PngOptions,
    pub pdf: PdfOptions,
    pub eps: EpsOptions,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::M,
            parse_url: true,
            format: OutputFormat::default(),
            svg: SvgOptions::default(),
            png: PngOptions::default(),
            pdf: PdfOptions::default(),
            eps: EpsOptions::default(),
        }
    }
}

/// Serialized symbol in whichever shape the format calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Matrix(Matrix),
    Text(String),
    Bytes(Vec<u8>),
}

impl Output {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

// Entry points
//------------------------------------------------------------------------------

/// Builds the symbol and serializes it per `options.format`.
pub fn qrcode<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<Output> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(match options.format {
        OutputFormat::Matrix => Output::Matrix(matrix),
        OutputFormat::Svg => Output::Text(svg::render_svg(&matrix, &options.svg)),
        OutputFormat::CompactSvg => Output::Text(svg::render_compact_svg(&matrix, &options.svg)),
        OutputFormat::SvgDataUrl => Output::Text(svg::render_svg_data_url(&matrix, &options.svg)),
        OutputFormat::Png => Output::Bytes(png::render_png(&matrix, &options.png)?),
        OutputFormat::Pdf => Output::Bytes(pdf::render_pdf(&matrix, &options.pdf)),
        OutputFormat::Eps => Output::Text(eps::render_eps(&matrix, &options.eps)),
    })
}

pub fn to_svg<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<String> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(svg::render_svg(&matrix, &options.svg))
}

pub fn to_compact_svg<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<String> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(svg::render_compact_svg(&matrix, &options.svg))
}

pub fn to_svg_data_url<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<String> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(svg::render_svg_data_url(&matrix, &options.svg))
}

pub fn to_png<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<Vec<u8>> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    png::render_png(&matrix, &options.png)
}

pub fn to_pdf<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<Vec<u8>> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(pdf::render_pdf(&matrix, &options.pdf))
}

pub fn to_eps<'a>(data: impl Into<Source<'a>>, options: &QrOptions) -> QRResult<String> {
    let matrix = build_matrix(data, options.ec_level, options.parse_url)?;
    Ok(eps::render_eps(&matrix, &options.eps))
}

// Inspection
//------------------------------------------------------------------------------

/// Symbol statistics without a serialized artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub version: Version,
    pub ec_level: ECLevel,
    pub matrix_size: usize,
    pub total_modules: usize,
    pub dark_modules: usize,
    pub light_modules: usize,
    /// Share of dark modules, rounded to two decimal places
    pub dark_percentage: f64,
    /// viewBox side at the default one-module margin
    pub estimated_svg_size: usize,
}

pub fn inspect<'a>(
    data: impl Into<Source<'a>>,
    ec_level: ECLevel,
    parse_url: bool,
) -> QRResult<Inspection> {
    let matrix = build_matrix(data, ec_level, parse_url)?;

    let width = matrix.width();
    let total_modules = width * width;
    let dark_modules = matrix.count_dark_modules();
    let percentage = dark_modules as f64 / total_modules as f64 * 100.0;

    Ok(Inspection {
        version: Version(((width - 17) / 4) as u8),
        ec_level,
        matrix_size: width,
        total_modules,
        dark_modules,
        light_modules: total_modules - dark_modules,
        dark_percentage: (percentage * 100.0).round() / 100.0,
        estimated_svg_size: width + 2,
    })
}
