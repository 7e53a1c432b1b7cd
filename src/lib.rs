//! # qrforge
//!
//! A Rust library for generating QR codes with Reed-Solomon error correction
//! and serializing them to SVG, PNG, PDF and EPS.
//!
//! ## Features
//!
//! - **Automatic mode selection**: numeric, alphanumeric and byte modes, with
//!   an optional URL split that compresses the scheme and host in alphanumeric mode
//! - **Reed-Solomon error correction** with configurable levels (L, M, Q, H)
//! - **Automatic version selection**: the smallest of the 40 versions that fits
//! - **Mask optimization** over all 8 patterns using the standard penalty rules
//! - **Compact vector output**: region outlines are traced into closed paths
//!   instead of one rectangle per module
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::{to_svg, QrOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svg = to_svg("https://example.com/", &QrOptions::default())?;
//! assert!(svg.contains("<path"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Choosing format and error correction level
//!
//! ```rust
//! use qrforge::{qrcode, ECLevel, Output, OutputFormat, QrOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = QrOptions {
//!     ec_level: ECLevel::H,
//!     format: OutputFormat::Png,
//!     ..Default::default()
//! };
//!
//! if let Output::Bytes(png) = qrcode("Hello, World!", &options)? {
//!     assert_eq!(&png[1..4], b"PNG");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Working with the raw matrix
//!
//! ```rust
//! use qrforge::{build_matrix, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = build_matrix("12345", ECLevel::M, true)?;
//! assert_eq!(matrix.width(), 21);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//!
//! - **L (Low)**: ~7% recovery
//! - **M (Medium)**: ~15% recovery
//! - **Q (Quartile)**: ~25% recovery
//! - **H (High)**: ~30% recovery

pub mod builder;
pub(crate) mod common;
pub mod render;

pub use builder::{build_matrix, Matrix};
pub use common::codec::{encode, EncodedPayload, Source};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Template, Version};
pub use render::{
    inspect, qrcode, to_compact_svg, to_eps, to_pdf, to_png, to_svg, to_svg_data_url, EpsOptions,
    Inspection, Output, OutputFormat, PdfOptions, PngOptions, QrOptions, SvgOptions,
};
