use std::fmt::Write;

use super::path::{trace, PathCommand};
use crate::builder::Matrix;

// Options
//------------------------------------------------------------------------------

/// Knobs for the SVG serializers.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Quiet zone width in modules
    pub margin: usize,
    /// Rendered size in pixels; 0 leaves sizing to the viewBox
    pub pixel_size: usize,
    /// Background fill; `None` renders transparent
    pub background: Option<String>,
    /// Foreground fill
    pub foreground: String,
    /// Whether to emit the leading XML declaration
    pub xml_declaration: bool,
    /// Optional `class` attribute on the root element
    pub class_name: Option<String>,
    /// Optional `id` attribute on the root element
    pub id: Option<String>,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            margin: 1,
            pixel_size: 0,
            background: Some("white".to_string()),
            foreground: "black".to_string(),
            xml_declaration: true,
            class_name: None,
            id: None,
        }
    }
}

// Path serialization
//------------------------------------------------------------------------------

/// One `d` attribute for the whole symbol, one `z`-closed subpath per region.
pub(crate) fn path_data(matrix: &Matrix, margin: usize) -> String {
    let mut d = String::new();
    for subpath in trace(matrix) {
        for command in subpath {
            match command {
                PathCommand::Move(x, y) => {
                    let _ = write!(d, "M{} {}", x + margin as i32, y + margin as i32);
                }
                PathCommand::Horizontal(len) => {
                    let _ = write!(d, "h{len}");
                }
                PathCommand::Vertical(len) => {
                    let _ = write!(d, "v{len}");
                }
            }
        }
        d.push('z');
    }
    d
}

// SVG serializers
//------------------------------------------------------------------------------

pub(crate) fn render_svg(matrix: &Matrix, options: &SvgOptions) -> String {
    let view_box = matrix.width() + 2 * options.margin;
    let path = path_data(matrix, options.margin);

    let mut svg = String::new();
    if options.xml_declaration {
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    svg.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\"");
    if let Some(id) = &options.id {
        let _ = write!(svg, " id=\"{id}\"");
    }
    if let Some(class) = &options.class_name {
        let _ = write!(svg, " class=\"{class}\"");
    }
    if options.pixel_size > 0 {
        let _ = write!(svg, " width=\"{0}\" height=\"{0}\"", options.pixel_size);
    }
    let _ = write!(svg, " viewBox=\"0 0 {view_box} {view_box}\">");

    if let Some(background) = &options.background {
        let _ = write!(
            svg,
            "<rect width=\"{view_box}\" height=\"{view_box}\" fill=\"{background}\"/>"
        );
    }
    if !path.is_empty() {
        let _ = write!(svg, "<path d=\"{path}\" fill=\"{}\"/>", options.foreground);
    }

    svg.push_str("</svg>");
    svg
}

/// Transparent background, no XML declaration. Suitable for inlining.
pub(crate) fn render_compact_svg(matrix: &Matrix, options: &SvgOptions) -> String {
    let compact = SvgOptions {
        background: None,
        xml_declaration: false,
        ..options.clone()
    };
    render_svg(matrix, &compact)
}

/// `data:image/svg+xml,` URL with the document percent-encoded.
pub(crate) fn render_svg_data_url(matrix: &Matrix, options: &SvgOptions) -> String {
    let inner = SvgOptions { xml_declaration: false, ..options.clone() };
    let svg = render_svg(matrix, &inner);
    format!("data:image/svg+xml,{}", percent_encode(&svg))
}

// Matches JavaScript's encodeURIComponent: alphanumerics and -_.!~*'()
// pass through, everything else is %XX-escaped per UTF-8 byte.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &byte in s.as_bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[cfg(test)]
mod svg_tests {
    use super::{path_data, percent_encode, render_compact_svg, render_svg, render_svg_data_url};
    use super::SvgOptions;
    use crate::builder::Matrix;

    fn single_module() -> Matrix {
        Matrix::from_bits(1, vec![true])
    }

    #[test]
    fn test_path_data_offsets_margin() {
        assert_eq!(path_data(&single_module(), 1), "M1 1h1v1h-1z");
        assert_eq!(path_data(&single_module(), 4), "M4 4h1v1h-1z");
    }

    #[test]
    fn test_svg_document() {
        let svg = render_svg(&single_module(), &SvgOptions::default());
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
        assert!(svg.contains("viewBox=\"0 0 3 3\""));
        assert!(svg.contains("<rect width=\"3\" height=\"3\" fill=\"white\"/>"));
        assert!(svg.contains("<path d=\"M1 1h1v1h-1z\" fill=\"black\"/>"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("width=\"0\""));
    }

    #[test]
    fn test_svg_size_attribute() {
        let options = SvgOptions { pixel_size: 128, ..Default::default() };
        let svg = render_svg(&single_module(), &options);
        assert!(svg.contains("width=\"128\" height=\"128\""));
    }

    #[test]
    fn test_compact_svg() {
        let svg = render_compact_svg(&single_module(), &SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_data_url() {
        let url = render_svg_data_url(&single_module(), &SvgOptions::default());
        assert!(url.starts_with("data:image/svg+xml,%3Csvg"));
        assert!(!url.contains('<'));
        assert!(!url.contains('"'));
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("AZaz09-_.!~*'()"), "AZaz09-_.!~*'()");
        assert_eq!(percent_encode("<a b>"), "%3Ca%20b%3E");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }
}
