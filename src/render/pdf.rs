use std::fmt::Write;

use super::path::{trace, PathCommand};
use crate::builder::Matrix;

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Quiet zone width in modules
    pub margin: usize,
    /// Points per module
    pub scale: usize,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self { margin: 1, scale: 9 }
    }
}

// PDF serializer
//------------------------------------------------------------------------------

/// Minimal single-page PDF 1.0 document with the symbol as one filled path.
/// The coordinate system is flipped since PDF's origin is bottom-left.
pub(crate) fn render_pdf(matrix: &Matrix, options: &PdfOptions) -> Vec<u8> {
    let n = matrix.width() as i32;
    let margin = options.margin as i32;
    let media_box = (n + 2 * margin) * options.scale as i32;

    let mut objects = vec![
        "%PDF-1.0\n\n".to_string(),
        "1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n".to_string(),
        "2 0 obj << /Type /Pages /Count 1 /Kids [ 3 0 R ] >> endobj\n".to_string(),
        format!(
            "3 0 obj << /Type /Page /Parent 2 0 R /Resources <<>> /Contents 4 0 R \
             /MediaBox [ 0 0 {media_box} {media_box} ] >> endobj\n"
        ),
    ];

    let mut content = format!("{0} 0 0 {0} 0 0 cm\n", options.scale);
    let subpaths: Vec<String> = trace(matrix)
        .iter()
        .map(|subpath| {
            let mut res = String::new();
            let (mut x, mut y) = (0, 0);
            for command in subpath {
                match *command {
                    PathCommand::Move(col, row) => {
                        x = col + margin;
                        y = n - row + margin;
                        let _ = write!(res, "{x} {y} m ");
                    }
                    PathCommand::Horizontal(len) => {
                        x += len;
                        let _ = write!(res, "{x} {y} l ");
                    }
                    PathCommand::Vertical(len) => {
                        y -= len;
                        let _ = write!(res, "{x} {y} l ");
                    }
                }
            }
            res.push('h');
            res
        })
        .collect();
    content.push_str(&subpaths.join("\n"));
    content.push_str("\nf\n");

    objects.push(format!(
        "4 0 obj << /Length {} >> stream\n{content}endstream\nendobj\n",
        content.len()
    ));

    let mut xref = String::from("xref\n0 5\n0000000000 65535 f \n");
    let mut offset = objects[0].len();
    for object in &objects[1..5] {
        let _ = write!(xref, "{offset:010} 00000 n \n");
        offset += object.len();
    }

    objects.push(xref);
    objects.push("trailer << /Root 1 0 R /Size 5 >>\n".to_string());
    objects.push(format!("startxref\n{offset}\n%%EOF\n"));

    objects.concat().into_bytes()
}
