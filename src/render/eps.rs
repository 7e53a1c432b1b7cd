use std::fmt::Write;

use super::path::{trace, PathCommand};
use crate::builder::Matrix;

// Options
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EpsOptions {
    /// Quiet zone width in modules
    pub margin: usize,
    /// Points per module
    pub scale: usize,
}

impl Default for EpsOptions {
    fn default() -> Self {
        Self { margin: 1, scale: 9 }
    }
}

// EPS serializer
//------------------------------------------------------------------------------

/// EPSF-3.0 document. Short PostScript defines keep the path data compact;
/// `/M` folds the top-left-origin to bottom-left-origin flip into the moveto.
pub(crate) fn render_eps(matrix: &Matrix, options: &EpsOptions) -> String {
    let n = matrix.width();
    let margin = options.margin as i32;
    let bound = (n + 2 * options.margin) * options.scale;

    let mut data = vec![
        "%!PS-Adobe-3.0 EPSF-3.0".to_string(),
        format!("%%BoundingBox: 0 0 {bound} {bound}"),
        "/h { 0 rlineto } bind def".to_string(),
        "/v { 0 exch neg rlineto } bind def".to_string(),
        format!("/M {{ neg {} add moveto }} bind def", n as i32 + margin),
        "/z { closepath } bind def".to_string(),
        format!("{0} {0} scale", options.scale),
        String::new(),
    ];

    for subpath in trace(matrix) {
        let mut res = String::new();
        for command in subpath {
            match command {
                PathCommand::Move(col, row) => {
                    let _ = write!(res, "{} {} M ", col + margin, row);
                }
                PathCommand::Horizontal(len) => {
                    let _ = write!(res, "{len} h ");
                }
                PathCommand::Vertical(len) => {
                    let _ = write!(res, "{len} v ");
                }
            }
        }
        res.push_str("z\n");
        data.push(res);
    }

    data.push("fill\n%%EOF\n".to_string());
    data.join("\n")
}

#[cfg(test)]
mod eps_tests {
    use super::{render_eps, EpsOptions};
    use crate::builder::Matrix;

    #[test]
    fn test_eps_structure() {
        let matrix = Matrix::from_bits(1, vec![true]);
        let eps = render_eps(&matrix, &EpsOptions::default());

        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(eps.contains("%%BoundingBox: 0 0 27 27"));
        assert!(eps.contains("/M { neg 2 add moveto } bind def"));
        assert!(eps.contains("9 9 scale"));
        assert!(eps.ends_with("fill\n%%EOF\n"));
    }

    #[test]
    fn test_eps_path() {
        let matrix = Matrix::from_bits(1, vec![true]);
        let eps = render_eps(&matrix, &EpsOptions::default());
        assert!(eps.contains("1 0 M 1 h 1 v -1 h z"));
    }
}
