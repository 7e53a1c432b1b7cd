use std::ops::Deref;

use crate::builder::matrix::Canvas;
use crate::builder::Codewords;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid mask pattern: {pattern}");
        Self(pattern)
    }

    /// Predicate deciding which cells get their bit flipped.
    pub(crate) fn function(self) -> fn(i32, i32) -> bool {
        match self.0 {
            0 => |r, c| (r + c) % 2 == 0,
            1 => |r, _| r % 2 == 0,
            2 => |_, c| c % 3 == 0,
            3 => |r, c| (r + c) % 3 == 0,
            4 => |r, c| (r / 2 + c / 3) % 2 == 0,
            5 => |r, c| (r * c) % 2 + (r * c) % 3 == 0,
            6 => |r, c| ((r * c) % 2 + (r * c) % 3) % 2 == 0,
            _ => |r, c| ((r * c) % 3 + (r + c) % 2) % 2 == 0,
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Mask evaluation
//------------------------------------------------------------------------------

/// Tries all 8 mask patterns on copies of the canvas and keeps the one with
/// the lowest penalty score. Ties go to the lower pattern number.
pub(crate) fn apply_best_mask(base: &Canvas, codewords: &Codewords) -> (MaskPattern, Canvas) {
    let mut best: Option<(u32, MaskPattern, Canvas)> = None;

    for pattern in 0..8 {
        let mask = MaskPattern::new(pattern);
        let mut trial = base.clone();
        trial.fill_data(codewords, mask);
        trial.fill_format_and_version(mask);

        let score = penalty(&trial);
        if best.as_ref().map_or(true, |(s, ..)| score < *s) {
            best = Some((score, mask, trial));
        }
    }

    let (_, mask, canvas) = best.unwrap_or_else(|| unreachable!());
    (mask, canvas)
}

/// Four-rule penalty score; lower reads better.
pub(crate) fn penalty(canvas: &Canvas) -> u32 {
    rule_1_runs(canvas) + rule_2_blocks(canvas) + rule_3_finder_lookalikes(canvas)
        + rule_4_dark_ratio(canvas)
}

// Runs of 5 or more same-colored modules cost their length minus 2,
// in both directions.
fn rule_1_runs(canvas: &Canvas) -> u32 {
    let n = canvas.width() as i32;
    let mut penalty = 0;

    for rows_first in [true, false] {
        for i in 0..n {
            let at = |j| if rows_first { canvas.is_dark(i, j) } else { canvas.is_dark(j, i) };
            let mut pixel = at(0);
            let mut len = 1u32;
            for j in 1..n {
                let p = at(j);
                if p == pixel {
                    len += 1;
                    continue;
                }
                if len >= 5 {
                    penalty += len - 2;
                }
                pixel = p;
                len = 1;
            }
            if len >= 5 {
                penalty += len - 2;
            }
        }
    }

    penalty
}

// Every same-colored 2x2 block costs 3.
fn rule_2_blocks(canvas: &Canvas) -> u32 {
    let n = canvas.width() as i32;
    let mut penalty = 0;

    for i in 0..n - 1 {
        for j in 0..n - 1 {
            let dark = [(i, j), (i, j + 1), (i + 1, j), (i + 1, j + 1)]
                .iter()
                .filter(|&&(r, c)| canvas.is_dark(r, c))
                .count();
            if dark == 0 || dark == 4 {
                penalty += 3;
            }
        }
    }

    penalty
}

// A dark-light-dark-dark-dark-light-dark run with 4 light modules on either
// side resembles a finder pattern and costs 40 per side.
fn rule_3_finder_lookalikes(canvas: &Canvas) -> u32 {
    let n = canvas.width() as i32;
    let mut penalty = 0;

    let h = |k: i32, i: i32, j: i32| canvas.is_dark(i, j + k);
    let v = |k: i32, i: i32, j: i32| canvas.is_dark(i + k, j);

    for i in 0..n {
        for j in 0..n {
            if j < n - 6
                && h(0, i, j)
                && !h(1, i, j)
                && h(2, i, j)
                && h(3, i, j)
                && h(4, i, j)
                && !h(5, i, j)
                && h(6, i, j)
            {
                if j >= 4 && !(h(-4, i, j) || h(-3, i, j) || h(-2, i, j) || h(-1, i, j)) {
                    penalty += 40;
                }
                if j < n - 10 && !(h(7, i, j) || h(8, i, j) || h(9, i, j) || h(10, i, j)) {
                    penalty += 40;
                }
            }

            if i < n - 6
                && v(0, i, j)
                && !v(1, i, j)
                && v(2, i, j)
                && v(3, i, j)
                && v(4, i, j)
                && !v(5, i, j)
                && v(6, i, j)
            {
                if i >= 4 && !(v(-4, i, j) || v(-3, i, j) || v(-2, i, j) || v(-1, i, j)) {
                    penalty += 40;
                }
                if i < n - 10 && !(v(7, i, j) || v(8, i, j) || v(9, i, j) || v(10, i, j)) {
                    penalty += 40;
                }
            }
        }
    }

    penalty
}

// Deviation of the dark module ratio from 50%, in 5% steps, costs 10 each.
fn rule_4_dark_ratio(canvas: &Canvas) -> u32 {
    let n = canvas.width();
    let dark = canvas.count_dark_modules() as f64;
    let total = (n * n) as f64;
    10 * (10.0 - 20.0 * dark / total).abs().floor() as u32
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::MaskPattern;

    #[test_case(0, &[(0, 0), (1, 1), (2, 4)], &[(0, 1), (1, 2)])]
    #[test_case(1, &[(0, 0), (0, 5), (2, 3)], &[(1, 0), (3, 7)])]
    #[test_case(2, &[(0, 0), (4, 3), (1, 6)], &[(0, 1), (2, 2)])]
    #[test_case(3, &[(0, 0), (1, 2), (2, 1)], &[(0, 1), (1, 1)])]
    #[test_case(4, &[(0, 0), (0, 2), (2, 3)], &[(0, 3), (2, 0)])]
    #[test_case(5, &[(0, 0), (0, 3), (2, 3), (6, 2)], &[(1, 1), (2, 2)])]
    #[test_case(6, &[(0, 0), (1, 1), (1, 2)], &[(2, 2), (2, 5)])]
    #[test_case(7, &[(0, 0), (0, 2), (3, 3)], &[(0, 1), (1, 1)])]
    fn test_mask_functions(pattern: u8, dark: &[(i32, i32)], light: &[(i32, i32)]) {
        let f = MaskPattern::new(pattern).function();
        for &(r, c) in dark {
            assert!(f(r, c), "mask {pattern} at ({r}, {c})");
        }
        for &(r, c) in light {
            assert!(!f(r, c), "mask {pattern} at ({r}, {c})");
        }
    }
}
