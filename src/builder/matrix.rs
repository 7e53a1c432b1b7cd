use lazy_static::lazy_static;

use super::Codewords;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{ECLevel, Version};

// Module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Color {
    Light,
    Dark,
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Module {
    Empty,
    Func(Color),
    Format(Color),
    Version(Color),
    Data(Color),
}

impl Module {
    fn is_dark(self) -> bool {
        matches!(
            self,
            Module::Func(Color::Dark)
                | Module::Format(Color::Dark)
                | Module::Version(Color::Dark)
                | Module::Data(Color::Dark)
        )
    }
}

// Canvas
//------------------------------------------------------------------------------

/// Mutable module grid the builder stamps patterns and data into. Flat
/// row-major storage; trial copies during the mask search are plain clones.
#[derive(Debug, Clone)]
pub(crate) struct Canvas {
    version: Version,
    ec_level: ECLevel,
    width: usize,
    grid: Vec<Module>,
}

impl Canvas {
    pub fn new(version: Version, ec_level: ECLevel) -> Self {
        let width = version.width();
        Self { version, ec_level, width, grid: vec![Module::Empty; width * width] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, r: usize, c: usize) -> usize {
        debug_assert!(r < self.width && c < self.width, "Out of bounds: ({r}, {c})");
        r * self.width + c
    }

    fn get(&self, r: usize, c: usize) -> Module {
        self.grid[self.index(r, c)]
    }

    fn set(&mut self, r: usize, c: usize, module: Module) {
        let index = self.index(r, c);
        self.grid[index] = module;
    }

    /// Dark test tolerant of out-of-range coordinates, for the penalty scan.
    pub fn is_dark(&self, r: i32, c: i32) -> bool {
        let w = self.width as i32;
        if r < 0 || c < 0 || r >= w || c >= w {
            return false;
        }
        self.get(r as usize, c as usize).is_dark()
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.is_dark()).count()
    }

    // Function patterns
    //--------------------------------------------------------------------------

    /// 7x7 ring-in-square patterns at the three non-bottom-right corners,
    /// plus the one-module light separators around them.
    pub fn fill_finders(&mut self) {
        let n = self.width;
        for i in -3i32..=3 {
            for j in -3i32..=3 {
                let ring = i.abs().max(j.abs()) == 2;
                let module = Module::Func(if ring { Color::Light } else { Color::Dark });
                self.set((3 + i) as usize, (3 + j) as usize, module);
                self.set((3 + i) as usize, (n as i32 - 4 + j) as usize, module);
                self.set((n as i32 - 4 + i) as usize, (3 + j) as usize, module);
            }
        }

        let light = Module::Func(Color::Light);
        for i in 0..8 {
            self.set(7, i, light);
            self.set(i, 7, light);
            self.set(7, n - 1 - i, light);
            self.set(i, n - 8, light);
            self.set(n - 8, i, light);
            self.set(n - 1 - i, 7, light);
        }
    }

    /// Alignment patterns on the spacing grid plus the timing strips along
    /// row 6 and column 6.
    pub fn fill_alignment_and_timing(&mut self) {
        let n = self.width;

        if n > 21 {
            let len = (n - 13) as f64;
            let mut delta = (len / (len / 28.0).ceil()).round() as usize;
            if delta % 2 == 1 {
                delta += 1;
            }

            let mut positions = vec![6usize];
            let mut p = (n - 13 + 6) as i32;
            let mut descending = Vec::new();
            while p > 10 {
                descending.push(p as usize);
                p -= delta as i32;
            }
            positions.extend(descending.into_iter().rev());

            for &x in &positions {
                for &y in &positions {
                    if self.get(x, y) != Module::Empty {
                        continue;
                    }
                    for r in -2i32..=2 {
                        for c in -2i32..=2 {
                            let ring = r.abs().max(c.abs()) == 1;
                            let module =
                                Module::Func(if ring { Color::Light } else { Color::Dark });
                            self.set((x as i32 + r) as usize, (y as i32 + c) as usize, module);
                        }
                    }
                }
            }
        }

        for i in 8..n - 8 {
            let module = Module::Func(if i % 2 == 1 { Color::Light } else { Color::Dark });
            self.set(6, i, module);
            self.set(i, 6, module);
        }
    }

    /// Reserves the format info area (and version info area for version 7+)
    /// with placeholders and stamps the fixed dark module.
    pub fn fill_stub(&mut self) {
        let n = self.width;
        let light = Module::Format(Color::Light);

        for i in 0..8 {
            if i != 6 {
                self.set(8, i, light);
                self.set(i, 8, light);
            }
            self.set(8, n - 1 - i, light);
            self.set(n - 1 - i, 8, light);
        }

        self.set(8, 8, light);
        self.set(n - 8, 8, Module::Func(Color::Dark));

        if n >= 45 {
            for i in n - 11..n - 8 {
                for j in 0..6 {
                    self.set(i, j, Module::Version(Color::Light));
                    self.set(j, i, Module::Version(Color::Light));
                }
            }
        }
    }

    // Data placement
    //--------------------------------------------------------------------------

    /// Interleaves data and correction bytes along the zig-zag scan, toggling
    /// each bit by the mask function before placement. Leftover cells carry
    /// the bare mask value.
    pub fn fill_data(&mut self, codewords: &Codewords, mask: MaskPattern) {
        let mask_fn = mask.function();
        let mut pos = ZigZag::new(self.width as i32);

        let max_len = codewords.blocks.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..max_len {
            for block in &codewords.blocks {
                if let Some(&byte) = block.get(i) {
                    self.put_byte(byte, &mut pos, mask_fn);
                }
            }
        }
        for i in 0..codewords.ec_len {
            for block in &codewords.ec {
                if let Some(&byte) = block.get(i) {
                    self.put_byte(byte, &mut pos, mask_fn);
                }
            }
        }

        if pos.col > -1 {
            loop {
                let dark = mask_fn(pos.row, pos.col);
                self.set(pos.row as usize, pos.col as usize, Module::Data(Color::from(dark)));
                if !pos.next(self) {
                    break;
                }
            }
        }
    }

    fn put_byte(&mut self, byte: u8, pos: &mut ZigZag, mask_fn: fn(i32, i32) -> bool) {
        for bit in (0..8).rev() {
            let mut dark = byte >> bit & 1 == 1;
            if mask_fn(pos.row, pos.col) {
                dark = !dark;
            }
            self.set(pos.row as usize, pos.col as usize, Module::Data(Color::from(dark)));
            pos.next(self);
        }
    }

    // Format and version info
    //--------------------------------------------------------------------------

    /// Stamps the real format bits for (level, mask) and, for version 7+, the
    /// version info bits, over the reserved placeholders.
    pub fn fill_format_and_version(&mut self, mask: MaskPattern) {
        let n = self.width;
        let format = FORMATS[(self.ec_level.format_bits() << 3 | *mask as u32) as usize];
        let f = |k: usize| Module::Format(Color::from(format >> k & 1 == 1));

        for i in 0..8 {
            self.set(8, n - 1 - i, f(i));
            if i < 6 {
                self.set(i, 8, f(i));
            }
        }
        for i in 8..15 {
            self.set(n - 15 + i, 8, f(i));
            if i > 8 {
                self.set(8, 14 - i, f(i));
            }
        }
        self.set(7, 8, f(6));
        self.set(8, 8, f(7));
        self.set(8, 7, f(8));

        let version = self.version.0 as usize;
        if version < 7 {
            return;
        }
        let info = VERSIONS[version];
        let v = |k: usize| Module::Version(Color::from(info >> k & 1 == 1));
        for i in 0..6 {
            for j in 0..3 {
                self.set(n - 11 + j, i, v(i * 3 + j));
                self.set(i, n - 11 + j, v(i * 3 + j));
            }
        }
    }

    /// Collapses every module to a single dark/light bit.
    pub fn to_matrix(&self) -> Matrix {
        Matrix { width: self.width, grid: self.grid.iter().map(|m| m.is_dark()).collect() }
    }
}

// Zig-zag scan
//------------------------------------------------------------------------------

/// Cursor for the two-column zig-zag placement scan: starts bottom-right,
/// runs up then down, skips timing column 6 and every reserved module.
struct ZigZag {
    width: i32,
    row: i32,
    col: i32,
    dir: i32,
}

impl ZigZag {
    fn new(width: i32) -> Self {
        Self { width, row: width - 1, col: width - 1, dir: -1 }
    }

    fn next(&mut self, canvas: &Canvas) -> bool {
        loop {
            // Right column of a pair moves diagonally, left column steps left.
            // Columns left of the timing column have flipped parity.
            if (self.col % 2 == 1) != (self.col < 6) {
                if (self.dir < 0 && self.row == 0) || (self.dir > 0 && self.row == self.width - 1)
                {
                    self.col -= 1;
                    self.dir = -self.dir;
                } else {
                    self.col += 1;
                    self.row += self.dir;
                }
            } else {
                self.col -= 1;
            }

            if self.col == 6 {
                self.col -= 1;
            }
            if self.col < 0 {
                return false;
            }
            if canvas.get(self.row as usize, self.col as usize) == Module::Empty {
                return true;
            }
        }
    }
}

// Matrix
//------------------------------------------------------------------------------

/// Finished symbol: an N x N grid of dark/light bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    grid: Vec<bool>,
}

impl Matrix {
    /// Side length in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.width && c < self.width, "Out of bounds: ({r}, {c})");
        self.grid[r * self.width + c]
    }

    /// Dark test tolerant of out-of-range coordinates, for the path tracer.
    pub(crate) fn dark_at(&self, r: i32, c: i32) -> bool {
        let w = self.width as i32;
        if r < 0 || c < 0 || r >= w || c >= w {
            return false;
        }
        self.get(r as usize, c as usize)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&d| d).count()
    }

    #[cfg(test)]
    pub(crate) fn from_bits(width: usize, grid: Vec<bool>) -> Self {
        debug_assert_eq!(grid.len(), width * width);
        Self { width, grid }
    }
}

// Global constants
//------------------------------------------------------------------------------

lazy_static! {
    // 15-bit format info words: 5 data bits BCH-extended over 0x0537, masked
    // with 0x5412, indexed by (level bits << 3 | mask index)
    static ref FORMATS: [u32; 32] = {
        let mut formats = [0u32; 32];
        for (f, slot) in formats.iter_mut().enumerate() {
            let mut res = (f as u32) << 10;
            for i in (1..=5).rev() {
                if res >> (9 + i) != 0 {
                    res ^= 0x0537 << (i - 1);
                }
            }
            *slot = (res | (f as u32) << 10) ^ 0x5412;
        }
        formats
    };

    // 18-bit version info words for versions 7-40, BCH-extended over 0x1f25
    static ref VERSIONS: [u32; 41] = {
        let mut versions = [0u32; 41];
        for (v, slot) in versions.iter_mut().enumerate().skip(7) {
            let mut res = (v as u32) << 12;
            for i in (1..=6).rev() {
                if res >> (11 + i) != 0 {
                    res ^= 0x1f25 << (i - 1);
                }
            }
            *slot = res | (v as u32) << 12;
        }
        versions
    };
}

#[cfg(test)]
mod matrix_tests {
    use test_case::test_case;

    use super::{Canvas, Color, Module, FORMATS, VERSIONS};
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_format_info_words() {
        // (M, mask 0) is the all-zero data word, leaving only the xor mask
        assert_eq!(FORMATS[0], 0x5412);
        // (L, mask 0)
        assert_eq!(FORMATS[0b01000], 0x77C4);
        // (H, mask 7)
        assert_eq!(FORMATS[0b10111], 0x083B);
    }

    #[test]
    fn test_version_info_words() {
        assert_eq!(VERSIONS[7], 0x07C94);
        assert_eq!(VERSIONS[21], 0x15683);
        assert_eq!(VERSIONS[40], 0x28C69);
    }

    #[test]
    fn test_finder_corners() {
        let mut canvas = Canvas::new(Version(1), ECLevel::M);
        canvas.fill_finders();
        // Outer ring dark, separator ring light, centers dark
        assert!(canvas.is_dark(0, 0));
        assert!(canvas.is_dark(3, 3));
        assert!(!canvas.is_dark(1, 1));
        assert!(canvas.is_dark(0, 20));
        assert!(canvas.is_dark(20, 0));
        // Separators
        assert_eq!(canvas.get(7, 7), Module::Func(Color::Light));
        assert!(!canvas.is_dark(7, 0));
        assert!(!canvas.is_dark(0, 13));
    }

    #[test_case(Version(1), vec![])]
    #[test_case(Version(2), vec![6, 18])]
    #[test_case(Version(7), vec![6, 22, 38])]
    #[test_case(Version(14), vec![6, 26, 46, 66])]
    #[test_case(Version(40), vec![6, 30, 58, 86, 114, 142, 170])]
    fn test_alignment_centers(version: Version, centers: Vec<usize>) {
        let mut canvas = Canvas::new(version, ECLevel::M);
        canvas.fill_finders();
        canvas.fill_alignment_and_timing();
        for &x in &centers {
            for &y in &centers {
                // Centers colliding with a finder stay untouched
                assert_ne!(canvas.get(x, y), Module::Empty, "({x}, {y})");
            }
        }
        if centers.len() > 1 {
            // Dark center, light ring, dark border
            let c = centers[1] as i32;
            assert!(canvas.is_dark(c, c));
            assert!(!canvas.is_dark(c - 1, c));
            assert!(canvas.is_dark(c - 2, c - 2));
        }
    }

    #[test]
    fn test_timing_alternates() {
        let mut canvas = Canvas::new(Version(2), ECLevel::M);
        canvas.fill_finders();
        canvas.fill_alignment_and_timing();
        for i in 8i32..17 {
            assert_eq!(canvas.is_dark(6, i), i % 2 == 0);
            assert_eq!(canvas.is_dark(i, 6), i % 2 == 0);
        }
    }

    #[test]
    fn test_dark_module() {
        let mut canvas = Canvas::new(Version(1), ECLevel::M);
        canvas.fill_stub();
        assert!(canvas.is_dark(21 - 8, 8));
    }
}
