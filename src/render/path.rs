use crate::builder::Matrix;

// Path commands
//------------------------------------------------------------------------------

/// Relative outline commands shared by the vector serializers.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum PathCommand {
    /// Absolute move to (col, row)
    Move(i32, i32),
    /// Horizontal run, negative towards the left
    Horizontal(i32),
    /// Vertical run, negative upwards
    Vertical(i32),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Direction {
    Right,
    Left,
    Down,
    Up,
}

// Boundary tracer
//------------------------------------------------------------------------------

/// Walks every dark region's outline once, emitting closed subpaths. Outer
/// boundaries are traced clockwise, hole boundaries counter-clockwise, so
/// the non-zero fill rule renders holes light.
pub(crate) fn trace(matrix: &Matrix) -> Vec<Vec<PathCommand>> {
    let mut tracer = Tracer::new(matrix);
    let mut paths = Vec::new();
    let n = matrix.width() as i32;

    for row in 0..n {
        for col in 0..n {
            if tracer.visited(row, col) {
                continue;
            }
            tracer.visit(row, col);

            if matrix.dark_at(row, col) {
                // Top edge of a fresh dark region
                if !matrix.dark_at(row - 1, col) {
                    paths.push(tracer.plot(row, col, Direction::Right));
                }
            } else if matrix.dark_at(row, col - 1) {
                // Left edge of a hole
                paths.push(tracer.plot(row, col, Direction::Down));
            }
        }
    }

    paths
}

struct Tracer<'a> {
    matrix: &'a Matrix,
    // Visited flags over [-1, N] in both axes
    filled: Vec<bool>,
    n: i32,
}

impl<'a> Tracer<'a> {
    fn new(matrix: &'a Matrix) -> Self {
        let n = matrix.width() as i32;
        Self { matrix, filled: vec![false; ((n + 2) * (n + 2)) as usize], n }
    }

    fn index(&self, row: i32, col: i32) -> usize {
        debug_assert!(
            (-1..=self.n).contains(&row) && (-1..=self.n).contains(&col),
            "Out of bounds: ({row}, {col})"
        );
        ((row + 1) * (self.n + 2) + col + 1) as usize
    }

    fn visited(&self, row: i32, col: i32) -> bool {
        self.filled[self.index(row, col)]
    }

    fn visit(&mut self, row: i32, col: i32) {
        let index = self.index(row, col);
        self.filled[index] = true;
    }

    fn plot(&mut self, row0: i32, col0: i32, mut dir: Direction) -> Vec<PathCommand> {
        self.visit(row0, col0);
        let mut result = vec![PathCommand::Move(col0, row0)];

        let matrix = self.matrix;
        let dark = |r, c| matrix.dark_at(r, c);
        let (mut row, mut col) = (row0, col0);
        let mut len = 0;

        loop {
            match dir {
                Direction::Right => {
                    self.visit(row, col);
                    if dark(row, col) {
                        self.visit(row - 1, col);
                        if dark(row - 1, col) {
                            result.push(PathCommand::Horizontal(len));
                            len = 0;
                            dir = Direction::Up;
                        } else {
                            len += 1;
                            col += 1;
                        }
                    } else {
                        result.push(PathCommand::Horizontal(len));
                        len = 0;
                        dir = Direction::Down;
                    }
                }
                Direction::Left => {
                    self.visit(row - 1, col - 1);
                    if dark(row - 1, col - 1) {
                        self.visit(row, col - 1);
                        if dark(row, col - 1) {
                            result.push(PathCommand::Horizontal(-len));
                            len = 0;
                            dir = Direction::Down;
                        } else {
                            len += 1;
                            col -= 1;
                        }
                    } else {
                        result.push(PathCommand::Horizontal(-len));
                        len = 0;
                        dir = Direction::Up;
                    }
                }
                Direction::Down => {
                    self.visit(row, col - 1);
                    if dark(row, col - 1) {
                        self.visit(row, col);
                        if dark(row, col) {
                            result.push(PathCommand::Vertical(len));
                            len = 0;
                            dir = Direction::Right;
                        } else {
                            len += 1;
                            row += 1;
                        }
                    } else {
                        result.push(PathCommand::Vertical(len));
                        len = 0;
                        dir = Direction::Left;
                    }
                }
                Direction::Up => {
                    self.visit(row - 1, col);
                    if dark(row - 1, col) {
                        self.visit(row - 1, col - 1);
                        if dark(row - 1, col - 1) {
                            result.push(PathCommand::Vertical(-len));
                            len = 0;
                            dir = Direction::Left;
                        } else {
                            len += 1;
                            row -= 1;
                        }
                    } else {
                        result.push(PathCommand::Vertical(-len));
                        len = 0;
                        dir = Direction::Right;
                    }
                }
            }

            if row == row0 && col == col0 {
                break;
            }
        }

        result
    }
}

#[cfg(test)]
mod path_tests {
    use super::{trace, PathCommand::*};
    use crate::builder::Matrix;

    fn matrix(width: usize, cells: &[u8]) -> Matrix {
        Matrix::from_bits(width, cells.iter().map(|&c| c == 1).collect())
    }

    #[test]
    fn test_single_module() {
        let m = matrix(1, &[1]);
        let paths = trace(&m);
        assert_eq!(paths, vec![vec![Move(0, 0), Horizontal(1), Vertical(1), Horizontal(-1)]]);
    }

    #[test]
    fn test_square_block() {
        let m = matrix(2, &[1, 1, 1, 1]);
        let paths = trace(&m);
        assert_eq!(paths, vec![vec![Move(0, 0), Horizontal(2), Vertical(2), Horizontal(-2)]]);
    }

    #[test]
    fn test_ring_has_hole_subpath() {
        #[rustfmt::skip]
        let m = matrix(3, &[
            1, 1, 1,
            1, 0, 1,
            1, 1, 1,
        ]);
        let paths = trace(&m);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0][0], Move(0, 0));
        // Hole boundary starts at the light cell and runs counter-clockwise
        assert_eq!(paths[1][0], Move(1, 1));
    }

    #[test]
    fn test_disjoint_regions() {
        #[rustfmt::skip]
        let m = matrix(3, &[
            1, 0, 0,
            0, 0, 0,
            0, 0, 1,
        ]);
        let paths = trace(&m);
        assert_eq!(paths.len(), 2);
    }
}
