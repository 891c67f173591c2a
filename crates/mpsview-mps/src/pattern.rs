//! Downsampled raster of the coefficient matrix's non-zero structure.

use std::fmt::Write;

use crate::model::ParsedProblem;

/// Non-zero pattern of the matrix, scaled to fit a maximum raster size.
///
/// Columns map to x and rows to y. The aspect ratio is preserved: if the
/// matrix is wider than `max_width` both axes shrink to fit the width, and if
/// it is then still taller than `max_height` both axes shrink again.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsityPattern {
    width: usize,
    height: usize,
    width_factor: f64,
    height_factor: f64,
    cells: Vec<bool>,
}

impl SparsityPattern {
    pub fn new(problem: &ParsedProblem, max_width: usize, max_height: usize) -> Self {
        let max_width = max_width.max(1) as f64;
        let max_height = max_height.max(1) as f64;

        let mut width = problem.num_columns() as f64;
        let mut height = problem.num_rows() as f64;
        let mut width_factor = 1.0;
        let mut height_factor = 1.0;

        if width > max_width {
            let reduction = max_width / width;
            width_factor = reduction;
            height_factor = reduction;
            width = max_width;
            height *= reduction;
        }
        if height > max_height {
            let reduction = max_height / height;
            width_factor *= reduction;
            height_factor *= reduction;
            width *= reduction;
            height = max_height;
        }

        let width = width as usize + 1;
        let height = height as usize + 1;
        log::debug!(
            "Sparsity raster {}x{} (factors {:.4}, {:.4})",
            width,
            height,
            width_factor,
            height_factor
        );

        let mut cells = vec![false; width * height];
        for &(row, column) in problem.elements().keys() {
            let x = ((column as f64 * width_factor) as usize).min(width - 1);
            let y = ((row as f64 * height_factor) as usize).min(height - 1);
            cells[y * width + x] = true;
        }

        Self {
            width,
            height,
            width_factor,
            height_factor,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Scale applied to column (x) and row (y) indices.
    pub fn factors(&self) -> (f64, f64) {
        (self.width_factor, self.height_factor)
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn set_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// `#` for set cells, `.` otherwise, one line per raster row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            out.extend(row.iter().map(|&set| if set { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }

    /// Plain PBM (`P1`), set cells black.
    pub fn to_pbm(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "P1");
        let _ = writeln!(out, "{} {}", self.width, self.height);
        for row in self.cells.chunks(self.width) {
            let line: Vec<&str> = row.iter().map(|&set| if set { "1" } else { "0" }).collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    const DIAGONAL: &str = r#"NAME diag
ROWS
 E r0
 E r1
 E r2
COLUMNS
 a r0 1
 b r1 1
 c r2 1
RHS
ENDATA
"#;

    #[test]
    fn test_unscaled_pattern() {
        let problem = Parser::parse(DIAGONAL).unwrap();
        let pattern = SparsityPattern::new(&problem, 100, 100);

        assert_eq!((pattern.width(), pattern.height()), (4, 4));
        assert_eq!(pattern.factors(), (1.0, 1.0));
        assert!(pattern.is_set(0, 0));
        assert!(pattern.is_set(2, 2));
        assert!(!pattern.is_set(1, 0));
        assert_eq!(pattern.set_cells(), 3);
        assert_eq!(pattern.to_text(), "#...\n.#..\n..#.\n....\n");
    }

    #[test]
    fn test_scaled_to_max_width() {
        let problem = Parser::parse(DIAGONAL).unwrap();
        let pattern = SparsityPattern::new(&problem, 1, 100);

        // Both axes shrink by 1/3: 1 x 1, plus the trailing cell.
        assert_eq!((pattern.width(), pattern.height()), (2, 2));
        assert!(pattern.is_set(0, 0));
        assert_eq!(pattern.set_cells(), 1);
    }

    #[test]
    fn test_pbm_output() {
        let problem = Parser::parse(DIAGONAL).unwrap();
        let pbm = SparsityPattern::new(&problem, 100, 100).to_pbm();
        let mut lines = pbm.lines();
        assert_eq!(lines.next(), Some("P1"));
        assert_eq!(lines.next(), Some("4 4"));
        assert_eq!(lines.next(), Some("1 0 0 0"));
    }
}
