//! Structure statistics over a parsed problem.

use crate::model::{ParsedProblem, RowType};

/// Default number of histogram buckets.
pub const DEFAULT_BUCKETS: usize = 11;

/// Headline counts for a problem.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub elements: usize,
    /// Entries in RHS, RANGES and BOUNDS; zero when the section is absent.
    pub rhs: usize,
    pub ranges: usize,
    pub bounds: usize,
    pub equality_rows: usize,
    pub greater_rows: usize,
    pub less_rows: usize,
    pub free_rows: usize,
    /// `elements / (rows * columns)`
    pub density: f64,
}

impl ProblemSummary {
    pub fn of(problem: &ParsedProblem) -> Self {
        let count_kind = |kind: RowType| problem.rows().values().filter(|r| r.kind == kind).count();
        let cells = problem.num_rows() * problem.num_columns();
        let density = if cells == 0 {
            0.0
        } else {
            problem.num_elements() as f64 / cells as f64
        };

        Self {
            name: problem.name().to_string(),
            rows: problem.num_rows(),
            columns: problem.num_columns(),
            elements: problem.num_elements(),
            rhs: problem.rhs().map_or(0, |m| m.len()),
            ranges: problem.ranges().map_or(0, |m| m.len()),
            bounds: problem.bounds().map_or(0, |m| m.len()),
            equality_rows: count_kind(RowType::Equality),
            greater_rows: count_kind(RowType::GreaterEqual),
            less_rows: count_kind(RowType::LessEqual),
            free_rows: count_kind(RowType::ObjectiveOrFree),
            density,
        }
    }
}

/// Equal-width histogram over `[lower, upper]`.
///
/// `upper` is counted in the last bucket; values outside the range are
/// ignored.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(lower: f64, upper: f64, buckets: usize) -> Self {
        Self {
            lower,
            upper,
            counts: vec![0; buckets.max(1)],
        }
    }

    pub fn from_values(lower: f64, upper: f64, buckets: usize, values: impl IntoIterator<Item = f64>) -> Self {
        let mut hist = Self::new(lower, upper, buckets);
        for value in values {
            hist.add(value);
        }
        hist
    }

    pub fn bucket_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn add(&mut self, value: f64) {
        if !(self.lower..=self.upper).contains(&value) {
            return;
        }
        let last = self.counts.len() - 1;
        let width = self.bucket_width();
        let bucket = if width > 0.0 {
            (((value - self.lower) / width) as usize).min(last)
        } else {
            0
        };
        self.counts[bucket] += 1;
    }

    /// Lower edge of every bucket.
    pub fn bucket_starts(&self) -> impl Iterator<Item = f64> + '_ {
        let width = self.bucket_width();
        (0..self.counts.len()).map(move |i| self.lower + i as f64 * width)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Stored elements per row, indexed by row index.
pub fn row_tallies(problem: &ParsedProblem) -> Vec<usize> {
    let mut tallies = vec![0; problem.num_rows()];
    for &(row, _) in problem.elements().keys() {
        tallies[row] += 1;
    }
    tallies
}

/// Stored elements per column, indexed by column index.
pub fn column_tallies(problem: &ParsedProblem) -> Vec<usize> {
    let mut tallies = vec![0; problem.num_columns()];
    for &(_, column) in problem.elements().keys() {
        tallies[column] += 1;
    }
    tallies
}

/// Histogram of `log10(|value|)` over all elements.
///
/// The range starts at 0 unless every magnitude is negative, in which case it
/// starts at the smallest one. Infinite coefficients are skipped.
pub fn magnitude_histogram(problem: &ParsedProblem, buckets: usize) -> Histogram {
    let magnitudes: Vec<f64> = problem
        .elements()
        .values()
        .map(|v| v.abs().log10())
        .filter(|m| m.is_finite())
        .collect();
    let max = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);

    let (lower, upper) = if magnitudes.is_empty() {
        (0.0, 0.0)
    } else if max < 0.0 {
        (min, max)
    } else {
        (0.0, max)
    };
    Histogram::from_values(lower, upper, buckets, magnitudes)
}

fn tally_histogram(tallies: &[usize], buckets: usize) -> Histogram {
    let max = tallies.iter().copied().max().unwrap_or(0);
    Histogram::from_values(0.0, max as f64, buckets, tallies.iter().map(|&t| t as f64))
}

/// Distribution of non-zeros per row.
pub fn row_histogram(problem: &ParsedProblem, buckets: usize) -> Histogram {
    tally_histogram(&row_tallies(problem), buckets)
}

/// Distribution of non-zeros per column.
pub fn column_histogram(problem: &ParsedProblem, buckets: usize) -> Histogram {
    tally_histogram(&column_tallies(problem), buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    const SOURCE: &str = r#"NAME stats
ROWS
 N obj
 E c1
 L c2
 G c3
COLUMNS
 x obj 1 c1 10
 x c2 100
 y c1 0.5 c3 1000
 z c3 1
RHS
 RHS c1 1 c2 2
BOUNDS
 UP BND x 4
ENDATA
"#;

    #[test]
    fn test_summary() {
        let problem = Parser::parse(SOURCE).unwrap();
        let summary = ProblemSummary::of(&problem);

        assert_eq!(summary.name, "stats");
        assert_eq!((summary.rows, summary.columns, summary.elements), (4, 3, 6));
        assert_eq!((summary.rhs, summary.ranges, summary.bounds), (2, 0, 1));
        assert_eq!(summary.equality_rows, 1);
        assert_eq!(summary.free_rows, 1);
        assert!((summary.density - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tallies() {
        let problem = Parser::parse(SOURCE).unwrap();
        assert_eq!(row_tallies(&problem), vec![1, 2, 1, 2]);
        assert_eq!(column_tallies(&problem), vec![3, 2, 1]);
    }

    #[test]
    fn test_histogram_edges() {
        let hist = Histogram::from_values(0.0, 10.0, 5, [0.0, 1.9, 2.0, 10.0, 10.5, -1.0]);
        assert_eq!(hist.counts, vec![2, 1, 0, 0, 1]);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.bucket_starts().collect::<Vec<_>>(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_degenerate_range_counts_in_first_bucket() {
        let hist = Histogram::from_values(3.0, 3.0, DEFAULT_BUCKETS, [3.0, 3.0]);
        assert_eq!(hist.counts[0], 2);
        assert_eq!(hist.counts.len(), DEFAULT_BUCKETS);
    }

    #[test]
    fn test_magnitude_histogram() {
        let problem = Parser::parse(SOURCE).unwrap();
        let hist = magnitude_histogram(&problem, 3);
        // log10 magnitudes: 0, 1, 2, -0.30103, 3, 0
        assert_eq!(hist.lower, 0.0);
        assert!((hist.upper - 3.0).abs() < 1e-12);
        assert_eq!(hist.counts, vec![2, 1, 2]);
    }

    #[test]
    fn test_magnitude_histogram_skips_infinite_values() {
        let source = SOURCE.replace(" z c3 1", " z c3 1e400");
        let problem = Parser::parse(&source).unwrap();
        assert_eq!(problem.num_elements(), 6);

        let hist = magnitude_histogram(&problem, 3);
        assert!((hist.upper - 3.0).abs() < 1e-12);
        assert_eq!(hist.counts, vec![1, 1, 2]);
    }

    #[test]
    fn test_row_and_column_histograms() {
        let problem = Parser::parse(SOURCE).unwrap();
        let rows = row_histogram(&problem, 2);
        assert_eq!(rows.counts, vec![0, 4]);
        let columns = column_histogram(&problem, 3);
        assert_eq!(columns.counts, vec![0, 1, 2]);
    }
}
