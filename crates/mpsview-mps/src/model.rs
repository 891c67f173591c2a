use std::fmt;

use indexmap::IndexMap;

/// Constraint type of a row in the ROWS section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowType {
    /// `E`
    Equality,
    /// `G`
    GreaterEqual,
    /// `L`
    LessEqual,
    /// `N`: the objective, or a free row
    ObjectiveOrFree,
}

impl RowType {
    pub const ALL: [RowType; 4] = [
        RowType::Equality,
        RowType::GreaterEqual,
        RowType::LessEqual,
        RowType::ObjectiveOrFree,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "E" => Some(RowType::Equality),
            "G" => Some(RowType::GreaterEqual),
            "L" => Some(RowType::LessEqual),
            "N" => Some(RowType::ObjectiveOrFree),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            RowType::Equality => "E",
            RowType::GreaterEqual => "G",
            RowType::LessEqual => "L",
            RowType::ObjectiveOrFree => "N",
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Kind of a variable bound in the BOUNDS section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundType {
    /// `FR`
    Free,
    /// `FX`
    Fixed,
    /// `LO`
    Lower,
    /// `MI`
    MinusInfinity,
    /// `PL`
    PlusInfinity,
    /// `UP`
    Upper,
}

impl BoundType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "FR" => Some(BoundType::Free),
            "FX" => Some(BoundType::Fixed),
            "LO" => Some(BoundType::Lower),
            "MI" => Some(BoundType::MinusInfinity),
            "PL" => Some(BoundType::PlusInfinity),
            "UP" => Some(BoundType::Upper),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            BoundType::Free => "FR",
            BoundType::Fixed => "FX",
            BoundType::Lower => "LO",
            BoundType::MinusInfinity => "MI",
            BoundType::PlusInfinity => "PL",
            BoundType::Upper => "UP",
        }
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A registered row: its dense index and its type.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub kind: RowType,
}

/// One BOUNDS entry for a column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub kind: BoundType,
    pub value: f64,
}

/// Sparse coefficient matrix keyed by `(row index, column index)`.
pub type Elements = IndexMap<(usize, usize), f64>;

/// The validated contents of one MPS file.
///
/// Built once by [`crate::Parser`] and read-only afterwards. Maps iterate in
/// first-appearance order. `rhs`, `ranges` and `bounds` are `None` when the
/// file has no data lines for that section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProblem {
    name: String,
    rows: IndexMap<String, Row>,
    columns: IndexMap<String, usize>,
    #[cfg_attr(feature = "serde", serde(with = "element_triplets"))]
    elements: Elements,
    rhs: Option<IndexMap<String, f64>>,
    ranges: Option<IndexMap<String, f64>>,
    bounds: Option<IndexMap<String, Vec<Bound>>>,
}

impl ParsedProblem {
    pub(crate) fn new(
        name: String,
        rows: IndexMap<String, Row>,
        columns: IndexMap<String, usize>,
        elements: Elements,
        rhs: Option<IndexMap<String, f64>>,
        ranges: Option<IndexMap<String, f64>>,
        bounds: Option<IndexMap<String, Vec<Bound>>>,
    ) -> Self {
        Self {
            name,
            rows,
            columns,
            elements,
            rhs,
            ranges,
            bounds,
        }
    }

    /// Problem name from the NAME line (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &IndexMap<String, Row> {
        &self.rows
    }

    pub fn columns(&self) -> &IndexMap<String, usize> {
        &self.columns
    }

    /// Non-zero coefficients only.
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn rhs(&self) -> Option<&IndexMap<String, f64>> {
        self.rhs.as_ref()
    }

    pub fn ranges(&self) -> Option<&IndexMap<String, f64>> {
        self.ranges.as_ref()
    }

    /// Bound entries per column, in file order.
    pub fn bounds(&self) -> Option<&IndexMap<String, Vec<Bound>>> {
        self.bounds.as_ref()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn row(&self, name: &str) -> Option<Row> {
        self.rows.get(name).copied()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Coefficient at `(row, column)`, `None` when not stored.
    pub fn element(&self, row: usize, column: usize) -> Option<f64> {
        self.elements.get(&(row, column)).copied()
    }

    /// Row names ordered by row index.
    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        // Indices are assigned in insertion order, so map order is index order.
        self.rows.keys().map(String::as_str)
    }

    /// Column names ordered by column index.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

#[cfg(feature = "serde")]
mod element_triplets {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Elements;

    #[derive(Serialize, Deserialize)]
    struct Triplet {
        row: usize,
        column: usize,
        value: f64,
    }

    pub fn serialize<S: Serializer>(elements: &Elements, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(elements.iter().map(|(&(row, column), &value)| Triplet {
            row,
            column,
            value,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Elements, D::Error> {
        let triplets = Vec::<Triplet>::deserialize(deserializer)?;
        Ok(triplets
            .into_iter()
            .map(|t| ((t.row, t.column), t.value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_type_tokens() {
        for kind in RowType::ALL {
            assert_eq!(RowType::from_token(kind.token()), Some(kind));
        }
        assert_eq!(RowType::from_token("Z"), None);
        assert_eq!(RowType::from_token("e"), None);
    }

    #[test]
    fn test_bound_type_tokens() {
        assert_eq!(BoundType::from_token("MI"), Some(BoundType::MinusInfinity));
        assert_eq!(BoundType::from_token("BV"), None);
        assert_eq!(BoundType::Upper.to_string(), "UP");
    }

    #[test]
    fn test_accessors() {
        let mut rows = IndexMap::new();
        rows.insert("obj".to_string(), Row { index: 0, kind: RowType::ObjectiveOrFree });
        rows.insert("c1".to_string(), Row { index: 1, kind: RowType::LessEqual });
        let mut columns = IndexMap::new();
        columns.insert("x".to_string(), 0);
        let mut elements = Elements::new();
        elements.insert((1, 0), 2.0);

        let problem = ParsedProblem::new("p".to_string(), rows, columns, elements, None, None, None);
        assert_eq!(problem.row("c1"), Some(Row { index: 1, kind: RowType::LessEqual }));
        assert_eq!(problem.element(1, 0), Some(2.0));
        assert_eq!(problem.element(0, 0), None);
        assert_eq!(problem.row_names().collect::<Vec<_>>(), vec!["obj", "c1"]);
        assert!(problem.rhs().is_none());
    }

    #[test]
    fn test_problem_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParsedProblem>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_elements_serialize_as_triplets() {
        let mut rows = IndexMap::new();
        rows.insert("obj".to_string(), Row { index: 0, kind: RowType::ObjectiveOrFree });
        rows.insert("c1".to_string(), Row { index: 1, kind: RowType::Equality });
        let mut columns = IndexMap::new();
        columns.insert("x".to_string(), 0);
        columns.insert("y".to_string(), 1);
        let mut elements = Elements::new();
        elements.insert((1, 1), -1.5);
        elements.insert((0, 0), 2.0);
        let mut rhs = IndexMap::new();
        rhs.insert("c1".to_string(), 4.0);

        let problem = ParsedProblem::new("p".to_string(), rows, columns, elements, Some(rhs), None, None);
        let json = serde_json::to_value(&problem).unwrap();

        assert_eq!(
            json["elements"],
            serde_json::json!([
                { "row": 1, "column": 1, "value": -1.5 },
                { "row": 0, "column": 0, "value": 2.0 },
            ])
        );
        assert_eq!(json["ranges"], serde_json::Value::Null);

        let back: ParsedProblem = serde_json::from_value(json).unwrap();
        assert_eq!(back, problem);
        assert_eq!(back.elements().keys().collect::<Vec<_>>(), vec![&(1, 1), &(0, 0)]);
    }
}
