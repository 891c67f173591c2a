//! Record shapes accepted in each MPS data section.
//!
//! Every pattern is a pure function from a line's whitespace-separated fields
//! to a borrowed record, or `None` when the line does not have that shape.
//! Each section tries its patterns in a fixed order; the first match wins.

/// A `row value` pair as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub row: &'a str,
    pub value: &'a str,
}

/// One ROWS line: `type name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRecord<'a> {
    pub kind: &'a str,
    pub name: &'a str,
}

/// One COLUMNS line: a column with one or two coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRecord<'a> {
    pub column: &'a str,
    pub first: Entry<'a>,
    pub second: Option<Entry<'a>>,
}

/// One RHS or RANGES line. `vector` is `None` for the headerless variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRecord<'a> {
    pub vector: Option<&'a str>,
    pub first: Entry<'a>,
    pub second: Option<Entry<'a>>,
}

impl<'a> VectorRecord<'a> {
    pub fn entries(&self) -> impl Iterator<Item = Entry<'a>> {
        std::iter::once(self.first).chain(self.second)
    }
}

/// One BOUNDS line. An omitted vector name reads as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundRecord<'a> {
    pub kind: &'a str,
    pub vector: &'a str,
    pub column: &'a str,
    pub value: &'a str,
}

/// Split a data line into fields.
pub fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// A field shaped like a number: `[0-9eE.+-]+`.
///
/// Only the shape is checked; the value itself may still fail to parse.
pub fn is_numeric(field: &str) -> bool {
    !field.is_empty()
        && field
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'e' | b'E' | b'.' | b'+' | b'-'))
}

fn entry<'a>(row: &'a str, value: &'a str) -> Option<Entry<'a>> {
    is_numeric(value).then_some(Entry { row, value })
}

// ROWS

pub fn row_record<'a>(fields: &[&'a str]) -> Option<RowRecord<'a>> {
    match *fields {
        [kind, name] if kind.chars().count() == 1 => Some(RowRecord { kind, name }),
        _ => None,
    }
}

// COLUMNS

pub fn column_two_pair<'a>(fields: &[&'a str]) -> Option<ColumnRecord<'a>> {
    match *fields {
        [column, row1, value1, row2, value2] => Some(ColumnRecord {
            column,
            first: entry(row1, value1)?,
            second: Some(entry(row2, value2)?),
        }),
        _ => None,
    }
}

pub fn column_one_pair<'a>(fields: &[&'a str]) -> Option<ColumnRecord<'a>> {
    match *fields {
        [column, row, value] => Some(ColumnRecord {
            column,
            first: entry(row, value)?,
            second: None,
        }),
        _ => None,
    }
}

// RHS and RANGES

pub fn vector_two_pair<'a>(fields: &[&'a str]) -> Option<VectorRecord<'a>> {
    match *fields {
        [vector, row1, value1, row2, value2] => Some(VectorRecord {
            vector: Some(vector),
            first: entry(row1, value1)?,
            second: Some(entry(row2, value2)?),
        }),
        _ => None,
    }
}

pub fn vector_one_pair<'a>(fields: &[&'a str]) -> Option<VectorRecord<'a>> {
    match *fields {
        [vector, row, value] => Some(VectorRecord {
            vector: Some(vector),
            first: entry(row, value)?,
            second: None,
        }),
        _ => None,
    }
}

pub fn headerless_two_pair<'a>(fields: &[&'a str]) -> Option<VectorRecord<'a>> {
    match *fields {
        [row1, value1, row2, value2] => Some(VectorRecord {
            vector: None,
            first: entry(row1, value1)?,
            second: Some(entry(row2, value2)?),
        }),
        _ => None,
    }
}

pub fn headerless_one_pair<'a>(fields: &[&'a str]) -> Option<VectorRecord<'a>> {
    match *fields {
        [row, value] => Some(VectorRecord {
            vector: None,
            first: entry(row, value)?,
            second: None,
        }),
        _ => None,
    }
}

// BOUNDS

pub fn bound_named<'a>(fields: &[&'a str]) -> Option<BoundRecord<'a>> {
    match *fields {
        [kind, vector, column, value] if is_numeric(value) => Some(BoundRecord {
            kind,
            vector,
            column,
            value,
        }),
        _ => None,
    }
}

pub fn bound_unnamed<'a>(fields: &[&'a str]) -> Option<BoundRecord<'a>> {
    match *fields {
        [kind, column, value] if is_numeric(value) => Some(BoundRecord {
            kind,
            vector: "",
            column,
            value,
        }),
        _ => None,
    }
}

pub fn match_row(line: &str) -> Option<RowRecord<'_>> {
    row_record(&fields(line))
}

pub fn match_column(line: &str) -> Option<ColumnRecord<'_>> {
    let fields = fields(line);
    column_two_pair(&fields).or_else(|| column_one_pair(&fields))
}

/// Named forms take precedence over the headerless fallbacks.
pub fn match_vector(line: &str) -> Option<VectorRecord<'_>> {
    let fields = fields(line);
    vector_two_pair(&fields)
        .or_else(|| vector_one_pair(&fields))
        .or_else(|| headerless_two_pair(&fields))
        .or_else(|| headerless_one_pair(&fields))
}

pub fn match_bound(line: &str) -> Option<BoundRecord<'_>> {
    let fields = fields(line);
    bound_named(&fields).or_else(|| bound_unnamed(&fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_shape() {
        assert!(is_numeric("1.0"));
        assert!(is_numeric("-2.5E+03"));
        assert!(is_numeric("1.2.3"));
        assert!(!is_numeric("1,0"));
        assert!(!is_numeric("inf"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn test_row_record() {
        let record = match_row("  N  COST ");
        assert_eq!(record, Some(RowRecord { kind: "N", name: "COST" }));
        assert_eq!(match_row(" NE COST"), None);
        assert_eq!(match_row(" N COST extra"), None);
    }

    #[test]
    fn test_column_precedence() {
        let two = match_column("    X1  obj  1.0   c1  -2e1").unwrap();
        assert_eq!(two.column, "X1");
        assert_eq!(two.second, Some(Entry { row: "c1", value: "-2e1" }));

        let one = match_column("X1 obj 1.0").unwrap();
        assert_eq!(one.first, Entry { row: "obj", value: "1.0" });
        assert_eq!(one.second, None);

        assert_eq!(match_column("X1 obj one"), None);
        assert_eq!(match_column("X1 obj 1.0 c1"), None);
    }

    #[test]
    fn test_vector_variants() {
        let named = match_vector(" RHS c1 10").unwrap();
        assert_eq!(named.vector, Some("RHS"));

        let headerless = match_vector(" c1 10 c2 20").unwrap();
        assert_eq!(headerless.vector, None);
        assert_eq!(headerless.entries().count(), 2);

        let single = match_vector("c1 10").unwrap();
        assert_eq!(single.vector, None);
        assert_eq!(single.first.row, "c1");
    }

    #[test]
    fn test_bound_records() {
        let named = match_bound(" UP BND x 4").unwrap();
        assert_eq!(named.vector, "BND");
        let unnamed = match_bound(" LO x -1").unwrap();
        assert_eq!(unnamed.vector, "");
        assert_eq!(unnamed.column, "x");
        assert_eq!(match_bound(" FR BND x"), None);
    }
}
