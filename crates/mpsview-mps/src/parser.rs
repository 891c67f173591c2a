use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;

use crate::error::{FormatError, MpsError};
use crate::model::{Bound, BoundType, Elements, ParsedProblem, Row, RowType};
use crate::records::{self, Entry};
use crate::sections::{self, Flow, Section, SectionSplitter, Sections};

/// Origin label used for sources that do not come from a file.
pub const MEMORY_ORIGIN: &str = "<memory>";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads MPS input into a [`ParsedProblem`].
pub struct Parser;

impl Parser {
    /// Parse MPS text held in memory.
    pub fn parse(source: &str) -> Result<ParsedProblem, MpsError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        sections::split(source.lines())
            .and_then(build)
            .map_err(|e| MpsError::format(MEMORY_ORIGIN, e))
    }

    /// Parse MPS text from `reader` in a single pass, stopping at ENDATA.
    ///
    /// `origin` names the input in error messages. Input is decoded as UTF-8:
    /// a leading byte order mark is dropped and invalid sequences become
    /// U+FFFD.
    pub fn parse_reader<R: BufRead>(mut reader: R, origin: &str) -> Result<ParsedProblem, MpsError> {
        let mut splitter = SectionSplitter::new();
        let mut buf = Vec::new();
        let mut first = true;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| MpsError::io(origin, e))?;
            if read == 0 {
                break;
            }
            let bytes = if first {
                first = false;
                buf.strip_prefix(UTF8_BOM).unwrap_or(&buf)
            } else {
                &buf[..]
            };
            let line = String::from_utf8_lossy(bytes);
            let line = line.trim_end_matches(['\n', '\r']);
            let flow = splitter.push(line).map_err(|e| MpsError::format(origin, e))?;
            if flow == Flow::Done {
                break;
            }
        }
        splitter
            .finish()
            .and_then(build)
            .map_err(|e| MpsError::format(origin, e))
    }

    /// Parse the MPS file at `path`.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedProblem, MpsError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| MpsError::io(&origin, e))?;
        let problem = Self::parse_reader(BufReader::new(file), &origin)?;
        log::info!(
            "Loaded '{}': {} rows, {} columns, {} elements",
            origin,
            problem.num_rows(),
            problem.num_columns(),
            problem.num_elements()
        );
        Ok(problem)
    }
}

/// Run every extractor over the split sections.
fn build(sections: Sections) -> Result<ParsedProblem, FormatError> {
    let rows = extract_rows(&sections.rows)?;
    let (columns, elements) = extract_columns(&sections.columns, &rows)?;

    let rhs = if sections.rhs.is_empty() {
        None
    } else {
        Some(extract_vector(Section::Rhs, &sections.rhs, &rows)?)
    };
    let ranges = if sections.ranges.is_empty() {
        None
    } else {
        Some(extract_vector(Section::Ranges, &sections.ranges, &rows)?)
    };
    let bounds = if sections.bounds.is_empty() {
        None
    } else {
        Some(extract_bounds(&sections.bounds, &columns)?)
    };

    Ok(ParsedProblem::new(
        sections.name,
        rows,
        columns,
        elements,
        rhs,
        ranges,
        bounds,
    ))
}

fn parse_value(section: Section, value: &str, line: &str) -> Result<f64, FormatError> {
    value.parse::<f64>().map_err(|_| FormatError::InvalidNumber {
        section,
        value: value.to_string(),
        line: line.to_string(),
    })
}

fn unparseable(section: Section, line: &str) -> FormatError {
    FormatError::UnparseableLine {
        section,
        line: line.to_string(),
    }
}

fn lookup_row(rows: &IndexMap<String, Row>, section: Section, row: &str, line: &str) -> Result<Row, FormatError> {
    rows.get(row).copied().ok_or_else(|| FormatError::UnknownRow {
        section,
        row: row.to_string(),
        line: line.to_string(),
    })
}

pub(crate) fn extract_rows(lines: &[String]) -> Result<IndexMap<String, Row>, FormatError> {
    let mut rows: IndexMap<String, Row> = IndexMap::with_capacity(lines.len());

    for line in lines {
        let record = records::match_row(line).ok_or_else(|| unparseable(Section::Rows, line))?;
        let kind = RowType::from_token(record.kind).ok_or_else(|| FormatError::UnknownRowType {
            token: record.kind.to_string(),
            line: line.to_string(),
        })?;

        let index = rows.len();
        match rows.entry(record.name.to_string()) {
            MapEntry::Occupied(existing) => {
                return Err(FormatError::DuplicateRow {
                    row: record.name.to_string(),
                    existing: existing.get().kind,
                    line: line.to_string(),
                });
            }
            MapEntry::Vacant(slot) => {
                slot.insert(Row { index, kind });
            }
        }
    }

    log::debug!("Extracted {} rows", rows.len());
    Ok(rows)
}

/// Column ids and non-zero elements, discovered together in one pass.
///
/// A repeated `(row, column)` pair overwrites the earlier value; zeros are
/// never stored.
pub(crate) fn extract_columns(
    lines: &[String],
    rows: &IndexMap<String, Row>,
) -> Result<(IndexMap<String, usize>, Elements), FormatError> {
    let mut columns: IndexMap<String, usize> = IndexMap::new();
    let mut elements = Elements::new();

    for line in lines {
        let record = records::match_column(line).ok_or_else(|| unparseable(Section::Columns, line))?;

        // Every row must resolve before the column is registered.
        let first_row = lookup_row(rows, Section::Columns, record.first.row, line)?;
        let second = match record.second {
            Some(entry) => Some((lookup_row(rows, Section::Columns, entry.row, line)?, entry)),
            None => None,
        };

        let next_id = columns.len();
        let column = *columns.entry(record.column.to_string()).or_insert(next_id);

        let pairs = std::iter::once((first_row, record.first)).chain(second);
        for (row, Entry { value, .. }) in pairs {
            let value = parse_value(Section::Columns, value, line)?;
            if value != 0.0 {
                elements.insert((row.index, column), value);
            }
        }
    }

    log::debug!("Extracted {} columns and {} elements", columns.len(), elements.len());
    Ok((columns, elements))
}

/// Shared RHS / RANGES extraction.
///
/// Only the first named vector is read: the first line carrying a different
/// vector name ends the section, and it and all later lines are ignored.
pub(crate) fn extract_vector(
    section: Section,
    lines: &[String],
    rows: &IndexMap<String, Row>,
) -> Result<IndexMap<String, f64>, FormatError> {
    let mut values: IndexMap<String, f64> = IndexMap::new();
    let mut active: Option<&str> = None;

    for (pos, line) in lines.iter().enumerate() {
        let record = records::match_vector(line).ok_or_else(|| unparseable(section, line))?;

        if let Some(vector) = record.vector {
            match active {
                None => active = Some(vector),
                Some(name) if name != vector => {
                    log::warn!(
                        "{} vector '{}' is not supported, ignoring it and the {} line(s) after it (using '{}')",
                        section,
                        vector,
                        lines.len() - pos - 1,
                        name
                    );
                    break;
                }
                Some(_) => {}
            }
        }

        for entry in record.entries() {
            lookup_row(rows, section, entry.row, line)?;
        }
        for entry in record.entries() {
            let value = parse_value(section, entry.value, line)?;
            values.insert(entry.row.to_string(), value);
        }
    }

    log::debug!("Extracted {} {} values", values.len(), section);
    Ok(values)
}

/// BOUNDS extraction, keeping the entries of each column in file order.
///
/// The first vector name wins, as in [`extract_vector`]; a line without a
/// vector name counts as the empty name.
pub(crate) fn extract_bounds(
    lines: &[String],
    columns: &IndexMap<String, usize>,
) -> Result<IndexMap<String, Vec<Bound>>, FormatError> {
    let mut bounds: IndexMap<String, Vec<Bound>> = IndexMap::new();
    let mut active: Option<&str> = None;

    for (pos, line) in lines.iter().enumerate() {
        let record = records::match_bound(line).ok_or_else(|| unparseable(Section::Bounds, line))?;

        let kind = BoundType::from_token(record.kind).ok_or_else(|| FormatError::UnknownBoundType {
            token: record.kind.to_string(),
            line: line.to_string(),
        })?;

        match active {
            None => active = Some(record.vector),
            Some(name) if name != record.vector => {
                log::warn!(
                    "BOUNDS vector '{}' is not supported, ignoring it and the {} line(s) after it (using '{}')",
                    record.vector,
                    lines.len() - pos - 1,
                    name
                );
                break;
            }
            Some(_) => {}
        }

        if !columns.contains_key(record.column) {
            return Err(FormatError::UnknownColumn {
                section: Section::Bounds,
                column: record.column.to_string(),
                line: line.to_string(),
            });
        }

        let value = parse_value(Section::Bounds, record.value, line)?;
        bounds
            .entry(record.column.to_string())
            .or_default()
            .push(Bound { kind, value });
    }

    log::debug!("Extracted bounds for {} columns", bounds.len());
    Ok(bounds)
}
