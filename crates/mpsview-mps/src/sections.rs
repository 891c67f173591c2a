//! Splits an MPS line stream into per-section buckets.

use std::fmt;

use crate::error::FormatError;

/// The sections of an MPS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Name,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
    Endata,
}

impl Section {
    pub fn keyword(self) -> &'static str {
        match self {
            Section::Name => "NAME",
            Section::Rows => "ROWS",
            Section::Columns => "COLUMNS",
            Section::Rhs => "RHS",
            Section::Ranges => "RANGES",
            Section::Bounds => "BOUNDS",
            Section::Endata => "ENDATA",
        }
    }

    /// Recognise a section header line. `NAME` is handled by [`name_header`].
    fn header(line: &str) -> Option<Section> {
        match line.trim() {
            "ROWS" => Some(Section::Rows),
            "COLUMNS" => Some(Section::Columns),
            "RHS" => Some(Section::Rhs),
            "RANGES" => Some(Section::Ranges),
            "BOUNDS" => Some(Section::Bounds),
            "ENDATA" => Some(Section::Endata),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The problem name of a `NAME` header line, if `line` is one.
fn name_header(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("NAME")?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Blank lines and lines starting with `*` or `&`.
pub fn is_comment(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('*') || line.starts_with('&')
}

/// Data lines of every section, as read from the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub name: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub rhs: Vec<String>,
    pub ranges: Vec<String>,
    pub bounds: Vec<String>,
}

/// Whether the splitter wants more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekName,
    SeekRows,
    /// Collecting data lines into the given section.
    Collect(Section),
    Done,
}

/// Streaming section splitter.
///
/// Feed lines with [`SectionSplitter::push`] until it returns [`Flow::Done`]
/// or input runs out, then call [`SectionSplitter::finish`].
///
/// Order is fixed up to RHS: NAME, ROWS, COLUMNS, RHS. After RHS any number of
/// RANGES and BOUNDS headers may follow in any order until ENDATA.
#[derive(Debug)]
pub struct SectionSplitter {
    state: State,
    sections: Sections,
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSplitter {
    pub fn new() -> Self {
        Self {
            state: State::SeekName,
            sections: Sections::default(),
        }
    }

    pub fn push(&mut self, line: &str) -> Result<Flow, FormatError> {
        match self.state {
            State::SeekName => {
                if let Some(name) = name_header(line) {
                    log::debug!("NAME section found: '{}'", name);
                    self.sections.name = name.to_string();
                    self.state = State::SeekRows;
                }
            }
            State::SeekRows => {
                if Section::header(line) == Some(Section::Rows) {
                    self.enter(Section::Rows);
                }
            }
            State::Collect(active) => {
                if is_comment(line) {
                    return Ok(Flow::Continue);
                }
                match (active, Section::header(line)) {
                    (Section::Rows, Some(Section::Columns)) => {
                        if self.sections.rows.is_empty() {
                            return Err(FormatError::EmptySection(Section::Rows));
                        }
                        self.enter(Section::Columns);
                    }
                    (Section::Columns, Some(Section::Rhs)) => {
                        if self.sections.columns.is_empty() {
                            return Err(FormatError::EmptySection(Section::Columns));
                        }
                        self.enter(Section::Rhs);
                    }
                    (
                        Section::Rhs | Section::Ranges | Section::Bounds,
                        Some(next @ (Section::Ranges | Section::Bounds)),
                    ) => self.enter(next),
                    (Section::Rhs | Section::Ranges | Section::Bounds, Some(Section::Endata)) => {
                        log::debug!("ENDATA reached");
                        self.state = State::Done;
                        return Ok(Flow::Done);
                    }
                    _ => self.bucket(active).push(line.to_string()),
                }
            }
            State::Done => return Ok(Flow::Done),
        }
        Ok(Flow::Continue)
    }

    /// Check that every mandatory section was seen and hand out the buckets.
    pub fn finish(self) -> Result<Sections, FormatError> {
        let missing = match self.state {
            State::Done => return Ok(self.sections),
            State::SeekName => Section::Name,
            State::SeekRows => Section::Rows,
            State::Collect(Section::Rows) => Section::Columns,
            State::Collect(Section::Columns) => Section::Rhs,
            State::Collect(_) => Section::Endata,
        };
        Err(FormatError::MissingSection(missing))
    }

    fn enter(&mut self, section: Section) {
        log::debug!("{} section starts", section);
        self.state = State::Collect(section);
    }

    fn bucket(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Rows => &mut self.sections.rows,
            Section::Columns => &mut self.sections.columns,
            Section::Rhs => &mut self.sections.rhs,
            Section::Ranges => &mut self.sections.ranges,
            Section::Bounds => &mut self.sections.bounds,
            Section::Name | Section::Endata => unreachable!("no data lines are collected for {section}"),
        }
    }
}

/// Split a complete sequence of lines.
pub fn split<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Sections, FormatError> {
    let mut splitter = SectionSplitter::new();
    for line in lines {
        if splitter.push(line)? == Flow::Done {
            break;
        }
    }
    splitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_all_sections() {
        let source = r#"* leading comment
NAME          demo
ROWS
 N  obj
* comment inside ROWS
 L  c1

COLUMNS
    x  obj  1.0  c1  2.0
RHS
    rhs  c1  10.0
BOUNDS
 UP BND x 4.0
RANGES
    rng  c1  2.0
ENDATA
"#;
        let sections = split(source.lines()).unwrap();
        assert_eq!(sections.name, "demo");
        assert_eq!(sections.rows, vec![" N  obj", " L  c1"]);
        assert_eq!(sections.columns.len(), 1);
        assert_eq!(sections.rhs.len(), 1);
        assert_eq!(sections.ranges, vec!["    rng  c1  2.0"]);
        assert_eq!(sections.bounds, vec![" UP BND x 4.0"]);
    }

    #[test]
    fn test_name_header_variants() {
        assert_eq!(name_header("NAME   afiro  "), Some("afiro"));
        assert_eq!(name_header("NAME"), Some(""));
        assert_eq!(name_header("NAMES x"), None);
        assert_eq!(name_header(" ROWS"), None);
    }

    #[test]
    fn test_missing_sections() {
        let cases = [
            ("ROWS\n N obj\n", Section::Name),
            ("NAME p\n", Section::Rows),
            ("NAME p\nROWS\n N obj\n", Section::Columns),
            ("NAME p\nROWS\n N obj\nCOLUMNS\n x obj 1\n", Section::Rhs),
            ("NAME p\nROWS\n N obj\nCOLUMNS\n x obj 1\nRHS\n", Section::Endata),
        ];
        for (source, missing) in cases {
            assert_eq!(split(source.lines()), Err(FormatError::MissingSection(missing)), "{source}");
        }
    }

    #[test]
    fn test_empty_mandatory_sections() {
        let no_rows = "NAME p\nROWS\n* nothing\nCOLUMNS\n x obj 1\nRHS\nENDATA\n";
        assert_eq!(split(no_rows.lines()), Err(FormatError::EmptySection(Section::Rows)));

        let no_columns = "NAME p\nROWS\n N obj\nCOLUMNS\n\nRHS\nENDATA\n";
        assert_eq!(split(no_columns.lines()), Err(FormatError::EmptySection(Section::Columns)));
    }

    #[test]
    fn test_lines_after_endata_are_not_read() {
        let mut splitter = SectionSplitter::new();
        for line in ["NAME p", "ROWS", " N obj", "COLUMNS", " x obj 1", "RHS"] {
            assert_eq!(splitter.push(line), Ok(Flow::Continue));
        }
        assert_eq!(splitter.push("ENDATA"), Ok(Flow::Done));
        assert_eq!(splitter.push("garbage"), Ok(Flow::Done));
        let sections = splitter.finish().unwrap();
        assert!(sections.rhs.is_empty());
    }
}
