use std::io;

use thiserror::Error;

use crate::model::RowType;
use crate::sections::Section;

/// Structural or referential problem in MPS input.
///
/// Variants that concern a data line carry the raw line verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("No {0} section")]
    MissingSection(Section),
    #[error("No {0} data")]
    EmptySection(Section),
    #[error("Cannot parse '{line}' in MPS {section} section")]
    UnparseableLine { section: Section, line: String },
    #[error("Unknown row '{row}' in '{line}' in MPS {section} section")]
    UnknownRow {
        section: Section,
        row: String,
        line: String,
    },
    #[error("Unknown column '{column}' in '{line}' in MPS {section} section")]
    UnknownColumn {
        section: Section,
        column: String,
        line: String,
    },
    #[error("Duplicate '{row}' (type='{existing}') found in '{line}' in MPS ROWS section")]
    DuplicateRow {
        row: String,
        existing: RowType,
        line: String,
    },
    #[error("Unknown row type '{token}' in '{line}' in MPS ROWS section")]
    UnknownRowType { token: String, line: String },
    #[error("Unknown bounds type '{token}' in '{line}' in MPS BOUNDS section")]
    UnknownBoundType { token: String, line: String },
    #[error("Invalid number '{value}' in '{line}' in MPS {section} section")]
    InvalidNumber {
        section: Section,
        value: String,
        line: String,
    },
}

impl FormatError {
    /// The section the problem was found in.
    pub fn section(&self) -> Section {
        match self {
            FormatError::MissingSection(section) | FormatError::EmptySection(section) => *section,
            FormatError::UnparseableLine { section, .. }
            | FormatError::UnknownRow { section, .. }
            | FormatError::UnknownColumn { section, .. }
            | FormatError::InvalidNumber { section, .. } => *section,
            FormatError::DuplicateRow { .. } | FormatError::UnknownRowType { .. } => Section::Rows,
            FormatError::UnknownBoundType { .. } => Section::Bounds,
        }
    }
}

#[derive(Error, Debug)]
pub enum MpsError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("MPS format error in '{path}': {source}")]
    Format {
        path: String,
        #[source]
        source: FormatError,
    },
}

impl MpsError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        MpsError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<String>, source: FormatError) -> Self {
        MpsError::Format {
            path: path.into(),
            source,
        }
    }

    /// The file (or origin label) the error refers to.
    pub fn path(&self) -> &str {
        match self {
            MpsError::Io { path, .. } | MpsError::Format { path, .. } => path,
        }
    }

    /// The format error, if this is not an I/O failure.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            MpsError::Format { source, .. } => Some(source),
            MpsError::Io { .. } => None,
        }
    }
}
