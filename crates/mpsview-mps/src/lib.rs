pub mod error;
pub mod model;
pub mod parser;
pub mod pattern;
pub mod records;
pub mod sections;
pub mod stats;

pub use error::{FormatError, MpsError};
pub use model::{Bound, BoundType, Elements, ParsedProblem, Row, RowType};
pub use parser::{MEMORY_ORIGIN, Parser};
pub use pattern::SparsityPattern;
pub use sections::Section;
pub use stats::{Histogram, ProblemSummary};
