// Re-export main components
pub mod analyzer;
pub mod corpus;
pub mod engine;
pub mod index;
pub mod parser;
pub mod record;
pub mod report;
pub mod schema;
pub mod storage;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use corpus::CorpusReader;
pub use engine::Engine;
pub use index::{BuiltIndex, IndexBuilder, IndexError, TermEntry};
pub use parser::{ParseError, RecordParser};
pub use record::{FieldAllowlist, Record};
pub use report::{ComparisonReport, VariantStats};
pub use schema::{FieldKind, FieldSpec, IndexSchema};
pub use storage::Storage;

// Re-export error types
pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
