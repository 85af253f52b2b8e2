pub mod document_ctx;
pub mod document_flow;
pub mod marks_parser;

pub use document_ctx::{DocumentCtx, DocumentKind};
pub use document_flow::{DocumentFlow, ProcessOutcome};
pub use marks_parser::{classify_line, parse_marks, LineKind};
