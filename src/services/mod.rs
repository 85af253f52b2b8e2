pub mod field_extractor;
pub mod json_writer;
pub mod mark_sanitizer;
pub mod summary_extractor;
pub mod table_parser;
pub mod text_normalizer;
pub mod warn_writer;

pub use field_extractor::{split_paper_code, ExtractedFields, FieldLayout};
pub use json_writer::JsonWriter;
pub use mark_sanitizer::sanitize_mark;
pub use summary_extractor::{extract_summary, rows_from_text};
pub use table_parser::{html_table_rows, parse_table, parse_table_rows, TableParseOutcome, TableRow};
pub use warn_writer::WarnWriter;
