pub mod engine;
pub mod mark;
pub mod pipeline;
pub mod record;
pub mod summary;

pub use engine::EngineOutput;
pub use mark::Mark;
pub use pipeline::Pipeline;
pub use record::{PaperRecord, TableRecord};
pub use summary::{SemesterSummary, SubjectGrade};
