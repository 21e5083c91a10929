mod assessments;
mod export;
mod summary;
pub mod views;

pub use assessments::assessment_list;
pub use export::{write_interview_rows_csv, ReportError};
pub use summary::{RunReport, UNKNOWN_INTERVIEW, UNKNOWN_QUESTION};
