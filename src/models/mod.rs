pub mod report;
pub mod state;
pub mod submission;
