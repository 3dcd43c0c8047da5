pub mod report;
pub mod student;
