pub mod attendance;
pub mod report;
pub mod standard_time;
pub mod student;
