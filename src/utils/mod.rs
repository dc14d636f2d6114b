pub mod color;
pub mod logger;
pub mod report;
