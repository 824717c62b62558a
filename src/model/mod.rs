pub mod report;

pub use report::{DayResult, GenerateRequest};
