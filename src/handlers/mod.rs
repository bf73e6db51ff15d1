pub mod analyzer;
pub mod prompt;

pub use analyzer::{AnalyzeError, Analyzer};
