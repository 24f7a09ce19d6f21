pub mod analyzer;
pub mod rules;
pub mod scoring;

pub use analyzer::{IssueAnalyzer, analyze_performance};
pub use rules::{AnalysisInput, Rule};
