pub mod aggregate;
pub mod error;
pub mod filter;
pub mod har;
pub mod metrics;
pub mod report;

pub use error::{Error, Result};
