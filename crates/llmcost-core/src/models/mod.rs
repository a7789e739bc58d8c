//! Data models for llmcost

mod price;
mod span;
mod usage;

pub use price::*;
pub use span::*;
pub use usage::*;
