//! # llmcost
//!
//! Cost estimation engine for LLM spans.
//!
//! llmcost turns the usage reported for a single LLM call (text tokens,
//! images, audio and video seconds, prompt-cache tokens) into an estimated
//! USD cost, using per-model prices from a price definition file.
//!
//! ## Architecture
//!
//! - **Pricing**: builds an immutable price catalog once at startup and binds
//!   each model to a cost strategy
//! - **Engine**: looks up the catalog per call, with a fallback to a cost
//!   reported in the caller's metadata
//!
//! ## Quick Start
//!
//! ```no_run
//! use llmcost::models::UsageMap;
//! use llmcost::CostEngine;
//!
//! let engine = CostEngine::from_price_file("model_prices_and_context_window.json")?;
//! let usage: UsageMap = [("input_tokens".to_string(), 1200), ("output_tokens".to_string(), 300)]
//!     .into_iter()
//!     .collect();
//! let cost = engine.calculate_cost(Some("gpt-4o"), Some("openai"), Some(&usage), None);
//! println!("${cost}");
//! # Ok::<(), llmcost::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod pricing;

pub use config::Config;
pub use engine::{cost_from_metadata, CostEngine};
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::engine::CostEngine;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::pricing::{CostCalculator, PriceCatalog};
}
