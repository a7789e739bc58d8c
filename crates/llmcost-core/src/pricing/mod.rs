//! Pricing module - model price catalog and cost strategies
//!
//! Raw price definitions are turned into an immutable [`PriceCatalog`] once at
//! startup. Each entry is bound to a [`CostCalculator`] chosen from its
//! provider and whether it has prompt-cache pricing.

mod calculator;
mod catalog;
pub mod provider;
pub mod source;

pub use calculator::CostCalculator;
pub use catalog::PriceCatalog;
pub use source::{load_price_file, parse_price_definitions, RawPriceDefinitions};
