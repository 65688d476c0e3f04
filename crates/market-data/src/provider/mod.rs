//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities and rate limiting configuration
//! - The Yahoo Finance provider

mod capabilities;
mod traits;

pub mod yahoo;

pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::MarketDataProvider;
