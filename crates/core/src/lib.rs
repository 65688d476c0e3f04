//! Driftfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Driftfolio: the allocation
//! analyzer, portfolio/asset/user services and the quote facade. It is
//! database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate.

pub mod analysis;
pub mod assets;
pub mod constants;
pub mod errors;
pub mod portfolios;
pub mod quotes;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analysis::{analyze, MissingPricePolicy, PortfolioAnalysis};
pub use assets::{Asset, NewAsset};
pub use portfolios::{
    ItemQuantityUpdate, NewPortfolio, NewPortfolioItem, Portfolio, PortfolioDetail, PortfolioItem,
};
pub use users::{NewUser, User};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
