//! Portfolios module - target allocations, holdings and their analysis.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

#[cfg(test)]
mod portfolios_model_tests;

// Re-export the public interface
pub use portfolios_model::{
    ItemQuantityUpdate, NewPortfolio, NewPortfolioItem, Portfolio, PortfolioDetail, PortfolioItem,
    PortfolioItemDetail,
};
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
