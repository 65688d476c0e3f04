//! Quotes module - live price lookup over a market data provider.

mod quotes_model;
mod quotes_service;
mod quotes_traits;

#[cfg(test)]
mod quotes_service_tests;

pub use quotes_model::SymbolSearchResult;
pub use quotes_service::QuoteService;
pub use quotes_traits::QuoteServiceTrait;
