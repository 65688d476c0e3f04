//! SQLite storage implementation for portfolios and their items.

mod model;
mod repository;

pub use model::{PortfolioDB, PortfolioItemDB};
pub use repository::PortfolioRepository;
