//! Market data models
//!
//! - `types` - Type aliases for common identifiers
//! - `quote` - Latest price observation (Quote)
//! - `search` - Search result data (SearchResult)

mod quote;
mod search;
mod types;

pub use quote::Quote;
pub use search::SearchResult;
pub use types::ProviderId;
