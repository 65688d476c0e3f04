//! Assets module - reference data for tradable symbols.

mod assets_model;
mod assets_service;
mod assets_traits;


// Re-export the public interface
pub use assets_model::{Asset, AssetPrice, AssetSearchQuery, NewAsset};
pub use assets_service::AssetService;
pub use assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
