//! SQLite storage implementation for Driftfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `driftfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single writer actor
//! - Repository implementations for users, assets and portfolios
//!
//! # Architecture
//!
//! ```text
//!        core (domain traits)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!          reads: r2d2 pool │ writes: writer actor
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

#[cfg(test)]
mod test_support;

// Repository implementations
pub mod assets;
pub mod portfolios;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use assets::AssetRepository;
pub use portfolios::PortfolioRepository;
pub use users::UserRepository;

// Re-export from driftfolio-core for convenience
pub use driftfolio_core::errors::{DatabaseError, Error, Result};
