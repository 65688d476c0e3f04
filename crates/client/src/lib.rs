//! Typed async client for the Driftfolio REST API.
//!
//! Every authenticated call takes an explicit [`SessionContext`]. A 401 from the
//! server, or a token past its local expiry, invalidates the session and fires
//! its logout callback.
//!
//! ```ignore
//! let client = DriftfolioClient::new("http://localhost:8080")?;
//! let session = client
//!     .login(&NewUser::new("ann@example.com", "secret1"))
//!     .await?
//!     .with_logout(|| println!("signed out"));
//! let portfolios = client.list_portfolios(&session).await?;
//! ```

mod client;
mod error;
mod models;
mod session;

pub use client::{DriftfolioClient, DEFAULT_TIMEOUT_SECS};
pub use error::ClientError;
pub use models::{ApiErrorBody, HealthStatus, TokenResponse};
pub use session::SessionContext;
