use std::sync::Arc;

use crate::{auth::Argon2Hasher, auth::AuthManager, config::Config};
use driftfolio_core::{
    assets::{AssetService, AssetServiceTrait},
    portfolios::{PortfolioService, PortfolioServiceTrait},
    quotes::{QuoteService, QuoteServiceTrait},
    users::{UserService, UserServiceTrait},
};
use driftfolio_market_data::{MarketDataProvider, YahooProvider};
use driftfolio_storage_sqlite::{
    assets::AssetRepository, db, portfolios::PortfolioRepository, users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub asset_service: Arc<dyn AssetServiceTrait + Send + Sync>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("DF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also bridges `log` records from the library crates.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the application state with the Yahoo Finance provider.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    build_state_with_provider(config, provider).await
}

/// Builds the application state around any market data provider.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    tracing::info!(
        "Market data provider: {} (missing price policy: {})",
        provider.id(),
        config.missing_price_policy
    );
    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(provider));

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let asset_repository = Arc::new(AssetRepository::new(pool.clone(), writer.clone()));
    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::new(Argon2Hasher),
    ));
    let asset_service = Arc::new(AssetService::new(
        asset_repository.clone(),
        quote_service.clone(),
    ));
    let portfolio_service = Arc::new(PortfolioService::new(
        portfolio_repository,
        asset_repository,
        quote_service,
        config.missing_price_policy,
    ));

    let auth = Arc::new(AuthManager::new(
        &config.jwt_secret,
        config.access_token_ttl,
    ));

    Ok(Arc::new(AppState {
        user_service,
        asset_service,
        portfolio_service,
        auth,
        db_path,
    }))
}
