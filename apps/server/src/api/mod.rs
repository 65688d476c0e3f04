use std::sync::Arc;

use axum::{http::HeaderValue, middleware, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{auth::require_jwt, config::Config, error::ErrorBody, main_lib::AppState, models};

pub mod assets;
pub mod auth;
pub mod health;
pub mod portfolios;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::banner,
        health::health,
        auth::signup,
        auth::login,
        assets::search_assets,
        assets::create_asset,
        assets::get_asset,
        assets::get_asset_price,
        portfolios::create_portfolio,
        portfolios::list_portfolios,
        portfolios::get_portfolio,
        portfolios::analyze_portfolio,
        portfolios::update_item_quantity,
        portfolios::delete_portfolio,
    ),
    components(schemas(
        ErrorBody,
        models::Credentials,
        models::User,
        models::LoginResponse,
        models::HealthStatus,
        models::Asset,
        models::NewAsset,
        models::AssetPrice,
        models::SymbolSearchResult,
        models::Portfolio,
        models::PortfolioItem,
        models::PortfolioItemDetail,
        models::PortfolioDetail,
        models::NewPortfolio,
        models::NewPortfolioItem,
        models::ItemQuantityUpdate,
        models::PortfolioAnalysis,
        models::ItemAnalysis,
        models::ItemIssue,
        models::IssueCode,
        models::ItemStatus,
        models::PriceSource,
        models::MissingPricePolicy,
    )),
    modifiers(&BearerAuth),
    tags((name = "driftfolio"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let protected = Router::new()
        .merge(assets::router())
        .merge(portfolios::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = Router::new().merge(auth::router()).merge(protected);

    Router::new()
        .merge(health::router())
        .nest("/api", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
