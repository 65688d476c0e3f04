use std::sync::Arc;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiResult, ErrorBody},
    main_lib::AppState,
    models::{
        ItemQuantityUpdate, NewPortfolio, Portfolio, PortfolioAnalysis, PortfolioDetail,
        PortfolioItem,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

#[utoipa::path(
    post,
    path = "/api/portfolios",
    request_body = NewPortfolio,
    responses(
        (status = 201, body = PortfolioDetail),
        (status = 400, body = ErrorBody, description = "Invalid items or weights not summing to 100"),
        (status = 404, body = ErrorBody, description = "Unknown asset"),
        (status = 503, body = ErrorBody, description = "Live price unavailable for an asset")
    ),
    security(("bearer" = []))
)]
pub async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<PortfolioDetail>)> {
    let detail = state
        .portfolio_service
        .create_portfolio(&user.id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(PortfolioDetail::from(detail))))
}

#[utoipa::path(
    get,
    path = "/api/portfolios",
    responses((status = 200, body = [Portfolio])),
    security(("bearer" = []))
)]
pub async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<Portfolio>>> {
    let portfolios = state.portfolio_service.list_portfolios(&user.id)?;
    Ok(Json(portfolios.into_iter().map(Portfolio::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/portfolios/{id}",
    params(("id" = String, Path, description = "Portfolio id")),
    responses((status = 200, body = PortfolioDetail), (status = 404, body = ErrorBody)),
    security(("bearer" = []))
)]
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<PortfolioDetail>> {
    let detail = state.portfolio_service.get_portfolio(&user.id, &id)?;
    Ok(Json(PortfolioDetail::from(detail)))
}

#[utoipa::path(
    get,
    path = "/api/portfolios/{id}/analysis",
    params(("id" = String, Path, description = "Portfolio id")),
    responses(
        (status = 200, body = PortfolioAnalysis),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody, description = "Initial investment is not positive")
    ),
    security(("bearer" = []))
)]
pub async fn analyze_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<PortfolioAnalysis>> {
    let analysis = state
        .portfolio_service
        .analyze_portfolio(&user.id, &id)
        .await?;
    Ok(Json(PortfolioAnalysis::from(analysis)))
}

#[utoipa::path(
    patch,
    path = "/api/portfolios/{id}/items/{item_id}",
    params(
        ("id" = String, Path, description = "Portfolio id"),
        ("item_id" = String, Path, description = "Portfolio item id")
    ),
    request_body = ItemQuantityUpdate,
    responses(
        (status = 200, body = PortfolioItem),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody, description = "expected_version is stale")
    ),
    security(("bearer" = []))
)]
pub async fn update_item_quantity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<ItemQuantityUpdate>,
) -> ApiResult<Json<PortfolioItem>> {
    let item = state
        .portfolio_service
        .update_item_quantity(&user.id, &id, &item_id, payload.into())
        .await?;
    Ok(Json(PortfolioItem::from(item)))
}

#[utoipa::path(
    delete,
    path = "/api/portfolios/{id}",
    params(("id" = String, Path, description = "Portfolio id")),
    responses((status = 204), (status = 404, body = ErrorBody)),
    security(("bearer" = []))
)]
pub async fn delete_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .portfolio_service
        .delete_portfolio(&user.id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portfolios",
            get(list_portfolios).post(create_portfolio),
        )
        .route(
            "/portfolios/{id}",
            get(get_portfolio).delete(delete_portfolio),
        )
        .route("/portfolios/{id}/analysis", get(analyze_portfolio))
        .route("/portfolios/{id}/items/{item_id}", patch(update_item_quantity))
}
