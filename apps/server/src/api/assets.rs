use std::sync::Arc;

use crate::{
    error::{ApiResult, ErrorBody},
    main_lib::AppState,
    models::{Asset, AssetPrice, NewAsset, SymbolSearchResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use driftfolio_core::assets::AssetSearchQuery;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text symbol or company name.
    #[serde(default)]
    q: String,
    /// 1 to 50, default 10.
    limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/assets/search",
    params(SearchParams),
    responses(
        (status = 200, body = [SymbolSearchResult]),
        (status = 400, body = ErrorBody),
        (status = 503, body = ErrorBody, description = "Market data provider unavailable")
    ),
    security(("bearer" = []))
)]
pub async fn search_assets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<SymbolSearchResult>>> {
    let query = AssetSearchQuery {
        q: params.q,
        limit: params.limit,
    };
    let results = state.asset_service.search_assets(query).await?;
    Ok(Json(
        results.into_iter().map(SymbolSearchResult::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/assets",
    request_body = NewAsset,
    responses((status = 201, body = Asset), (status = 400, body = ErrorBody)),
    security(("bearer" = []))
)]
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewAsset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let asset = state.asset_service.create_asset(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(Asset::from(asset))))
}

#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    params(("id" = String, Path, description = "Asset id")),
    responses((status = 200, body = Asset), (status = 404, body = ErrorBody)),
    security(("bearer" = []))
)]
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Asset>> {
    let asset = state.asset_service.get_asset(&id)?;
    Ok(Json(Asset::from(asset)))
}

#[utoipa::path(
    get,
    path = "/api/assets/{id}/price",
    params(("id" = String, Path, description = "Asset id")),
    responses(
        (status = 200, body = AssetPrice),
        (status = 404, body = ErrorBody),
        (status = 503, body = ErrorBody, description = "No live price available")
    ),
    security(("bearer" = []))
)]
pub async fn get_asset_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssetPrice>> {
    let price = state.asset_service.get_asset_price(&id).await?;
    Ok(Json(AssetPrice::from(price)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", post(create_asset))
        .route("/assets/search", get(search_assets))
        .route("/assets/{id}", get(get_asset))
        .route("/assets/{id}/price", get(get_asset_price))
}
