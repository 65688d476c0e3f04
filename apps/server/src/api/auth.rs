use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use driftfolio_core::users::NewUser;

use crate::{
    error::{ApiResult, ErrorBody},
    main_lib::AppState,
    models::{Credentials, LoginResponse, User},
};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = Credentials,
    responses(
        (status = 201, body = User),
        (status = 400, body = ErrorBody, description = "Invalid email, short password or email taken")
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.signup(NewUser::from(payload)).await?;
    Ok((StatusCode::CREATED, Json(User::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.auth.issue_token(&user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}
