//! HTTP client for the Driftfolio REST API.

use chrono::Utc;
use log::{debug, warn};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use driftfolio_core::analysis::PortfolioAnalysis;
use driftfolio_core::assets::{Asset, AssetPrice, AssetSearchQuery, NewAsset};
use driftfolio_core::portfolios::{
    ItemQuantityUpdate, NewPortfolio, Portfolio, PortfolioDetail, PortfolioItem,
};
use driftfolio_core::quotes::SymbolSearchResult;
use driftfolio_core::users::{NewUser, User};

use crate::error::ClientError;
use crate::models::{ApiErrorBody, HealthStatus, TokenResponse};
use crate::session::SessionContext;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct DriftfolioClient {
    client: reqwest::Client,
    base_url: String,
}

impl DriftfolioClient {
    /// Creates a client for the server at `base_url` (e.g. "http://localhost:8080").
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_http_client(base_url, client))
    }

    pub fn with_http_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        debug!("[DriftfolioApi] {} {}", method, url);
        self.client.request(method, url)
    }

    fn authorized(
        &self,
        session: &SessionContext,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let token = session.token()?;
        let header = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::Decode(format!("Invalid access token format: {}", e)))?;
        Ok(self.request(method, path).header(AUTHORIZATION, header))
    }

    /// Sends the request and maps non-2xx statuses to [`ClientError`].
    ///
    /// A 401 invalidates `session` when one is given.
    async fn execute(
        &self,
        request: RequestBuilder,
        session: Option<&SessionContext>,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => (err.code, err.message),
            Err(_) => (
                status.as_str().to_string(),
                body.chars().take(200).collect::<String>(),
            ),
        };

        if status == StatusCode::UNAUTHORIZED {
            warn!("[DriftfolioApi] 401 Unauthorized: {}", message);
            if let Some(session) = session {
                session.invalidate();
            }
            return Err(ClientError::Unauthorized(message));
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{} - {}", e, body)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &SessionContext,
        path: &str,
    ) -> Result<T, ClientError> {
        let request = self.authorized(session, Method::GET, path)?;
        let response = self.execute(request, Some(session)).await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &SessionContext,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.authorized(session, method, path)?.json(body);
        let response = self.execute(request, Some(session)).await?;
        Self::decode(response).await
    }

    // Public endpoints

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.execute(self.client.get(url), None).await?;
        Self::decode(response).await
    }

    pub async fn signup(&self, credentials: &NewUser) -> Result<User, ClientError> {
        credentials.validate()?;
        let request = self.request(Method::POST, "/auth/signup").json(credentials);
        let response = self.execute(request, None).await?;
        Self::decode(response).await
    }

    /// Logs in and returns a session expiring after the token's lifetime.
    pub async fn login(&self, credentials: &NewUser) -> Result<SessionContext, ClientError> {
        let request = self.request(Method::POST, "/auth/login").json(credentials);
        let issued_at = Utc::now();
        let response = self.execute(request, None).await?;
        let token: TokenResponse = Self::decode(response).await?;
        Ok(SessionContext::from_token(token, issued_at))
    }

    // Assets

    pub async fn search_assets(
        &self,
        session: &SessionContext,
        query: &AssetSearchQuery,
    ) -> Result<Vec<SymbolSearchResult>, ClientError> {
        let (q, limit) = query.resolve()?;
        let path = format!(
            "/assets/search?q={}&limit={}",
            urlencoding::encode(&q),
            limit
        );
        self.get_json(session, &path).await
    }

    pub async fn create_asset(
        &self,
        session: &SessionContext,
        new_asset: &NewAsset,
    ) -> Result<Asset, ClientError> {
        new_asset.validate()?;
        self.send_json(session, Method::POST, "/assets", new_asset)
            .await
    }

    pub async fn get_asset(
        &self,
        session: &SessionContext,
        asset_id: &str,
    ) -> Result<Asset, ClientError> {
        self.get_json(session, &format!("/assets/{}", urlencoding::encode(asset_id)))
            .await
    }

    pub async fn get_asset_price(
        &self,
        session: &SessionContext,
        asset_id: &str,
    ) -> Result<AssetPrice, ClientError> {
        self.get_json(
            session,
            &format!("/assets/{}/price", urlencoding::encode(asset_id)),
        )
        .await
    }

    // Portfolios

    pub async fn create_portfolio(
        &self,
        session: &SessionContext,
        new_portfolio: &NewPortfolio,
    ) -> Result<PortfolioDetail, ClientError> {
        new_portfolio.validate()?;
        self.send_json(session, Method::POST, "/portfolios", new_portfolio)
            .await
    }

    pub async fn list_portfolios(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Portfolio>, ClientError> {
        self.get_json(session, "/portfolios").await
    }

    pub async fn get_portfolio(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<PortfolioDetail, ClientError> {
        self.get_json(
            session,
            &format!("/portfolios/{}", urlencoding::encode(portfolio_id)),
        )
        .await
    }

    pub async fn analyze_portfolio(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<PortfolioAnalysis, ClientError> {
        self.get_json(
            session,
            &format!("/portfolios/{}/analysis", urlencoding::encode(portfolio_id)),
        )
        .await
    }

    pub async fn update_item_quantity(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
        item_id: &str,
        update: &ItemQuantityUpdate,
    ) -> Result<PortfolioItem, ClientError> {
        update.validate()?;
        let path = format!(
            "/portfolios/{}/items/{}",
            urlencoding::encode(portfolio_id),
            urlencoding::encode(item_id)
        );
        self.send_json(session, Method::PATCH, &path, update).await
    }

    pub async fn delete_portfolio(
        &self,
        session: &SessionContext,
        portfolio_id: &str,
    ) -> Result<(), ClientError> {
        let path = format!("/portfolios/{}", urlencoding::encode(portfolio_id));
        let request = self.authorized(session, Method::DELETE, &path)?;
        self.execute(request, Some(session)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use driftfolio_core::portfolios::NewPortfolioItem;
    use rust_decimal_macros::dec;

    // Nothing listens here; requests that reach the network fail with `Http`.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn live_session() -> SessionContext {
        SessionContext::new("tok", Utc::now() + ChronoDuration::minutes(5))
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = DriftfolioClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_invalid_portfolio_is_rejected_before_sending() {
        let client = DriftfolioClient::new(UNREACHABLE).unwrap();
        let new_portfolio = NewPortfolio {
            name: "Growth".to_string(),
            description: None,
            initial_invest_amount: dec!(1000),
            items: vec![
                NewPortfolioItem::new("a1", dec!(60)),
                NewPortfolioItem::new("a2", dec!(30)),
            ],
        };

        let err = client
            .create_portfolio(&live_session(), &new_portfolio)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(err.to_string().contains("Target weights must sum to 100%"));
    }

    #[tokio::test]
    async fn test_invalid_signup_is_rejected_before_sending() {
        let client = DriftfolioClient::new(UNREACHABLE).unwrap();
        let err = client
            .signup(&NewUser::new("nope", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_expired_session_fails_without_request() {
        let client = DriftfolioClient::new(UNREACHABLE).unwrap();
        let session = SessionContext::new("tok", Utc::now() - ChronoDuration::seconds(1));

        let err = client.list_portfolios(&session).await.unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired));
        assert!(err.requires_login());
        assert!(session.is_invalidated());
    }

    #[tokio::test]
    async fn test_negative_quantity_is_rejected_before_sending() {
        let client = DriftfolioClient::new(UNREACHABLE).unwrap();
        let err = client
            .update_item_quantity(
                &live_session(),
                "p1",
                "i1",
                &ItemQuantityUpdate::new(dec!(-1)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
