use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use driftfolio_core::errors::{AuthError, Error as CoreError, Result as CoreResult};
use driftfolio_core::users::PasswordHasherTrait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

/// Argon2id hashing in PHC string format.
#[derive(Default)]
pub struct Argon2Hasher;

impl PasswordHasherTrait for Argon2Hasher {
    fn hash(&self, password: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, password_hash: &str) -> CoreResult<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| CoreError::Unexpected(format!("Invalid stored password hash: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(other) => Err(CoreError::Unexpected(format!(
                "Password verification failed: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// The user a request was authenticated as, set by [`require_jwt`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl AuthManager {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            validation,
            token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: &str) -> ApiResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal("System clock is before UNIX_EPOCH".into()))?;
        self.sign(user_id, now, now + self.token_ttl)
    }

    fn sign(&self, user_id: &str, issued_at: Duration, expires_at: Duration) -> ApiResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.as_secs() as usize,
            exp: expires_at.as_secs() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Returns the user id the token was issued for.
    pub fn validate_token(&self, token: &str) -> ApiResult<String> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| {
                tracing::debug!("Rejected token: {:?}", err.kind());
                ApiError::Core(CoreError::Auth(AuthError::Unauthorized(
                    "Invalid or expired token".to_string(),
                )))
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Core(CoreError::Auth(AuthError::Unauthorized(message.to_string())))
}

fn bearer_token(request: &Request<Body>) -> ApiResult<&str> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(unauthorized("Malformed authorization header"));
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(unauthorized("Malformed authorization header"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized("Missing bearer token"));
    }
    Ok(token)
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let user_id = state.auth.validate_token(bearer_token(&request)?)?;

    // A token for a user that no longer exists is as good as no token.
    let user = state.user_service.get_user(&user_id).map_err(|e| match e {
        CoreError::NotFound(_) => unauthorized("Unknown user"),
        other => ApiError::Core(other),
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: user.id,
        email: user.email,
    });
    Ok(next.run(request).await)
}
