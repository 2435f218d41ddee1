//! Firebase ID token authentication.
//!
//! Tokens are verified locally against Google's published signing keys, so
//! the only outbound call is the periodic JWKS refresh.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Google JWKS URL for Firebase Auth.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Firebase token issuer prefix.
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// JWKS cache TTL.
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// Minimum gap between refreshes triggered by an unknown key ID.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Token validation failed: {0}")]
    InvalidToken(String),

    #[error("Unknown key ID: {0}")]
    UnknownKey(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("Auth configuration error: {0}")]
    Config(String),
}

/// Decoded Firebase ID token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// User ID
    pub sub: String,
    /// Email (if available)
    pub email: Option<String>,
    /// Email verified
    pub email_verified: Option<bool>,
    /// Issuer
    pub iss: String,
    /// Audience (Firebase project ID)
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// Authentication time
    pub auth_time: Option<i64>,
}

/// Identity attached to a request once its bearer token is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl From<FirebaseClaims> for VerifiedIdentity {
    fn from(claims: FirebaseClaims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified.unwrap_or(false),
        }
    }
}

/// Verifies bearer tokens with the identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Subset of a Google service-account key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

impl ServiceAccount {
    /// Decode a base64-encoded service-account JSON blob.
    pub fn from_base64(blob: &str) -> Result<Self, AuthError> {
        let bytes = BASE64_STANDARD
            .decode(blob.trim())
            .map_err(|e| AuthError::Config(format!("service key is not valid base64: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::Config(format!("service key is not a service account: {}", e)))
    }
}

/// Firebase verifier configuration.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Firebase project ID; the expected token audience
    pub project_id: String,
    /// Where signing keys are published
    pub jwks_url: String,
}

impl FirebaseConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
        }
    }

    /// Create config from environment variables.
    ///
    /// The project comes from `FIREBASE_PROJECT_ID` when set, otherwise from
    /// the base64 service account in `FIREBASE_SERVICE_KEY`.
    pub fn from_env() -> Result<Self, AuthError> {
        let project_id = match std::env::var("FIREBASE_PROJECT_ID") {
            Ok(id) if !id.is_empty() => id,
            _ => {
                let blob = std::env::var("FIREBASE_SERVICE_KEY").map_err(|_| {
                    AuthError::Config("FIREBASE_SERVICE_KEY must be set".to_string())
                })?;
                let account = ServiceAccount::from_base64(&blob)?;
                info!(
                    project_id = %account.project_id,
                    client_email = ?account.client_email,
                    "Loaded Firebase service account"
                );
                account.project_id
            }
        };

        Ok(Self {
            project_id,
            jwks_url: std::env::var("FIREBASE_JWKS_URL")
                .unwrap_or_else(|_| GOOGLE_JWKS_URL.to_string()),
        })
    }
}

/// JWKS response from Google.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

/// Firebase ID token verifier with cached signing keys.
pub struct FirebaseVerifier {
    http: Client,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: RwLock<Option<Instant>>,
    config: FirebaseConfig,
}

impl FirebaseVerifier {
    /// Create a verifier and warm the key cache.
    ///
    /// A failed initial fetch is logged; keys are fetched again on first use.
    pub async fn new(config: FirebaseConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Config(e.to_string()))?;

        let verifier = Self {
            http,
            keys: RwLock::new(HashMap::new()),
            last_refresh: RwLock::new(None),
            config,
        };

        if let Err(e) = verifier.refresh_keys().await {
            warn!("Initial JWKS fetch failed: {}", e);
        }

        Ok(verifier)
    }

    /// Create from environment variables.
    pub async fn from_env() -> Result<Self, AuthError> {
        Self::new(FirebaseConfig::from_env()?).await
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    /// Refresh JWKS keys from Google.
    async fn refresh_keys(&self) -> Result<(), AuthError> {
        debug!("Refreshing JWKS keys");

        // Stamp first so a failing endpoint is not hammered.
        *self.last_refresh.write().await = Some(Instant::now());

        let jwks: JwksResponse = self
            .http
            .get(&self.config.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys.insert(jwk.kid, key);
                }
                Err(e) => warn!(kid = %jwk.kid, "Skipping unusable JWK: {}", e),
            }
        }

        let key_count = keys.len();
        *self.keys.write().await = keys;

        debug!("Refreshed {} JWKS keys", key_count);
        Ok(())
    }

    async fn refreshed_within(&self, window: Duration) -> bool {
        self.last_refresh
            .read()
            .await
            .is_some_and(|t| t.elapsed() < window)
    }

    /// Get decoding key for a key ID.
    async fn get_key(&self, kid: &str) -> Option<DecodingKey> {
        if !self.refreshed_within(JWKS_CACHE_TTL).await {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
        }

        if let Some(key) = self.keys.read().await.get(kid).cloned() {
            return Some(key);
        }

        // Google rotates keys; an unseen kid may be newer than our cache.
        if !self.refreshed_within(MIN_REFRESH_INTERVAL).await {
            if let Err(e) = self.refresh_keys().await {
                warn!("Failed to refresh JWKS keys: {}", e);
            }
            return self.keys.read().await.get(kid).cloned();
        }

        None
    }

    /// Verify a Firebase ID token.
    pub async fn verify_token(&self, token: &str) -> Result<FirebaseClaims, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidToken(format!("invalid header: {}", e)))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token missing key ID".to_string()))?;

        let key = self
            .get_key(&kid)
            .await
            .ok_or(AuthError::UnknownKey(kid))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[format!("{}{}", FIREBASE_ISSUER_PREFIX, self.config.project_id)]);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let token_data = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.verify_token(token).await.map(VerifiedIdentity::from)
    }
}
