//! Verification of Google Sign-In identity tokens.
//!
//! Google signs ID tokens with RS256 and rotates its keys, publishing the
//! current set as a JWKS document. Keys are cached for an hour. A token naming
//! a `kid` the cache does not know triggers an early refetch, at most once
//! every five minutes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Identity extracted from a verified external token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity token rejected: {0}")]
    InvalidToken(String),

    #[error("identity token has no verified email")]
    UnverifiedEmail,

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

#[derive(Default)]
struct KeyCache {
    keys: Option<CachedKeys>,
    last_refresh_attempt: Option<Instant>,
}

impl KeyCache {
    /// Key for `kid` if the cached set is still within its TTL
    fn fresh_key(&self, kid: &str) -> Option<Result<DecodingKey, IdentityError>> {
        let cached = self.keys.as_ref().filter(|c| c.fetched_at.elapsed() < KEY_CACHE_TTL)?;
        let jwk = cached.keys.find(kid)?;
        Some(DecodingKey::from_jwk(jwk).map_err(|e| IdentityError::InvalidToken(e.to_string())))
    }

    fn is_fresh(&self) -> bool {
        self.keys
            .as_ref()
            .is_some_and(|c| c.fetched_at.elapsed() < KEY_CACHE_TTL)
    }

    fn refreshed_recently(&self) -> bool {
        self.last_refresh_attempt
            .is_some_and(|at| at.elapsed() < MIN_REFRESH_INTERVAL)
    }
}

/// Checks Google ID tokens against Google's published keys and the
/// configured OAuth client id.
pub struct GoogleIdentityVerifier {
    client_id: String,
    certs_url: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl GoogleIdentityVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self::with_certs_url(client_id, GOOGLE_CERTS_URL)
    }

    pub fn with_certs_url(client_id: impl Into<String>, certs_url: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            certs_url: certs_url.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        if let Some(key) = self.cache.read().await.fresh_key(kid) {
            return key;
        }

        // Writers queue here, so concurrent misses share one fetch
        let mut cache = self.cache.write().await;
        if let Some(key) = cache.fresh_key(kid) {
            return key;
        }

        // A fresh set without this kid is only refetched once per interval
        if cache.is_fresh() && cache.refreshed_recently() {
            return Err(IdentityError::InvalidToken(format!("unknown signing key {}", kid)));
        }

        cache.last_refresh_attempt = Some(Instant::now());
        let keys = self.fetch_keys().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        cache.keys = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| IdentityError::InvalidToken(format!("unknown signing key {}", kid)))
    }

    async fn fetch_keys(&self) -> Result<JwkSet, IdentityError> {
        debug!("Fetching Google signing keys from {}", self.certs_url);
        let keys = self
            .http
            .get(&self.certs_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(keys)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(id_token).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::InvalidToken(format!("unexpected algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let token = decode::<GoogleClaims>(id_token, &key, &self.validation()).map_err(|e| {
            warn!("Google identity token failed verification: {}", e);
            IdentityError::InvalidToken(e.to_string())
        })?;

        let claims = token.claims;
        match claims.email {
            Some(email) if claims.email_verified => Ok(VerifiedIdentity { email, name: claims.name }),
            _ => Err(IdentityError::UnverifiedEmail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::routing::get;
    use axum::{Json, Router};

    // Header only needs to parse: {"alg":"RS256","kid":"k1","typ":"JWT"}
    const UNKNOWN_KID_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6ImsxIiwidHlwIjoiSldUIn0.e30.c2ln";

    #[tokio::test]
    async fn malformed_tokens_fail_before_key_lookup() {
        // Unroutable certs URL: reaching the network would surface as KeyFetch
        let verifier = GoogleIdentityVerifier::with_certs_url("client-id", "http://127.0.0.1:1/certs");

        let err = verifier.verify("definitely-not-a-jwt").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn hmac_tokens_are_refused() {
        let verifier = GoogleIdentityVerifier::with_certs_url("client-id", "http://127.0.0.1:1/certs");
        let token = crate::auth::SessionKeys::new("secret", 1).unwrap().issue("a@example.com").unwrap();

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn unreachable_key_endpoint_is_a_fetch_error() {
        let verifier = GoogleIdentityVerifier::with_certs_url("client-id", "http://127.0.0.1:1/certs");
        let err = verifier.verify(UNKNOWN_KID_TOKEN).await.unwrap_err();
        assert!(matches!(err, IdentityError::KeyFetch(_)));
    }

    /// Serves an empty key set on a local port, counting requests
    async fn counting_certs_endpoint() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/certs",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({ "keys": [] }))
                }),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}/certs", addr), hits)
    }

    #[tokio::test]
    async fn unknown_kids_do_not_refetch_a_fresh_key_set() {
        let (certs_url, hits) = counting_certs_endpoint().await;
        let verifier = GoogleIdentityVerifier::with_certs_url("client-id", certs_url);

        for _ in 0..25 {
            let err = verifier.verify(UNKNOWN_KID_TOKEN).await.unwrap_err();
            assert!(matches!(err, IdentityError::InvalidToken(_)));
        }

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let (certs_url, hits) = counting_certs_endpoint().await;
        let verifier = GoogleIdentityVerifier::with_certs_url("client-id", certs_url);

        let attempts = (0..25).map(|_| verifier.verify(UNKNOWN_KID_TOKEN));
        for result in futures::future::join_all(attempts).await {
            assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
        }

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
