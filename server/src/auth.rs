//! Bearer tokens and the login credential check.
//!
//! # Design
//! Tokens are HS256 JWTs signed with a single shared secret. The server keeps
//! no session table: a token carrying a valid signature (and, when a TTL is
//! configured, an unexpired `exp`) is accepted as-is. The only real gate is
//! the operator credential check in `/api/login`.

use std::fmt;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Payload embedded in every issued token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Per-login session id.
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    /// Claims for a fresh login session.
    pub fn for_session(username: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            iat: None,
            exp: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token found")]
    Missing,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Without a TTL, `exp` is optional but still enforced when present.
        if ttl.is_none() {
            validation.required_spec_claims.clear();
        }

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Sign `claims`, stamping `iat` and, when a TTL is configured, `exp`.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let now = jsonwebtoken::get_current_timestamp();
        let stamped = Claims {
            iat: Some(now),
            exp: self.ttl.map(|ttl| now + ttl.as_secs()),
            ..claims.clone()
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &stamped, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// The single operator account accepted by `/api/login`.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user & pass)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Split an `Authorization` header value into its scheme and parameter.
fn authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (given, rest) = value.split_once(' ')?;
    given.eq_ignore_ascii_case(scheme).then(|| rest.trim())
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = authorization(headers, "Basic")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    authorization(headers, "Bearer").filter(|token| !token.is_empty())
}

/// Reject the request unless it carries a valid bearer token. On success the
/// verified [`Claims`] are available to handlers as an `Extension`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = bearer_token(req.headers()).ok_or(TokenError::Missing)?;
        state.tokens.verify(token).inspect_err(|err| {
            tracing::info!(error = %err, path = %req.uri().path(), "rejected bearer token");
        })?
    };

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn issued_token_verifies_to_same_claims() {
        let service = TokenService::new(b"secret", None);
        let claims = Claims::for_session("operator");

        let token = service.issue(&claims).unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified.id, claims.id);
        assert_eq!(verified.username, "operator");
        assert!(verified.iat.is_some());
        assert!(verified.exp.is_none());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(Claims::for_session("a").id, Claims::for_session("a").id);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new(b"secret-a", None);
        let verifier = TokenService::new(b"secret-b", None);
        let token = issuer.issue(&Claims::for_session("operator")).unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let service = TokenService::new(b"secret", None);
        assert!(matches!(
            service.verify("not.a.jwt"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn empty_token_is_missing() {
        let service = TokenService::new(b"secret", None);
        assert_eq!(service.verify(""), Err(TokenError::Missing));
    }

    #[test]
    fn ttl_stamps_expiry() {
        let service = TokenService::new(b"secret", Some(Duration::from_secs(300)));
        let token = service.issue(&Claims::for_session("operator")).unwrap();
        let claims = service.verify(&token).unwrap();

        let iat = claims.iat.unwrap();
        assert_eq!(claims.exp, Some(iat + 300));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new(b"secret", Some(Duration::from_secs(60)));
        let now = jsonwebtoken::get_current_timestamp();
        let stale = Claims {
            iat: Some(now - 120),
            exp: Some(now - 60),
            ..Claims::for_session("operator")
        };
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &stale, &service.encoding)
                .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn past_exp_is_rejected_even_without_ttl() {
        let service = TokenService::new(b"secret", None);
        let now = jsonwebtoken::get_current_timestamp();
        let stale = Claims {
            iat: Some(now - 100),
            exp: Some(now - 50),
            ..Claims::for_session("operator")
        };
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &stale, &service.encoding)
                .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn ttl_requires_exp_claim() {
        let without_ttl = TokenService::new(b"secret", None);
        let with_ttl = TokenService::new(b"secret", Some(Duration::from_secs(60)));
        let token = without_ttl.issue(&Claims::for_session("operator")).unwrap();

        assert!(matches!(
            with_ttl.verify(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn credentials_match_only_exact_pair() {
        let creds = Credentials::new("operator", "hunter2");
        assert!(creds.matches("operator", "hunter2"));
        assert!(!creds.matches("operator", "hunter3"));
        assert!(!creds.matches("Operator", "hunter2"));
        assert!(!creds.matches("", ""));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("operator", "hunter2"));
        assert!(rendered.contains("operator"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn parses_basic_auth() {
        let encoded = STANDARD.encode("operator:pass:with:colons");
        let parsed = parse_basic_auth(&headers(&format!("Basic {encoded}")));
        assert_eq!(
            parsed,
            Some(("operator".to_string(), "pass:with:colons".to_string()))
        );
    }

    #[test]
    fn basic_auth_rejects_bad_input() {
        assert_eq!(parse_basic_auth(&HeaderMap::new()), None);
        assert_eq!(parse_basic_auth(&headers("Basic !!!")), None);
        assert_eq!(parse_basic_auth(&headers("Bearer abc")), None);
        let no_colon = STANDARD.encode("operator");
        assert_eq!(parse_basic_auth(&headers(&format!("Basic {no_colon}"))), None);
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
