use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AuthError, policy::Role};

/// Name of the cookie carrying the signed credential.
pub const CREDENTIAL_COOKIE: &str = "token";

/// Claims
///
/// The JWT payload the panel signs at login. Only `role` drives access; the other
/// claims are carried for logging and expiry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Claims {
    /// Raw role claim: 'user', 'admin' or 'superadmin'. Missing decodes as empty.
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration Time (exp), seconds since the epoch. Enforced when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Session
///
/// The resolved identity of a request that passed the gate with a verified credential.
/// Inserted into request extensions for the page handlers.
#[derive(Debug, Clone)]
pub struct Session {
    pub role: Role,
    pub subject: Option<String>,
}

impl From<&Claims> for Session {
    fn from(claims: &Claims) -> Self {
        Self {
            role: Role::from_claim(&claims.role),
            subject: claims.sub.clone(),
        }
    }
}

/// TokenVerifier
///
/// Checks HS256 signatures against the process-wide secret. The secret is handed in by
/// the caller at construction; nothing here reads ambient configuration.
///
/// Expiry is checked by `verify` against the supplied `now` rather than inside
/// `jsonwebtoken`, so a decision is a pure function of its inputs.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// verify
    ///
    /// Decodes `raw`, checks its signature, then rejects it if `exp <= now`.
    pub fn verify(&self, raw: &str, now: i64) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(raw, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        match claims.exp {
            Some(exp) if exp <= now => Err(AuthError::Expired),
            _ => Ok(claims),
        }
    }

    /// Signs `claims` with the same secret `verify` checks against.
    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(AuthError::from)
    }
}

/// credential_from_headers
///
/// Pulls the first `token=` pair out of the request's `Cookie` headers. An empty value
/// still counts as a presented credential.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CREDENTIAL_COOKIE).then(|| value.to_string())
        })
}

/// Set-Cookie value that expires the credential cookie on the client.
pub fn expired_credential_cookie() -> HeaderValue {
    HeaderValue::from_static("token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
