use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Bearer token claims. The subject is the username; the identity behind it
/// is re-resolved against the store on every authenticated request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    pub iat: i64,
    pub sub: String,
}

/// Issue a signed HS256 token for the given username
pub fn issue(secret: &str, username: &str, ttl_seconds: u64) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        exp: (now + chrono::Duration::seconds(ttl_seconds as i64)).timestamp(),
        iat: now.timestamp(),
        sub: username.to_string(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Decode and verify a token, returning its subject username.
///
/// Fails on a malformed token, a bad signature, or an expired `exp` claim.
pub fn decode_subject(secret: &str, token: &str) -> Result<String, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims.sub)
}
