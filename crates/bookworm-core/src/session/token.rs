//! Access token inspection
//!
//! The client cannot verify a token; only the server holds the key. It only
//! reads the `exp` claim so a session that has certainly expired is not
//! restored.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

fn unverified() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// `exp` of a JWT, or `None` for opaque tokens and tokens without one
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &unverified()).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

/// Only a JWT whose `exp` lies before `now` counts as expired.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= now)
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}
