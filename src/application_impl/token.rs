use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Reads the `exp` claim from the payload segment of a dot-delimited token.
/// The signature is not checked; the backend does that.
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
    Utc.timestamp_opt(secs, 0).single()
}

pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Some(exp) => exp <= now,
        None => true,
    }
}

/// Malformed tokens count as expired so the caller goes down the refresh path.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}
