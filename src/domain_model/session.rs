use serde::{Deserialize, Serialize};
use std::fmt;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Key under which the access token is persisted in the local store.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Short-lived bearer credential. The middle segment of the token carries
/// an `exp` claim in seconds since the epoch.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

/// Opaque credential used only to mint new access tokens. Lives in the cookie
/// jar and nowhere else.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CsrfToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in log fields; only show a prefix.
fn redacted(f: &mut fmt::Formatter<'_>, name: &str, raw: &str) -> fmt::Result {
    let prefix: String = raw.chars().take(6).collect();
    write!(f, "{}({}…)", name, prefix)
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redacted(f, "AccessToken", &self.0)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redacted(f, "RefreshToken", &self.0)
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redacted(f, "CsrfToken", &self.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    pub csrf_token: Option<CsrfToken>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a RefreshToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: Option<AccessToken>,
}

/// Splits a `Cookie` header value (`a=1; b=2`) into name/value pairs.
/// Values are returned verbatim; entries without `=` are dropped.
pub fn parse_cookie_header(header: &str) -> Vec<(&str, &str)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                None
            } else {
                Some((name, value.trim()))
            }
        })
        .collect()
}
