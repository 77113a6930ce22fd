use super::{SessionContext, is_token_expired};
use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::logger::*;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub const CSRF_PATH: &str = "/auth/csrf-token";
pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.method(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// CSRF header plus bearer token, refreshing first when needed.
    Bearer,
    /// CSRF header only; for the login/signup calls that create the session.
    CsrfOnly,
}

#[derive(Debug)]
pub struct PreparedHeaders {
    pub headers: HeaderMap,
    /// Set when a refresh was attempted and failed. The request still goes out.
    pub refresh_error: Option<ApiError>,
}

impl PreparedHeaders {
    pub fn is_authorized(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }
}

fn csrf_header() -> HeaderName {
    HeaderName::from_static("x-csrf-token")
}

fn header_value(raw: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(raw).map_err(|e| ApiError::InvalidInput(format!("header value: {}", e)))
}

/// Wraps every outbound call: fresh CSRF token, access token lookup, refresh on
/// expiry, bearer attachment. Steps run strictly in sequence per request.
pub struct RequestPipeline {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl RequestPipeline {
    /// `http` must be built with the session's jar as its cookie provider so
    /// that every call carries the cookies.
    pub fn new(http: Client, base_url: impl Into<String>, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RequestPipeline {
            http,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn fetch_csrf_token(&self) -> Result<CsrfToken, ApiError> {
        let response = self
            .http
            .get(self.endpoint_url(CSRF_PATH))
            .send()
            .await
            .map_err(|e| ApiError::Csrf(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Csrf(format!("csrf endpoint answered {}", status)));
        }
        let body: CsrfResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Csrf(e.to_string()))?;
        body.csrf_token
            .filter(|t| !t.as_str().is_empty())
            .ok_or_else(|| ApiError::Csrf("response carried no token".to_string()))
    }

    pub async fn prepare_headers(&self, mode: AuthMode) -> Result<PreparedHeaders, ApiError> {
        let csrf = self.fetch_csrf_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(csrf_header(), header_value(csrf.as_str())?);

        if mode == AuthMode::CsrfOnly {
            return Ok(PreparedHeaders {
                headers,
                refresh_error: None,
            });
        }

        let mut refresh_error = None;
        let token = match self.session.access_token().await? {
            Some(token) if !is_token_expired(token.as_str()) => Some(token),
            stale => {
                debug!(present = stale.is_some(), "access token missing or expired");
                match self.session.refresh_token() {
                    None => {
                        debug!("no refresh token, sending unauthenticated");
                        None
                    }
                    Some(refresh) => match self.refresh_access_token(&refresh, &csrf).await {
                        Ok(token) => {
                            if let Err(e) = self.session.store_access_token(&token).await {
                                warn!(error = %e, "could not persist refreshed access token");
                            }
                            Some(token)
                        }
                        Err(e) => {
                            warn!(error = %e, "access token refresh failed");
                            refresh_error = Some(e);
                            None
                        }
                    },
                }
            }
        };

        if let Some(token) = token {
            headers.insert(AUTHORIZATION, header_value(&token.bearer())?);
        }

        Ok(PreparedHeaders {
            headers,
            refresh_error,
        })
    }

    async fn refresh_access_token(
        &self,
        refresh: &RefreshToken,
        csrf: &CsrfToken,
    ) -> Result<AccessToken, ApiError> {
        debug!("refreshing access token");
        let response = self
            .http
            .post(self.endpoint_url(REFRESH_PATH))
            .header(csrf_header(), header_value(csrf.as_str())?)
            .json(&RefreshRequest {
                refresh_token: refresh,
            })
            .send()
            .await
            .map_err(|e| ApiError::Refresh(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Refresh(format!("refresh endpoint answered {}", status)));
        }
        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Refresh(e.to_string()))?;
        body.access_token
            .filter(|t| !t.as_str().is_empty())
            .ok_or_else(|| ApiError::Refresh("response carried no access token".to_string()))
    }

    pub async fn execute(
        &self,
        verb: Verb,
        path: &str,
        body: Option<&Value>,
        mode: AuthMode,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::new_v4();
        let prepared = self.prepare_headers(mode).await?;
        debug!(
            %request_id,
            method = %verb,
            path,
            authorized = prepared.is_authorized(),
            "sending request"
        );

        let mut request = self
            .http
            .request(verb.method(), self.endpoint_url(path))
            .headers(prepared.headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        trace!(%request_id, %status, "response received");

        if status == StatusCode::UNAUTHORIZED && mode == AuthMode::Bearer {
            return Err(match prepared.refresh_error {
                Some(cause) => {
                    debug!(%request_id, %cause, "rejected after failed refresh");
                    ApiError::SessionExpired
                }
                None => ApiError::Unauthorized,
            });
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(status, &bytes),
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Prefers the backend's `message` (or `error`) field over the status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_body() {
        let msg = error_message(StatusCode::BAD_REQUEST, br#"{"message":"Quantity must be positive"}"#);
        assert_eq!(msg, "Quantity must be positive");
        let msg = error_message(StatusCode::CONFLICT, br#"{"error":"Duplicate product"}"#);
        assert_eq!(msg, "Duplicate product");
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, b"<html>");
        assert_eq!(msg, "Internal Server Error");
    }

    #[test]
    fn verb_renders_as_method() {
        assert_eq!(Verb::Delete.to_string(), "DELETE");
    }
}
