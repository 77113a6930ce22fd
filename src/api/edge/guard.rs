use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::{AccessToken, REFRESH_TOKEN_COOKIE};
use crate::infra_local::MemoryLocalStore;
use crate::logger::*;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::cookie::Jar;
use std::sync::Arc;
use std::time::Duration;

/// Decides `/dashboard` access from the request cookies alone. Expiry is not
/// checked here; a present access token is enough. With only a refresh token
/// it runs the same CSRF + refresh sequence the client pipeline does, on a
/// throwaway session so nothing leaks between visitors.
pub struct RefreshingRouteGuard {
    base_url: String,
    timeout: Option<Duration>,
}

impl RefreshingRouteGuard {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        RefreshingRouteGuard {
            base_url: base_url.into(),
            timeout,
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, ApiError> {
        let cookie_url = cookie_url_for(&self.base_url)?;
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(
            &format!("{}={}; Path=/", REFRESH_TOKEN_COOKIE, refresh_token),
            &cookie_url,
        );

        let mut builder = Client::builder().cookie_provider(jar.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let session = SessionContext::new(jar, cookie_url, Arc::new(MemoryLocalStore::new()));
        let pipeline = RequestPipeline::new(http, self.base_url.as_str(), session);
        let prepared = pipeline.prepare_headers(AuthMode::Bearer).await?;
        if let Some(e) = prepared.refresh_error {
            return Err(e);
        }
        pipeline
            .session()
            .access_token()
            .await?
            .ok_or_else(|| ApiError::Refresh("no access token after refresh".to_string()))
    }
}

#[async_trait]
impl RouteGuard for RefreshingRouteGuard {
    async fn check(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> GuardOutcome {
        let access_token = access_token.filter(|t| !t.is_empty());
        let refresh_token = refresh_token.filter(|t| !t.is_empty());

        match (access_token, refresh_token) {
            (Some(_), _) => GuardOutcome::Proceed,
            (None, None) => {
                debug!("no session cookies, redirecting to login");
                GuardOutcome::RedirectToLogin
            }
            (None, Some(refresh_token)) => match self.refresh(refresh_token).await {
                Ok(token) => {
                    info!("access token refreshed at the edge");
                    GuardOutcome::ProceedWithToken(token)
                }
                Err(e) => {
                    warn!(error = %e, "edge refresh failed, redirecting to login");
                    GuardOutcome::RedirectToLogin
                }
            },
        }
    }
}
