use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::domain_port::LocalStore;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;

/// Explicit session state handed to the request layer: the cookie jar the
/// HTTP client sends with every call, plus the local persistent store.
///
/// The refresh token is only ever read from the jar; nothing here writes it.
#[derive(Clone)]
pub struct SessionContext {
    jar: Arc<Jar>,
    cookie_url: Url,
    local: Arc<dyn LocalStore>,
}

impl SessionContext {
    pub fn new(jar: Arc<Jar>, cookie_url: Url, local: Arc<dyn LocalStore>) -> Self {
        SessionContext {
            jar,
            cookie_url,
            local,
        }
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    pub fn cookie_url(&self) -> &Url {
        &self.cookie_url
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.cookie_url)?;
        let header = header.to_str().ok()?;
        parse_cookie_header(header)
            .into_iter()
            .find(|(n, v)| *n == name && !v.is_empty())
            .map(|(_, v)| v.to_string())
    }

    /// Cookie first, local store as fallback.
    pub async fn access_token(&self) -> Result<Option<AccessToken>, ApiError> {
        if let Some(token) = self.cookie(ACCESS_TOKEN_COOKIE) {
            return Ok(Some(AccessToken(token)));
        }
        let stored = self.local.get(ACCESS_TOKEN_KEY).await?;
        Ok(stored.filter(|t| !t.is_empty()).map(AccessToken))
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.cookie(REFRESH_TOKEN_COOKIE).map(RefreshToken)
    }

    /// Replaces the in-memory copy (the jar) and persists locally, so a stale
    /// cookie can't shadow the new token on the next lookup.
    pub async fn store_access_token(&self, token: &AccessToken) -> Result<(), ApiError> {
        self.jar.add_cookie_str(
            &format!("{}={}; Path=/", ACCESS_TOKEN_COOKIE, token.as_str()),
            &self.cookie_url,
        );
        self.local.set(ACCESS_TOKEN_KEY, token.as_str()).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ApiError> {
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            self.jar.add_cookie_str(
                &format!(
                    "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
                    name
                ),
                &self.cookie_url,
            );
        }
        self.local.remove(ACCESS_TOKEN_KEY).await?;
        Ok(())
    }
}

/// The URL cookies are matched against: the API base with a trailing slash.
pub fn cookie_url_for(base_url: &str) -> Result<Url, ApiError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&base).map_err(|e| ApiError::InvalidInput(format!("api base url {:?}: {}", base_url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_local::MemoryLocalStore;

    fn session() -> (SessionContext, Arc<MemoryLocalStore>) {
        let local = Arc::new(MemoryLocalStore::new());
        let url: Url = "http://localhost:5000/api/".parse().unwrap();
        let ctx = SessionContext::new(Arc::new(Jar::default()), url, local.clone());
        (ctx, local)
    }

    #[test]
    fn cookie_url_keeps_the_api_prefix() {
        let url = cookie_url_for("http://localhost:5000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/");
        assert!(cookie_url_for("not a url").is_err());
    }

    #[tokio::test]
    async fn cookie_wins_over_local_store() {
        let (ctx, local) = session();
        local.set(ACCESS_TOKEN_KEY, "from-local").await.unwrap();
        assert_eq!(ctx.access_token().await.unwrap().unwrap().as_str(), "from-local");

        ctx.jar()
            .add_cookie_str("accessToken=from-cookie; Path=/", ctx.cookie_url());
        assert_eq!(ctx.access_token().await.unwrap().unwrap().as_str(), "from-cookie");
    }

    #[tokio::test]
    async fn store_updates_jar_and_local_but_never_refresh() {
        let (ctx, local) = session();
        ctx.jar()
            .add_cookie_str("refreshToken=opaque; Path=/", ctx.cookie_url());
        ctx.store_access_token(&AccessToken("fresh".into())).await.unwrap();

        assert_eq!(ctx.cookie(ACCESS_TOKEN_COOKIE).as_deref(), Some("fresh"));
        assert_eq!(local.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(), Some("fresh"));
        assert_eq!(local.get(REFRESH_TOKEN_COOKIE).await.unwrap(), None);
        assert_eq!(ctx.refresh_token().unwrap().as_str(), "opaque");
    }

    #[tokio::test]
    async fn clear_drops_both_credentials() {
        let (ctx, _local) = session();
        ctx.jar()
            .add_cookie_str("refreshToken=opaque; Path=/", ctx.cookie_url());
        ctx.store_access_token(&AccessToken("fresh".into())).await.unwrap();

        ctx.clear().await.unwrap();
        assert!(ctx.access_token().await.unwrap().is_none());
        assert!(ctx.refresh_token().is_none());
    }
}
