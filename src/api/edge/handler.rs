use crate::domain_model::{ACCESS_TOKEN_COOKIE, AccessToken};
use crate::logger::*;
use std::sync::Arc;
use warp::Reply;
use warp::fs::File;
use warp::http::HeaderValue;
use warp::http::header::SET_COOKIE;
use warp::reply::Response;

pub const ACCESS_COOKIE_MAX_AGE_SECS: u64 = 15 * 60;

/// Attributes of the access-token cookie the edge sets after a refresh.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn access_cookie(&self, token: &AccessToken) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
            ACCESS_TOKEN_COOKIE,
            token.as_str(),
            ACCESS_COOKIE_MAX_AGE_SECS
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

pub fn serve_protected(
    refreshed: Option<AccessToken>,
    policy: Arc<CookiePolicy>,
    file: File,
) -> Response {
    let mut response = file.into_response();
    if let Some(token) = refreshed {
        match HeaderValue::from_str(&policy.access_cookie(&token)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "refreshed token is not a valid cookie value"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_cookie_attributes() {
        let token = AccessToken("abc".into());
        let plain = CookiePolicy { secure: false }.access_cookie(&token);
        assert_eq!(
            plain,
            "accessToken=abc; Max-Age=900; Path=/; HttpOnly; SameSite=Strict"
        );
        let secure = CookiePolicy { secure: true }.access_cookie(&token);
        assert!(secure.ends_with("; Secure"));
    }
}
