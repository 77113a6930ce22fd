use super::error::EdgeRejection;
use super::handler::{self, CookiePolicy};
use crate::application_port::*;
use crate::domain_model::{ACCESS_TOKEN_COOKIE, AccessToken, REFRESH_TOKEN_COOKIE};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::path::FullPath;
use warp::{Filter, Rejection, reject};

pub fn routes(
    guard: Arc<dyn RouteGuard>,
    static_dir: PathBuf,
    secure_cookies: bool,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let policy = Arc::new(CookiePolicy {
        secure: secure_cookies,
    });

    let dashboard = warp::get()
        .and(warp::path("dashboard"))
        .and(with_session(guard))
        .and(with(policy))
        .and(warp::fs::dir(static_dir.join("dashboard")))
        .map(handler::serve_protected);

    let public = warp::get()
        .and(unprotected())
        .and(warp::fs::dir(static_dir));

    dashboard.or(public)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Yields the token to set as a cookie when the guard had to refresh.
fn with_session(
    guard: Arc<dyn RouteGuard>,
) -> impl Filter<Extract = (Option<AccessToken>,), Error = Rejection> + Clone {
    warp::cookie::optional(ACCESS_TOKEN_COOKIE)
        .and(warp::cookie::optional(REFRESH_TOKEN_COOKIE))
        .and_then(move |access: Option<String>, refresh: Option<String>| {
            let guard = guard.clone();
            async move {
                let outcome: Result<Option<AccessToken>, Rejection> =
                    match guard.check(access.as_deref(), refresh.as_deref()).await {
                        GuardOutcome::Proceed => Ok(None),
                        GuardOutcome::ProceedWithToken(token) => Ok(Some(token)),
                        GuardOutcome::RedirectToLogin => {
                            Err(reject::custom(EdgeRejection::LoginRequired))
                        }
                    };
                outcome
            }
        })
}

/// Rejects protected paths so the static fallback never serves them.
fn unprotected() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and_then(|path: FullPath| async move {
            if is_protected_path(path.as_str()) {
                Err(reject::not_found())
            } else {
                Ok(())
            }
        })
        .untuple_one()
}
