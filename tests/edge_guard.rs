use async_trait::async_trait;
use larder::api::edge::*;
use larder::application_port::*;
use larder::domain_model::AccessToken;
use mockito::Server;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use warp::Filter;
use warp::http::StatusCode;

type SeenCookies = (Option<String>, Option<String>);

/// Answers with a fixed outcome and records what it was asked.
struct FixedGuard {
    outcome: GuardOutcome,
    seen: Mutex<Vec<SeenCookies>>,
}

impl FixedGuard {
    fn new(outcome: GuardOutcome) -> Arc<Self> {
        Arc::new(FixedGuard {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<SeenCookies> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteGuard for FixedGuard {
    async fn check(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> GuardOutcome {
        self.seen.lock().unwrap().push((
            access_token.map(str::to_owned),
            refresh_token.map(str::to_owned),
        ));
        self.outcome.clone()
    }
}

fn static_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let write = |path: &str, body: &str| {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, body).unwrap();
    };
    write("index.html", "home");
    write("login/index.html", "login form");
    write("dashboard/index.html", "dashboard");
    write("dashboard/app.js", "console.log('inventory')");
    dir
}

fn edge(
    guard: Arc<dyn RouteGuard>,
    root: &Path,
) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone + 'static
{
    routes(guard, root.to_path_buf(), true).recover(recover_error)
}

#[tokio::test]
async fn no_session_redirects_to_login() {
    let site = static_site();
    let guard = FixedGuard::new(GuardOutcome::RedirectToLogin);
    let res = warp::test::request()
        .path("/dashboard")
        .reply(&edge(guard.clone(), site.path()))
        .await;

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/login");
    assert_eq!(guard.calls(), vec![(None, None)]);
}

#[tokio::test]
async fn nested_dashboard_paths_are_guarded() {
    let site = static_site();
    let guard = FixedGuard::new(GuardOutcome::RedirectToLogin);
    let res = warp::test::request()
        .path("/dashboard/app.js")
        .reply(&edge(guard, site.path()))
        .await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn guard_sees_both_cookies() {
    let site = static_site();
    let guard = FixedGuard::new(GuardOutcome::Proceed);
    let res = warp::test::request()
        .path("/dashboard/")
        .header("cookie", "accessToken=a1; refreshToken=r1")
        .reply(&edge(guard.clone(), site.path()))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body().as_ref(), b"dashboard");
    assert!(res.headers().get("set-cookie").is_none());
    assert_eq!(
        guard.calls(),
        vec![(Some("a1".to_string()), Some("r1".to_string()))]
    );
}

#[tokio::test]
async fn refreshed_token_is_set_as_cookie() {
    let site = static_site();
    let guard = FixedGuard::new(GuardOutcome::ProceedWithToken(AccessToken(
        "minted".to_string(),
    )));
    let res = warp::test::request()
        .path("/dashboard/app.js")
        .header("cookie", "refreshToken=r1")
        .reply(&edge(guard, site.path()))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("accessToken=minted;"));
    assert!(cookie.contains("Max-Age=900"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn public_pages_skip_the_guard() {
    let site = static_site();
    let guard = FixedGuard::new(GuardOutcome::RedirectToLogin);
    let filter = edge(guard.clone(), site.path());

    let res = warp::test::request().path("/login/").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body().as_ref(), b"login form");

    let res = warp::test::request().path("/index.html").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(guard.calls().is_empty());
}

#[tokio::test]
async fn unknown_files_are_not_found() {
    let site = static_site();
    let filter = edge(FixedGuard::new(GuardOutcome::Proceed), site.path());

    let res = warp::test::request().path("/nope.html").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = warp::test::request()
        .path("/dashboard/nope.js")
        .header("cookie", "accessToken=a1")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refreshing_guard_end_to_end() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/auth/csrf-token")
        .with_body(r#"{"csrfToken":"c1"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .match_header("x-csrf-token", "c1")
        .with_body(r#"{"accessToken":"edge-token"}"#)
        .expect(1)
        .create_async()
        .await;

    let site = static_site();
    let guard = Arc::new(RefreshingRouteGuard::new(
        format!("{}/api", server.url()),
        None,
    ));
    let res = warp::test::request()
        .path("/dashboard")
        .header("cookie", "refreshToken=r1")
        .reply(&edge(guard, site.path()))
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("accessToken=edge-token;"));
    refresh.assert_async().await;
}
