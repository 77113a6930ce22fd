use crate::domain_model::AccessToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Proceed and hand the browser a freshly minted access token cookie.
    ProceedWithToken(AccessToken),
    RedirectToLogin,
}

/// Decides whether a request for a protected page may go through, based on
/// the session cookies it carries.
#[async_trait::async_trait]
pub trait RouteGuard: Send + Sync {
    async fn check(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> GuardOutcome;
}

/// `/dashboard` and everything below it.
pub fn is_protected_path(path: &str) -> bool {
    path == "/dashboard" || path.starts_with("/dashboard/")
}
