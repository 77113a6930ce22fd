use super::ApiError;
use crate::domain_model::{AccessToken, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: AccessToken,
    pub user: User,
}

#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Creates the session. The backend sets both cookies; the access token
    /// is additionally persisted to the local store.
    async fn login(&self, input: LoginInput) -> Result<LoginResult, ApiError>;
    async fn signup(&self, input: SignupInput) -> Result<(), ApiError>;
    /// Destroys the session: local store, cookies and cached queries.
    async fn logout(&self) -> Result<(), ApiError>;
}
