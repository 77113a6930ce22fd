/// Script-accessible persistent storage, the counterpart of a browser's
/// local storage. Only the access token is ever written here.
#[async_trait::async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Idempotent: removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("corrupt store: {0}")]
    Corrupt(String),
}
