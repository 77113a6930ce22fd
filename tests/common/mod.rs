#![allow(dead_code)]

use jsonwebtoken::{EncodingKey, Header, encode};
use larder::application_impl::*;
use larder::infra_local::MemoryLocalStore;
use mockito::{Mock, ServerGuard};
use reqwest::cookie::Jar;
use serde_json::json;
use std::sync::Arc;

pub const CSRF: &str = "csrf-1";

pub struct Harness {
    pub client: Arc<ApiClient>,
    pub local: Arc<MemoryLocalStore>,
}

impl Harness {
    pub fn new(server: &ServerGuard) -> Self {
        let base = format!("{}/api", server.url());
        let cookie_url = cookie_url_for(&base).unwrap();
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .unwrap();
        let local = Arc::new(MemoryLocalStore::new());
        let session = SessionContext::new(jar, cookie_url, local.clone());
        Harness {
            client: Arc::new(ApiClient::new(RequestPipeline::new(http, base, session))),
            local,
        }
    }

    pub fn with_access_cookie(self, value: &str) -> Self {
        let session = self.client.session();
        session
            .jar()
            .add_cookie_str(&format!("accessToken={}; Path=/", value), session.cookie_url());
        self
    }

    /// Simulates the HttpOnly refresh cookie a previous login left behind.
    pub fn with_refresh_cookie(self, value: &str) -> Self {
        let session = self.client.session();
        session
            .jar()
            .add_cookie_str(&format!("refreshToken={}; Path=/", value), session.cookie_url());
        self
    }
}

pub fn token_expiring_in(secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + secs;
    encode(
        &Header::default(),
        &json!({ "sub": "user-1", "exp": exp }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub async fn mock_csrf(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/auth/csrf-token")
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"csrfToken":"{}"}}"#, CSRF))
        .create_async()
        .await
}

pub fn product_json(id: &str, name: &str, quantity: f64) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "quantity": quantity,
        "unit": "kg",
        "category": "Vegetables",
        "priority": "High",
        "price": 3.5,
        "minStockThreshold": 5
    })
}
