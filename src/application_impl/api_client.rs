use super::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";

/// Backend client: every call goes through the request pipeline, queries are
/// served from the tag cache while fresh, mutations invalidate on success.
pub struct ApiClient {
    pipeline: RequestPipeline,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(pipeline: RequestPipeline) -> Self {
        ApiClient {
            pipeline,
            cache: QueryCache::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        self.pipeline.session()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        endpoint: &QueryEndpoint,
    ) -> Result<T, ApiError> {
        let key = endpoint.key();
        let value = match self.cache.get_fresh(&key) {
            Some(value) => {
                trace!(%key, "cache hit");
                value
            }
            None => {
                debug!(%key, "cache miss, fetching");
                let started = self.cache.begin_fetch(&key, endpoint.provides);
                let value = self
                    .pipeline
                    .execute(Verb::Get, endpoint.path, None, AuthMode::Bearer)
                    .await?;
                if !self.cache.complete_fetch(&key, value.clone(), started) {
                    debug!(%key, "invalidated while in flight, kept stale");
                }
                value
            }
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", key, e)))
    }

    pub async fn mutate<B: Serialize + Sync>(
        &self,
        endpoint: &MutationEndpoint,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let result = self
            .pipeline
            .execute(endpoint.verb, path, body.as_ref(), AuthMode::Bearer)
            .await?;
        let stale = self.cache.invalidate(endpoint.invalidates);
        debug!(
            mutation = endpoint.name,
            tags = ?endpoint.invalidates,
            stale,
            "invalidated cached queries"
        );
        Ok(result)
    }

    /// Live view of one query, refetched whenever a mutation invalidates it.
    pub fn subscribe<T: DeserializeOwned>(
        self: &Arc<Self>,
        endpoint: &'static QueryEndpoint,
    ) -> Subscription<T> {
        let updates = self.cache.subscribe(&endpoint.key());
        Subscription {
            client: self.clone(),
            endpoint,
            updates,
            _marker: PhantomData,
        }
    }
}

pub struct Subscription<T> {
    client: Arc<ApiClient>,
    endpoint: &'static QueryEndpoint,
    updates: watch::Receiver<u64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    /// Current data: cached if fresh, fetched otherwise.
    pub async fn current(&mut self) -> Result<T, ApiError> {
        self.updates.borrow_and_update();
        self.client.query(self.endpoint).await
    }

    /// Waits for the next invalidation, then refetches.
    pub async fn next(&mut self) -> Result<T, ApiError> {
        self.updates
            .changed()
            .await
            .map_err(|_| ApiError::InvalidInput("query cache dropped".to_string()))?;
        self.current().await
    }

    pub fn has_update(&self) -> bool {
        self.updates.has_changed().unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, input: LoginInput) -> Result<LoginResult, ApiError> {
        let body = serde_json::to_value(&input).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let value = self
            .pipeline
            .execute(Verb::Post, LOGIN_PATH, Some(&body), AuthMode::CsrfOnly)
            .await
            .map_err(|e| match e {
                ApiError::Http { status: 401, .. } => ApiError::Http {
                    status: 401,
                    message: "Invalid username or password".to_string(),
                },
                ApiError::Http { status: 500, .. } => ApiError::Http {
                    status: 500,
                    message: "Server error. Please try again later.".to_string(),
                },
                other => other,
            })?;
        let result: LoginResult =
            serde_json::from_value(value).map_err(|_| ApiError::Decode("No access token received".to_string()))?;

        self.session().store_access_token(&result.access_token).await?;
        // a new identity must not see the previous one's data
        self.cache.clear();
        info!(username = %result.user.username, "logged in");
        Ok(result)
    }

    async fn signup(&self, input: SignupInput) -> Result<(), ApiError> {
        let body = serde_json::to_value(&input).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.pipeline
            .execute(Verb::Post, SIGNUP_PATH, Some(&body), AuthMode::CsrfOnly)
            .await?;
        info!(username = %input.username, "signed up");
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await?;
        self.cache.clear();
        info!("logged out");
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryApi for ApiClient {
    async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        self.query(&GET_DASHBOARD_METRICS).await
    }

    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.query(&GET_PRODUCTS).await
    }

    async fn get_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.query(&GET_RECIPES).await
    }

    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.query(&GET_NOTIFICATIONS).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Value, ApiError> {
        self.mutate(&CREATE_PRODUCT, CREATE_PRODUCT.path, Some(&product))
            .await
    }

    async fn restock_product(&self, restock: Restock) -> Result<Value, ApiError> {
        self.mutate(&RESTOCK_PRODUCT, RESTOCK_PRODUCT.path, Some(&restock))
            .await
    }

    async fn manual_adjustment(&self, adjustment: ManualAdjustment) -> Result<Value, ApiError> {
        if adjustment.quantity_debited.is_none() && adjustment.quantity_credited.is_none() {
            return Err(ApiError::InvalidInput(
                "adjustment needs a debited or credited quantity".to_string(),
            ));
        }
        self.mutate(&MANUAL_ADJUSTMENT, MANUAL_ADJUSTMENT.path, Some(&adjustment))
            .await
    }

    async fn create_sale(&self, sale: Sale) -> Result<Value, ApiError> {
        self.mutate(&CREATE_SALE, CREATE_SALE.path, Some(&sale)).await
    }

    async fn bulk_products(&self, products: Vec<NewProduct>) -> Result<Value, ApiError> {
        let body = json!({ "products": products });
        self.mutate(&BULK_PRODUCTS, BULK_PRODUCTS.path, Some(&body))
            .await
    }

    async fn bulk_restock(&self, restocks: Vec<Restock>) -> Result<Value, ApiError> {
        let body = json!({ "restocks": restocks });
        self.mutate(&BULK_RESTOCK, BULK_RESTOCK.path, Some(&body))
            .await
    }

    async fn bulk_adjustments(
        &self,
        adjustments: Vec<ManualAdjustment>,
    ) -> Result<Value, ApiError> {
        let body = json!({ "adjustments": adjustments });
        self.mutate(&BULK_ADJUSTMENTS, BULK_ADJUSTMENTS.path, Some(&body))
            .await
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Value, ApiError> {
        if recipe.ingredients.is_empty() {
            return Err(ApiError::InvalidInput(
                "a recipe needs at least one ingredient".to_string(),
            ));
        }
        self.mutate(&CREATE_RECIPE, CREATE_RECIPE.path, Some(&recipe))
            .await
    }

    async fn record_recipe_consumption(
        &self,
        consumption: RecipeConsumption,
    ) -> Result<Value, ApiError> {
        self.mutate(
            &RECORD_RECIPE_CONSUMPTION,
            RECORD_RECIPE_CONSUMPTION.path,
            Some(&consumption),
        )
        .await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<Value, ApiError> {
        let path = DELETE_PRODUCT.path_with(&id.0)?;
        self.mutate::<Value>(&DELETE_PRODUCT, &path, None).await
    }
}
