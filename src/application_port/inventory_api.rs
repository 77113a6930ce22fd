use super::ApiError;
use crate::domain_model::*;
use serde_json::Value;

/// Queries are cached under their tags; mutations invalidate theirs on success.
/// Mutation responses are passed through untyped since the backend does not
/// commit to a shape for them.
#[async_trait::async_trait]
pub trait InventoryApi: Send + Sync {
    async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, ApiError>;
    async fn get_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn get_recipes(&self) -> Result<Vec<Recipe>, ApiError>;
    async fn get_notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn create_product(&self, product: NewProduct) -> Result<Value, ApiError>;
    async fn restock_product(&self, restock: Restock) -> Result<Value, ApiError>;
    async fn manual_adjustment(&self, adjustment: ManualAdjustment) -> Result<Value, ApiError>;
    async fn create_sale(&self, sale: Sale) -> Result<Value, ApiError>;
    async fn bulk_products(&self, products: Vec<NewProduct>) -> Result<Value, ApiError>;
    async fn bulk_restock(&self, restocks: Vec<Restock>) -> Result<Value, ApiError>;
    async fn bulk_adjustments(&self, adjustments: Vec<ManualAdjustment>)
    -> Result<Value, ApiError>;
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Value, ApiError>;
    async fn record_recipe_consumption(
        &self,
        consumption: RecipeConsumption,
    ) -> Result<Value, ApiError>;
    async fn delete_product(&self, id: &ProductId) -> Result<Value, ApiError>;
}
