use super::Verb;
use crate::application_port::ApiError;
use crate::domain_model::{CacheTag, QueryKey};
use reqwest::Url;

/// A cached read and the tags it provides.
#[derive(Debug)]
pub struct QueryEndpoint {
    pub name: &'static str,
    pub path: &'static str,
    pub provides: &'static [CacheTag],
}

impl QueryEndpoint {
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.name)
    }
}

/// A state-changing call and the tags it invalidates once it succeeds.
#[derive(Debug)]
pub struct MutationEndpoint {
    pub name: &'static str,
    pub verb: Verb,
    pub path: &'static str,
    pub invalidates: &'static [CacheTag],
}

impl MutationEndpoint {
    /// Fills the single `{id}` placeholder, if the route has one. The id is
    /// percent-encoded as exactly one path segment.
    pub fn path_with(&self, id: &str) -> Result<String, ApiError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ApiError::InvalidInput(format!("invalid id {:?}", id)));
        }
        let mut url = Url::parse("http://localhost/")
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidInput("url cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(id);
        let segment = url.path().trim_start_matches('/');
        Ok(self.path.replace("{id}", segment))
    }
}

use CacheTag::*;

// Stock changes also raise low-stock notifications server-side, so every
// Products mutation invalidates Notifications too.
const STOCK: &[CacheTag] = &[Products, Notifications];

pub static GET_DASHBOARD_METRICS: QueryEndpoint = QueryEndpoint {
    name: "getDashboardMetrics",
    path: "/inventory/dashboard-metrics",
    provides: &[Products, Notifications],
};

pub static GET_PRODUCTS: QueryEndpoint = QueryEndpoint {
    name: "getProducts",
    path: "/inventory/products",
    provides: &[Products],
};

pub static GET_RECIPES: QueryEndpoint = QueryEndpoint {
    name: "getRecipes",
    path: "/inventory/recipes",
    provides: &[Recipes],
};

pub static GET_NOTIFICATIONS: QueryEndpoint = QueryEndpoint {
    name: "getNotifications",
    path: "/inventory/notifications",
    provides: &[Notifications],
};

pub static CREATE_PRODUCT: MutationEndpoint = MutationEndpoint {
    name: "createProduct",
    verb: Verb::Post,
    path: "/inventory/products",
    invalidates: STOCK,
};

pub static RESTOCK_PRODUCT: MutationEndpoint = MutationEndpoint {
    name: "restockProduct",
    verb: Verb::Post,
    path: "/inventory/restock",
    invalidates: STOCK,
};

pub static MANUAL_ADJUSTMENT: MutationEndpoint = MutationEndpoint {
    name: "manualAdjustment",
    verb: Verb::Post,
    path: "/inventory/manual-adjustment",
    invalidates: STOCK,
};

pub static CREATE_SALE: MutationEndpoint = MutationEndpoint {
    name: "createSale",
    verb: Verb::Post,
    path: "/inventory/sales",
    invalidates: STOCK,
};

pub static BULK_PRODUCTS: MutationEndpoint = MutationEndpoint {
    name: "bulkProducts",
    verb: Verb::Post,
    path: "/inventory/bulk-products",
    invalidates: STOCK,
};

pub static BULK_RESTOCK: MutationEndpoint = MutationEndpoint {
    name: "bulkRestock",
    verb: Verb::Post,
    path: "/inventory/bulk-restock",
    invalidates: STOCK,
};

pub static BULK_ADJUSTMENTS: MutationEndpoint = MutationEndpoint {
    name: "bulkAdjustments",
    verb: Verb::Post,
    path: "/inventory/bulk-adjustments",
    invalidates: STOCK,
};

pub static CREATE_RECIPE: MutationEndpoint = MutationEndpoint {
    name: "createRecipe",
    verb: Verb::Post,
    path: "/inventory/recipes",
    invalidates: &[Recipes],
};

pub static RECORD_RECIPE_CONSUMPTION: MutationEndpoint = MutationEndpoint {
    name: "recordRecipeConsumption",
    verb: Verb::Post,
    path: "/inventory/recipe-consumption",
    invalidates: &[Products, Recipes, Notifications],
};

pub static DELETE_PRODUCT: MutationEndpoint = MutationEndpoint {
    name: "deleteProduct",
    verb: Verb::Delete,
    path: "/inventory/products/{id}",
    invalidates: STOCK,
};

pub static QUERIES: [&QueryEndpoint; 4] = [
    &GET_DASHBOARD_METRICS,
    &GET_PRODUCTS,
    &GET_RECIPES,
    &GET_NOTIFICATIONS,
];

pub static MUTATIONS: [&MutationEndpoint; 10] = [
    &CREATE_PRODUCT,
    &RESTOCK_PRODUCT,
    &MANUAL_ADJUSTMENT,
    &CREATE_SALE,
    &BULK_PRODUCTS,
    &BULK_RESTOCK,
    &BULK_ADJUSTMENTS,
    &CREATE_RECIPE,
    &RECORD_RECIPE_CONSUMPTION,
    &DELETE_PRODUCT,
];
