use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err("empty product id".to_string())
        } else {
            Ok(ProductId(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub price: f64,
    pub min_stock_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub priority: String,
    pub price: f64,
    pub min_stock_threshold: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restock {
    pub product_id: ProductId,
    pub quantity_credited: f64,
    pub cost_for_quantity_credited: f64,
}

pub const DEFAULT_ADJUSTMENT_REASON: &str = "Manual adjustment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAdjustment {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_debited: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_credited: Option<f64>,
    pub reason: String,
}

impl ManualAdjustment {
    pub fn new(
        product_id: ProductId,
        quantity_debited: Option<f64>,
        quantity_credited: Option<f64>,
        reason: Option<String>,
    ) -> Self {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADJUSTMENT_REASON.to_string());
        Self {
            product_id,
            quantity_debited,
            quantity_credited,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub product_id: ProductId,
    pub quantity_debited: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub product_id: ProductId,
    pub quantity: f64,
}

/// `productId:quantity`, as typed on the command line.
impl std::str::FromStr for Ingredient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected productId:quantity, got {:?}", s))?;
        let quantity: f64 = quantity
            .trim()
            .parse()
            .map_err(|_| format!("bad ingredient quantity in {:?}", s))?;
        if quantity <= 0.0 {
            return Err(format!("ingredient quantity must be positive in {:?}", s));
        }
        Ok(Ingredient {
            product_id: id.parse()?,
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default = "one")]
    pub servings: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub servings: u32,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeConsumption {
    pub recipe_id: RecipeId,
    pub servings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_stock: f64,
    pub low_stock_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub date: String,
    pub total_value: f64,
    pub change_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockByCategory {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    pub date: String,
    pub total_consumed: f64,
    pub change_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    pub stock_quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub stock_summary: StockSummary,
    #[serde(default)]
    pub sales_summary: Vec<SalesSummary>,
    #[serde(default)]
    pub stock_by_category_summary: Vec<StockByCategory>,
    #[serde(default)]
    pub consumption_summary: Vec<ConsumptionSummary>,
    #[serde(default)]
    pub popular_products: Vec<PopularProduct>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_from_cli_form() {
        let ingredient: Ingredient = "p1:0.25".parse().unwrap();
        assert_eq!(ingredient.product_id, ProductId("p1".into()));
        assert_eq!(ingredient.quantity, 0.25);
        assert!("p1".parse::<Ingredient>().is_err());
        assert!(":2".parse::<Ingredient>().is_err());
        assert!("p1:-1".parse::<Ingredient>().is_err());
    }

    #[test]
    fn product_reads_mongo_style_id() {
        let product: Product = serde_json::from_str(
            r#"{"_id":"p9","name":"Flour","quantity":3,"unit":"kg","category":"Dry",
                "priority":"High","price":2.5,"minStockThreshold":5}"#,
        )
        .unwrap();
        assert_eq!(product.id.0, "p9");
        assert_eq!(product.min_stock_threshold, 5.0);
    }
}
