use super::{Product, StockByCategory};
use serde::Serialize;

/// Band of the battery-style stock gauge shown next to each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    Critical,
    Low,
    Healthy,
}

/// Gauge reading for one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockGauge {
    pub level: StockLevel,
    pub percentage: f64,
    /// Width of the gauge fill; never drawn below 4%.
    pub fill: f64,
}

const MIN_FILL: f64 = 4.0;

impl StockGauge {
    /// `max_capacity` defaults to three times the threshold.
    pub fn classify(current: f64, min_threshold: f64, max_capacity: Option<f64>) -> Self {
        let max_capacity = max_capacity.unwrap_or(min_threshold * 3.0);
        if max_capacity <= 0.0 {
            return Self {
                level: StockLevel::Critical,
                percentage: 0.0,
                fill: MIN_FILL,
            };
        }

        let percentage = (current / max_capacity * 100.0).min(100.0);
        let threshold_percentage = min_threshold / max_capacity * 100.0;
        let level = if percentage <= threshold_percentage {
            StockLevel::Critical
        } else if percentage <= threshold_percentage * 2.0 {
            StockLevel::Low
        } else {
            StockLevel::Healthy
        };

        Self {
            level,
            percentage,
            fill: percentage.max(MIN_FILL),
        }
    }
}

/// Restock urgency plotted on the inventory chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    ImmediateRestock = 0,
    OrderSoon = 1,
    WellStocked = 2,
}

impl StockStatus {
    pub fn of(product: &Product) -> Self {
        if product.quantity <= product.min_stock_threshold {
            StockStatus::ImmediateRestock
        } else if product.quantity <= product.min_stock_threshold * 2.0 {
            StockStatus::OrderSoon
        } else {
            StockStatus::WellStocked
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::ImmediateRestock => "Immediate Restock",
            StockStatus::OrderSoon => "Order Soon",
            StockStatus::WellStocked => "Well-Stocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub name: String,
    pub quantity: f64,
    pub status: StockStatus,
}

pub const CHART_TOP_PRODUCTS: usize = 6;

/// Highest-quantity products first, each tagged with its restock status.
pub fn top_products(products: &[Product], limit: usize) -> Vec<ChartRow> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));
    sorted
        .into_iter()
        .take(limit)
        .map(|p| ChartRow {
            name: p.name.clone(),
            quantity: p.quantity,
            status: StockStatus::of(p),
        })
        .collect()
}

pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.quantity <= p.min_stock_threshold)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
}

/// Sums stock per category, keeping categories in first-seen order.
pub fn category_totals(summary: &[StockByCategory]) -> CategoryBreakdown {
    let mut categories: Vec<CategoryTotal> = Vec::new();
    for item in summary {
        match categories.iter_mut().find(|c| c.name == item.category) {
            Some(total) => total.value += item.amount,
            None => categories.push(CategoryTotal {
                name: item.category.clone(),
                value: item.amount,
            }),
        }
    }
    let total = categories.iter().map(|c| c.value).sum();
    CategoryBreakdown { categories, total }
}
