use super::App;
use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::settings::{BulkKind, Command};
use futures_util::future::try_join;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Runs one client command and prints its result on stdout.
pub async fn run(app: &App, command: Command) -> Result<(), ApiError> {
    let inventory = app.inventory_api.as_ref();
    match command {
        Command::Login { username, password } => {
            let result = app
                .auth_api
                .login(LoginInput { username, password })
                .await?;
            println!("Logged in as {}", result.user.username);
        }
        Command::Signup {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            app.auth_api
                .signup(SignupInput {
                    username: username.clone(),
                    email,
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            println!("Account {} created. You can now log in.", username);
        }
        Command::Logout => {
            app.auth_api.logout().await?;
            println!("Logged out");
        }
        Command::Metrics => print_json(&inventory.get_dashboard_metrics().await?)?,
        Command::Products => print_json(&inventory.get_products().await?)?,
        Command::Recipes => print_json(&inventory.get_recipes().await?)?,
        Command::Notifications => print_json(&inventory.get_notifications().await?)?,
        Command::Summary => {
            let (products, metrics) =
                try_join(inventory.get_products(), inventory.get_dashboard_metrics()).await?;
            print!("{}", render_summary(&products, &metrics));
        }
        Command::CreateProduct {
            name,
            quantity,
            unit,
            category,
            priority,
            price,
            min_stock_threshold,
            description,
        } => {
            let created = inventory
                .create_product(NewProduct {
                    name,
                    quantity,
                    unit,
                    category,
                    priority,
                    price,
                    min_stock_threshold,
                    description,
                })
                .await?;
            print_json(&created)?;
        }
        Command::Restock {
            product_id,
            quantity,
            cost,
        } => {
            let result = inventory
                .restock_product(Restock {
                    product_id: parse_id(&product_id)?,
                    quantity_credited: quantity,
                    cost_for_quantity_credited: cost,
                })
                .await?;
            print_json(&result)?;
        }
        Command::Adjust {
            product_id,
            debit,
            credit,
            reason,
        } => {
            let adjustment = ManualAdjustment::new(parse_id(&product_id)?, debit, credit, reason);
            print_json(&inventory.manual_adjustment(adjustment).await?)?;
        }
        Command::Sale {
            product_id,
            quantity,
        } => {
            let sale = Sale {
                product_id: parse_id(&product_id)?,
                quantity_debited: quantity,
            };
            print_json(&inventory.create_sale(sale).await?)?;
        }
        Command::DeleteProduct { product_id } => {
            print_json(&inventory.delete_product(&parse_id(&product_id)?).await?)?;
        }
        Command::CreateRecipe {
            name,
            ingredients,
            servings,
            price,
            description,
        } => {
            let ingredients = ingredients
                .iter()
                .map(|raw| raw.parse::<Ingredient>().map_err(ApiError::InvalidInput))
                .collect::<Result<Vec<_>, _>>()?;
            let recipe = NewRecipe {
                name,
                ingredients,
                servings,
                price,
                description,
            };
            print_json(&inventory.create_recipe(recipe).await?)?;
        }
        Command::ConsumeRecipe {
            recipe_id,
            servings,
        } => {
            let consumption = RecipeConsumption {
                recipe_id: RecipeId(recipe_id),
                servings,
            };
            print_json(&inventory.record_recipe_consumption(consumption).await?)?;
        }
        Command::Bulk { kind, file } => {
            let text = read_sheet(&file).await?;
            let result = match kind {
                BulkKind::Products => inventory.bulk_products(parse_products(&text)?).await?,
                BulkKind::Restock => inventory.bulk_restock(parse_restocks(&text)?).await?,
                BulkKind::Adjustments => {
                    inventory
                        .bulk_adjustments(parse_adjustments(&text)?)
                        .await?
                }
            };
            print_json(&result)?;
        }
        Command::Serve => {
            return Err(ApiError::InvalidInput(
                "serve runs the edge server, not a client command".to_string(),
            ));
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(ApiError::InvalidInput)
}

async fn read_sheet(path: &Path) -> Result<String, ApiError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ApiError::InvalidInput(format!("{}: {}", path.display(), e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ApiError::Decode(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Text rendering of the dashboard panels: category totals, low stock with
/// gauges, and the top-products chart.
pub fn render_summary(products: &[Product], metrics: &DashboardMetrics) -> String {
    let mut out = String::new();

    let breakdown = category_totals(&metrics.stock_by_category_summary);
    let _ = writeln!(out, "Stock by category (total {:.2})", breakdown.total);
    for category in &breakdown.categories {
        let share = if breakdown.total > 0.0 {
            category.value / breakdown.total * 100.0
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "  {:<20} {:>10.2} {:>5.1}%",
            category.name, category.value, share
        );
    }

    let low = low_stock(products);
    let _ = writeln!(out, "Low stock ({})", low.len());
    for product in low {
        let gauge = StockGauge::classify(product.quantity, product.min_stock_threshold, None);
        let _ = writeln!(
            out,
            "  {:<20} {:>8.2} {:<4} {:?} {:.0}%",
            product.name, product.quantity, product.unit, gauge.level, gauge.percentage
        );
    }

    let _ = writeln!(out, "Top products");
    for row in top_products(products, CHART_TOP_PRODUCTS) {
        let _ = writeln!(
            out,
            "  {:<20} {:>8.2}  {}",
            row.name,
            row.quantity,
            row.status.label()
        );
    }
    out
}
