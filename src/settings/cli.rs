use super::Parser;
use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "larder", version, about = "Restaurant inventory back-office client")]
pub struct Cli {
    #[arg(long, global = true)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    Logout,
    /// Dashboard metrics as returned by the backend
    Metrics,
    Products,
    Recipes,
    Notifications,
    /// Stock overview: category totals, low-stock list and top products
    Summary,
    CreateProduct {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: f64,
        #[arg(long, default_value = "kg")]
        unit: String,
        #[arg(long, default_value = "Other")]
        category: String,
        #[arg(long, default_value = "Low")]
        priority: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 10.0)]
        min_stock_threshold: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
    Restock {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        cost: f64,
    },
    Adjust {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        debit: Option<f64>,
        #[arg(long)]
        credit: Option<f64>,
        #[arg(long)]
        reason: Option<String>,
    },
    Sale {
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        quantity: f64,
    },
    DeleteProduct {
        #[arg(long)]
        product_id: String,
    },
    CreateRecipe {
        #[arg(long)]
        name: String,
        /// `productId:quantity`, repeatable
        #[arg(long = "ingredient", required = true)]
        ingredients: Vec<String>,
        #[arg(long, default_value_t = 1)]
        servings: u32,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
    ConsumeRecipe {
        #[arg(long)]
        recipe_id: String,
        #[arg(long, default_value_t = 1)]
        servings: u32,
    },
    /// Upload a CSV sheet
    Bulk {
        #[arg(value_enum)]
        kind: BulkKind,
        file: PathBuf,
    },
    /// Run the edge server that gates the dashboard
    Serve,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkKind {
    Products,
    Restock,
    Adjustments,
}
