mod auth_api;
mod error;
mod inventory_api;
mod route_guard;

pub use auth_api::*;
pub use error::*;
pub use inventory_api::*;
pub use route_guard::*;
