mod inventory;
mod session;
mod stock;
mod tag;
mod user;

pub use inventory::*;
pub use session::*;
pub use stock::*;
pub use tag::*;
pub use user::*;
