mod api_client;
mod bulk_upload;
mod endpoints;
mod pipeline;
mod query_cache;
mod session_context;
mod token;

pub use api_client::*;
pub use bulk_upload::*;
pub use endpoints::*;
pub use pipeline::*;
pub use query_cache::*;
pub use session_context::*;
pub use token::*;
