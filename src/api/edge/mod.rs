//! Edge server for the dashboard bundle: gates `/dashboard` on the session
//! cookies and serves everything else as plain static files.

mod error;
mod guard;
mod handler;
mod router;

pub use error::*;
pub use guard::*;
pub use handler::{ACCESS_COOKIE_MAX_AGE_SECS, CookiePolicy};
pub use router::routes;
