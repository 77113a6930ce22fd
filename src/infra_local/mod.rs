mod cookie_file;
mod file_local_store;
mod memory_local_store;

pub use cookie_file::*;
pub use file_local_store::*;
pub use memory_local_store::*;
