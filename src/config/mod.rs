//! Configuration module.

mod loader;
mod option_file;
mod types;

pub use loader::*;
pub use option_file::*;
pub use types::*;
