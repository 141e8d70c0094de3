//! Configuration for the HRMS access and audit core.
//!
//! Settings live in `.hrms/config.yaml` under the project directory. Every
//! section is optional and falls back to its defaults.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
