//! # domains
//!
//! Entity models, rule values, error taxonomy and port traits shared by every
//! other crate in the workspace. Nothing in here performs I/O or reads a clock.

pub mod error;
pub mod models;
pub mod policy;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use policy::*;
pub use traits::*;
