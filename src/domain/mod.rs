//! Domain layer: ACL records and their tabular rendering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod format;

pub use entities::*;
pub use error::DomainError;
pub use format::{format_kv, format_policy, format_token};
