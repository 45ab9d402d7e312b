//! Application layer: output rendering
//!
//! Turns domain records into the structured forms handed to the user.

pub mod error;
pub mod render;

pub use error::{ApplicationError, ApplicationResult};
pub use render::{format_output, render_template};
