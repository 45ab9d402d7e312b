//! aclboot: bootstrap the ACL system of a cluster orchestrator
//!
//! Layers, innermost first:
//! - [`domain`]: ACL records and their key/value rendering
//! - [`application`]: JSON and template output
//! - [`infrastructure`]: control-plane client and DI container
//! - [`cli`]: argument parsing and the bootstrap command

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
