//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent records that violate their invariants.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown token type: {0}")]
    UnknownTokenType(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("modify index {modify_index} precedes create index {create_index}")]
    IndexOrder {
        create_index: u64,
        modify_index: u64,
    },
}
