//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Any failure: bad arguments, client setup, remote bootstrap or rendering
pub const FAILURE: i32 = 1;
