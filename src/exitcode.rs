//! Process exit codes

/// Any fatal error: configuration, connectivity, remote call, output or usage
pub const FAILURE: i32 = 1;
