//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Setting;

/// Domain errors represent violated invariants of the connection profile
/// or of user-supplied CI input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingSetting(Setting),

    #[error("malformed property assignment '{0}', expected key=value")]
    MalformedProperty(String),

    #[error("malformed type descriptor: {0}")]
    MalformedType(String),
}
