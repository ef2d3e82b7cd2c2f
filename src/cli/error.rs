//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::ENV_PREFIX;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    /// A handler failed; `path` is the command path, e.g. `xldc repository get`.
    #[error("{path}: {source}")]
    Command {
        path: String,
        #[source]
        source: ApplicationError,
    },

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the exit code for this error.
    ///
    /// Every failure ends the invocation with the same status.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(_) | CliError::Command { .. } | CliError::Usage(_) => {
                crate::exitcode::FAILURE
            }
        }
    }

    /// Suggestion printed below the error, if there is an obvious fix.
    pub fn hint(&self) -> Option<String> {
        let app = match self {
            CliError::Infra(InfraError::Application(e)) => e,
            CliError::Command { source, .. } => source,
            _ => return None,
        };
        match app {
            ApplicationError::Domain(DomainError::MissingSetting(setting)) => Some(format!(
                "set `{key}` in xldc.toml, {prefix}_{env} or --{key}",
                key = setting.key(),
                prefix = ENV_PREFIX,
                env = setting.key().to_uppercase(),
            )),
            ApplicationError::ConnectionFailed { .. } => {
                Some("check host, port, context and --ssl; run with -v for details".to_string())
            }
            _ => None,
        }
    }
}

/// Attach the command path to an application failure.
pub trait CommandContext<T> {
    fn in_command(self, path: &str) -> CliResult<T>;
}

impl<T> CommandContext<T> for ApplicationResult<T> {
    fn in_command(self, path: &str) -> CliResult<T> {
        self.map_err(|source| CliError::Command {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Setting;

    #[test]
    fn given_missing_port_when_asking_hint_then_names_all_sources() {
        let err = CliError::from(ApplicationError::from(DomainError::MissingSetting(
            Setting::Port,
        )));

        assert_eq!(
            err.hint().as_deref(),
            Some("set `port` in xldc.toml, XLDC_PORT or --port")
        );
        assert_eq!(err.to_string(), "Port is required");
    }

    #[test]
    fn given_usage_error_when_asking_hint_then_none() {
        assert_eq!(CliError::Usage("x".into()).hint(), None);
    }

    #[test]
    fn given_application_error_when_in_command_then_message_is_prefixed() {
        let result: ApplicationResult<()> = Err(ApplicationError::Usage("no types".into()));

        let err = result.in_command("xldc metadata template").unwrap_err();

        assert_eq!(err.to_string(), "xldc metadata template: no types");
        assert_eq!(err.exit_code(), crate::exitcode::FAILURE);
    }
}
