//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

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
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(DomainError::UnknownNode) => {
                        crate::exitcode::SOFTWARE
                    }
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::InputNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::CannotCreate { .. } => crate::exitcode::CANTCREAT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let domain: CliError = ApplicationError::Domain(DomainError::EmptyTargetSet).into();
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);

        let missing: CliError = ApplicationError::InputNotFound(PathBuf::from("tree.nwk")).into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let unwritable: CliError = ApplicationError::CannotCreate {
            path: PathBuf::from("/readonly/out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(unwritable.exit_code(), crate::exitcode::CANTCREAT);

        let usage = CliError::InvalidArgs("empty --cut".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn test_domain_message_passes_through() {
        let err: CliError =
            ApplicationError::Domain(DomainError::NameNotFound("Z".into())).into();
        assert_eq!(err.to_string(), "target not found among tree leaves: Z");
    }
}
