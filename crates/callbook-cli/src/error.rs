use anyhow::Error;
use callbook_config::ConfigError;
use callbook_core::{CredentialsError, ValidationError};
use callbook_remote::RemoteError;
use callbook_store::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_CONFLICT: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_code_value(err))
}

fn exit_code_value(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            };
        }
        if cause.downcast_ref::<ValidationError>().is_some()
            || cause.downcast_ref::<CredentialsError>().is_some()
        {
            return EXIT_INVALID_INPUT;
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(remote_err) = cause.downcast_ref::<RemoteError>() {
            return remote_exit_code(remote_err);
        }
    }
    EXIT_FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::Conflict => EXIT_CONFLICT,
        StoreErrorKind::Setup => match err {
            StoreError::InvalidDataPath(_) => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        },
        StoreErrorKind::Unavailable | StoreErrorKind::Schema => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::MissingFirestoreSection
        | ConfigError::EmptyValue { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn remote_exit_code(err: &RemoteError) -> u8 {
    match err {
        RemoteError::Credentials(_) => EXIT_INVALID_INPUT,
        RemoteError::Unavailable(_) | RemoteError::SignIn(_) | RemoteError::Parse(_) => {
            EXIT_FAILURE
        }
        #[cfg(feature = "firestore")]
        RemoteError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "firestore")]
        RemoteError::Url(_) => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        exit_code_value, invalid_input, not_found, EXIT_CONFLICT, EXIT_FAILURE, EXIT_INVALID_INPUT,
        EXIT_NOT_FOUND,
    };
    use anyhow::Context as _;
    use callbook_core::{CallId, ValidationError};
    use callbook_remote::RemoteError;
    use callbook_store::StoreError;

    fn id() -> CallId {
        CallId::new("abc").unwrap()
    }

    #[test]
    fn maps_store_error_kinds() {
        let err = anyhow::Error::new(StoreError::Conflict(id()));
        assert_eq!(exit_code_value(&err), EXIT_CONFLICT);

        let err = anyhow::Error::new(StoreError::NotFound(id())).context("edit call");
        assert_eq!(exit_code_value(&err), EXIT_NOT_FOUND);

        let err = anyhow::Error::new(StoreError::unavailable("firestore", "timeout"));
        assert_eq!(exit_code_value(&err), EXIT_FAILURE);
    }

    #[test]
    fn validation_failures_are_invalid_input() {
        let err = Err::<(), _>(ValidationError::InvalidPhone)
            .context("validate call")
            .unwrap_err();
        assert_eq!(exit_code_value(&err), EXIT_INVALID_INPUT);
        assert_eq!(
            exit_code_value(&invalid_input("no updates provided")),
            EXIT_INVALID_INPUT
        );
        assert_eq!(exit_code_value(&not_found("call abc")), EXIT_NOT_FOUND);
    }

    #[test]
    fn sign_in_rejection_is_a_failure() {
        let err = anyhow::Error::new(RemoteError::SignIn("INVALID_PASSWORD".to_string()));
        assert_eq!(exit_code_value(&err), EXIT_FAILURE);
        assert_eq!(
            exit_code_value(&anyhow::anyhow!("disk full")),
            EXIT_FAILURE
        );
    }
}
