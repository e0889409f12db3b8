use anyhow::Error;
use intake_config::ConfigError;
use intake_core::CoreError;
use intake_server::server::ServerError;
use intake_server::NotifyError;
use intake_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

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
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(server_err) = cause.downcast_ref::<ServerError>() {
            return ExitCode::from(server_exit_code(server_err));
        }
        if let Some(notify_err) = cause.downcast_ref::<NotifyError>() {
            return ExitCode::from(notify_exit_code(notify_err));
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidId | StoreErrorKind::InvalidDataPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::Sql
        | StoreErrorKind::Json
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidServerField { .. }
        | ConfigError::InvalidStoreField { .. }
        | ConfigError::InvalidLimits(_)
        | ConfigError::InvalidAllowedDomains { .. }
        | ConfigError::InvalidSource { .. }
        | ConfigError::InvalidNotificationsField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn server_exit_code(err: &ServerError) -> u8 {
    match err {
        ServerError::MissingApiKey { .. } | ServerError::InvalidCorsOrigin(_) => {
            EXIT_INVALID_INPUT
        }
        ServerError::Notifier(err) => notify_exit_code(err),
        ServerError::Io(_) => EXIT_FAILURE,
    }
}

fn notify_exit_code(err: &NotifyError) -> u8 {
    match err {
        NotifyError::Address { .. } | NotifyError::Config(_) | NotifyError::Unavailable(_) => {
            EXIT_INVALID_INPUT
        }
        NotifyError::Build(_)
        | NotifyError::Transport(_)
        | NotifyError::Auth(_)
        | NotifyError::Timeout(_) => EXIT_FAILURE,
    }
}
