use feebook_config::ConfigError;
use feebook_core::CoreError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures raised by the Feebook libraries.
#[derive(Debug, Error)]
pub enum FeebookError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Feebook(#[from] FeebookError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Feebook(FeebookError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Feebook(FeebookError::Config(err))
    }
}
