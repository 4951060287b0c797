use super::config::ConfigError;
use crate::core::models::system::BindingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Binding operation failed: {source}")]
    Binding {
        #[from]
        source: BindingError,
    },
}
