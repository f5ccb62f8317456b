use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Initialization error: {0}")]
    Initialization(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Execution error: {0}")]
    Execution(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

// Helper conversions
impl From<rusqlite::Error> for SearchError {
    fn from(e: rusqlite::Error) -> Self { Self::Execution(e.to_string()) }
}

impl From<config::ConfigError> for SearchError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
