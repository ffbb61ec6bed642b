use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ShutterError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("target position {0} is outside 0..=100")]
    InvalidTarget(f64),
    #[error("storage error: {0}")]
    Store(String),
    #[error("pairing button is not configured")]
    PairUnavailable,
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing shutter config")]
    MissingConfig,
    #[error("missing command port")]
    MissingPort,
    #[error("missing target store")]
    MissingStore,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

impl From<BuildError> for ShutterError {
    fn from(e: BuildError) -> Self {
        ShutterError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShutterError>;
