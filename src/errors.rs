//! Error types for the endpoint monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug)]
pub enum MonitorError {
    /// Reading the endpoint file failed
    Io(std::io::Error),

    /// Endpoint file is not valid YAML or does not match the endpoint schema
    Yaml(serde_yaml::Error),

    /// HTTP client could not be built
    Http(reqwest::Error),

    /// Runtime configuration error
    Config(String),

    /// An endpoint definition failed load-time validation
    InvalidEndpoint { index: usize, reason: String },

    /// Wrong command line invocation
    Usage(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Io(err) => write!(f, "IO error: {}", err),
            MonitorError::Yaml(err) => write!(f, "Endpoint file error: {}", err),
            MonitorError::Http(err) => write!(f, "HTTP client error: {}", err),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MonitorError::InvalidEndpoint { index, reason } => {
                write!(f, "Invalid endpoint #{}: {}", index, reason)
            }
            MonitorError::Usage(msg) => write!(f, "Usage error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Io(err) => Some(err),
            MonitorError::Yaml(err) => Some(err),
            MonitorError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(err)
    }
}

impl From<serde_yaml::Error> for MonitorError {
    fn from(err: serde_yaml::Error) -> Self {
        MonitorError::Yaml(err)
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err)
    }
}
