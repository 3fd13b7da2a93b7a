use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum KpiError {
    #[error("Invalid metric '{metric}': denominator is zero")]
    InvalidMetric { metric: &'static str },

    #[error("No data for selected period")]
    EmptyRange,

    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type KpiResult<T> = Result<T, KpiError>;
