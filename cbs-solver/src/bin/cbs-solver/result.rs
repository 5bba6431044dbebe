use std::fmt::Display;

use thiserror::Error;

use crate::aiger::AigerParseError;

pub(crate) type CbsResult<T> = Result<T, CbsError>;

#[derive(Error, Debug)]
pub(crate) enum CbsError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The AIGER file was invalid, more details: {0}")]
    InvalidAiger(#[from] AigerParseError),
}

impl CbsError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
