use crate::byte_stream::Location;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Parser error that carries a message and, when known, the source position.
#[derive(Clone, Debug, PartialEq)]
pub struct CssError {
    pub message: String,
    pub location: Option<Location>,
}

impl CssError {
    #[must_use]
    pub fn new(message: &str) -> Self {
        CssError {
            message: message.to_string(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(message: &str, location: Location) -> Self {
        CssError {
            message: message.to_string(),
            location: Some(location),
        }
    }
}

impl Display for CssError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{} at {:?}", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

pub type CssResult<T> = Result<T, CssError>;

/// Failures surfaced by engine embedders rather than the parser itself.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("css failure: {0}")]
    Css(String),

    #[error("resource failure: {0}")]
    Resource(String),
}

impl From<CssError> for EngineError {
    fn from(e: CssError) -> Self {
        EngineError::Css(e.to_string())
    }
}
