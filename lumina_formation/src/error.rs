//! Error types for the formation engine.

use thiserror::Error;

use crate::element::ElementId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormationError {
    #[error("invalid formation config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("unknown element {0}")]
    UnknownElement(ElementId),
}

pub type Result<T> = std::result::Result<T, FormationError>;
