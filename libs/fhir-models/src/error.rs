//! Error types for FHIR models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required element: '{0}'")]
    MissingElement(&'static str),

    #[error("Missing required element: '{0}' must contain at least one item")]
    EmptyList(&'static str),

    #[error("Invalid {type_name} value: '{value}'")]
    InvalidPrimitive {
        type_name: &'static str,
        value: String,
    },

    #[error("Invalid string value for element '{element}': {reason}")]
    InvalidString {
        element: &'static str,
        reason: &'static str,
    },

    #[error("Invalid code '{code}' for value set {value_set}")]
    InvalidCode {
        value_set: &'static str,
        code: String,
    },

    #[error("Invalid reference type '{found}' for element '{element}': must be one of {allowed:?}")]
    InvalidReferenceType {
        element: &'static str,
        found: String,
        allowed: Vec<&'static str>,
    },

    #[error(
        "Reference value type '{found}' for element '{element}' does not match Reference.type '{declared}'"
    )]
    ReferenceTypeMismatch {
        element: &'static str,
        found: String,
        declared: String,
    },

    #[error("Element '{0}' is a SimpleQuantity and must not have a comparator")]
    SimpleQuantityComparator(&'static str),

    #[error("ele-1: {0} must have a value or children")]
    NoValueOrChildren(&'static str),

    #[error("Invalid narrative: {0}")]
    InvalidNarrative(&'static str),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Expected a {expected} resource but found {found}")]
    UnexpectedResourceType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown element '{0}'")]
    UnknownElement(String),

    #[error("Invalid FHIR resource: {0}")]
    InvalidResource(String),

    #[error("{path}: {source}")]
    AtPath {
        path: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Path of the offending element when the error came from tree validation
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::AtPath { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
