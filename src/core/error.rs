//! Configuration-time errors. None of them are recovered internally.

use thiserror::Error;

use crate::core::types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutoMapError {
    /// Matched generic properties disagree on the number of type arguments.
    #[error(
        "{source_type} has {} generic arguments, whereas {destination_type} has {}!",
        .source_args.len(),
        .destination_args.len()
    )]
    GenericArityMismatch {
        source_type: String,
        source_args: Vec<String>,
        destination_type: String,
        destination_args: Vec<String>,
    },

    #[error("constructor parameter selector `{0}` is not a property or field access")]
    NotAMemberExpression(String),

    #[error("constructor parameter not found: {0}")]
    ParameterNotFound(String),

    /// A descriptor lookup failed; the caller handed us ids or names the registry never issued.
    #[error("type resolution failed: {0}")]
    ReflectionResolution(String),

    #[error("cyclic type graph: {path}")]
    CyclicTypeGraph { path: String },

    #[error("type graph deeper than the configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("type `{0}` is already declared")]
    DuplicateType(String),

    #[error("invalid type reference `{0}`")]
    InvalidTypeReference(String),

    #[error("unknown mapping handle {0}")]
    UnknownMapHandle(usize),

    #[error("schema error: {0}")]
    Schema(String),
}

impl AutoMapError {
    pub(crate) fn unknown_type(id: TypeId) -> Self {
        AutoMapError::ReflectionResolution(format!("no type registered with id {id}"))
    }
}

pub type Result<T> = std::result::Result<T, AutoMapError>;
