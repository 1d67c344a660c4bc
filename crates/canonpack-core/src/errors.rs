use thiserror::Error;

/// Errors from identity computation.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The input record is not a JSON object.
    #[error("edition must be a JSON object")]
    NotAnObject,
}

/// Errors from canonical shape mapping.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The input record is not a JSON object.
    #[error("edition must be a JSON object")]
    NotAnObject,
}
