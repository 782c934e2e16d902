//! Pipeline error types.

use thiserror::Error;

/// Errors surfaced by the compute pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The input document failed validation; the message names the
    /// offending field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A newer submission arrived while this run was in flight; its
    /// partial results were discarded.
    #[error("analysis superseded by a newer submission")]
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::InvalidInput("club.numFields must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid input: club.numFields must be positive"
        );
        assert!(EngineError::Superseded.to_string().contains("superseded"));
    }
}
