use thiserror::Error;

/// Failures surfaced by catalog, recipe and fridge operations.
///
/// None of these are fatal to the process: callers show a message and carry on.
#[derive(Debug, Error)]
pub enum KitchenError {
    /// Bad user input (empty name, non-positive weight, ...). Nothing was changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Lookup miss. Treat as "ingredient unavailable".
    #[error("not found: {0}")]
    NotFound(String),

    /// A zero reference weight reached the scaling step.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Recipe save rejected: empty name, no lines, or a line without weight.
    #[error("recipe is incomplete: {0}")]
    IncompleteRecipe(String),

    /// Write or subscribe failure in the document store. Never retried.
    #[error("storage error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl KitchenError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

pub type KitchenResult<T> = Result<T, KitchenError>;

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn storage_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection reset").context("insert document");
        let err = KitchenError::Storage(inner);
        let msg = err.to_string();
        assert!(msg.contains("insert document"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn helpers_build_expected_variants() {
        assert!(matches!(
            KitchenError::validation("empty name"),
            KitchenError::Validation(m) if m == "empty name"
        ));
        assert!(matches!(
            KitchenError::not_found("onion"),
            KitchenError::NotFound(m) if m == "onion"
        ));
    }
}
