//! Result type alias for sharplint operations

use crate::error::SharplintError;

/// Standard Result type for sharplint operations
pub type Result<T> = std::result::Result<T, SharplintError>;

/// Helpers for callers that can skip past a failed rule or fix
pub trait ResultExt<T> {
    /// `Ok(None)` for a recoverable error; anything else passes through
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(kind = ?err.kind(), "skipping after error: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors_become_none() {
        let result: Result<u32> = Err(SharplintError::rule_error("style/x", "failed"));
        assert!(matches!(result.recoverable(), Ok(None)));

        let fatal: Result<u32> = Err(SharplintError::Cancelled);
        assert!(fatal.recoverable().is_err());

        let ok: Result<u32> = Ok(3);
        assert!(matches!(ok.recoverable(), Ok(Some(3))));
    }
}
