//! Error types for routing and stage execution.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Router configuration errors.
///
/// These are reported by [`Router::run`](crate::Router::run) before any
/// stage executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// An immediate handler was composed somewhere other than last.
    #[error(
        "immediate handler `{pattern}` at position {position} of {len} must be the last stage"
    )]
    MisplacedHandler {
        /// Route specification the handler was registered under.
        pattern: String,
        /// Zero-based position in the composed chain.
        position: usize,
        /// Number of stages in the chain.
        len: usize,
    },
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// A failure raised by a stage.
///
/// Any `std::error::Error + Send + Sync` converts into a `Failure` with `?`.
/// Clones share the underlying error, so the run outcome and the `error`
/// listeners observe the same object; compare with [`Failure::ptr_eq`].
#[derive(Clone)]
pub struct Failure {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl Failure {
    /// Wraps an error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Creates a failure from a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(Message(message.to_string()))
    }

    /// Returns `true` if both failures are the same error object.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns the underlying error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Returns the shared error, which itself implements `Error`.
    #[must_use]
    pub fn into_shared(self) -> Arc<dyn StdError + Send + Sync + 'static> {
        self.inner
    }
}

impl From<Failure> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(failure: Failure) -> Self {
        Box::new(failure.inner)
    }
}

impl From<Failure> for Box<dyn StdError + 'static> {
    fn from(failure: Failure) -> Self {
        Box::new(failure.inner)
    }
}

impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

/// Error behind [`Failure::msg`].
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn test_clones_share_identity() {
        let a = Failure::msg("boom");
        let b = a.clone();
        let c = Failure::msg("boom");
        assert!(Failure::ptr_eq(&a, &b));
        assert!(!Failure::ptr_eq(&a, &c));
    }

    #[test]
    fn test_question_mark_converts() {
        fn write() -> std::result::Result<(), DiskFull> {
            Err(DiskFull)
        }
        fn fails() -> std::result::Result<(), Failure> {
            write()?;
            Ok(())
        }
        let failure = fails().unwrap_err();
        assert!(failure.downcast_ref::<DiskFull>().is_some());
        assert_eq!(failure.to_string(), "disk full");
    }

    #[test]
    fn test_boxes_keep_message() {
        let boxed: Box<dyn StdError + Send + Sync> = Failure::new(DiskFull).into();
        assert_eq!(boxed.to_string(), "disk full");
    }

    #[test]
    fn test_misplaced_handler_message() {
        let err = RouterError::MisplacedHandler {
            pattern: "start".into(),
            position: 0,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "immediate handler `start` at position 0 of 2 must be the last stage"
        );
    }
}
