use thiserror::Error;

/// Errors produced by grid construction, density building, and image
/// operators.
///
/// All failures are synchronous: an invalid input is a programming or
/// configuration error and is surfaced immediately at the call site.
/// Nothing here is retried, downgraded, or partially applied.
#[derive(Error, Debug)]
pub enum ExitwaveError {
    /// An argument value or flag combination is unusable.
    #[error("invalid `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// An array shape is incompatible with what the operation declared.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Reading or writing a form-factor table file failed.
    #[error("form-factor table io: {0}")]
    Io(#[from] std::io::Error),

    /// A form-factor table file did not parse.
    #[error("form-factor table parse: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ExitwaveError {
    /// Shorthand for [`ExitwaveError::InvalidArgument`].
    pub(crate) fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        ExitwaveError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExitwaveError>;
