use thiserror::Error;

/// Errors raised while building, running, or feeding a network.
#[derive(Debug, Error)]
pub enum NetError {
    /// An array did not have the shape the receiving component was built for.
    #[error("shape mismatch in {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A computation produced NaN or an infinity.
    #[error("numeric instability in {context}: result is not finite")]
    NumericInstability { context: &'static str },

    /// Invalid hyperparameters or network description.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `backward` was called on a component that has no cached forward pass.
    #[error("{component}: backward called before forward")]
    BackwardBeforeForward { component: &'static str },

    /// A parameter update was requested before any gradient was computed.
    #[error("parameter '{name}' has no gradient yet")]
    MissingGradient { name: &'static str },

    /// Malformed IDX data.
    #[error("IDX format error: {0}")]
    Idx(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    pub(crate) fn shape(context: &'static str, expected: &[usize], got: &[usize]) -> NetError {
        NetError::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
