use thiserror::Error;

/// Errors raised by the influence-maximization core.
///
/// Every variant is detected at the boundary of the call that would misuse the
/// graph or the oracle, before any simulation runs and before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImError {
    /// Caller contract violation (k out of range, zero simulations, unknown model, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The graph has no sealed propagation weights; every edge would read as 0.0.
    #[error("graph weights are not sealed; call seal_weights once after all edges are added")]
    UnsealedGraph,
}

impl ImError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ImError::InvalidArgument(msg.into())
    }
}

pub type ImResult<T> = Result<T, ImError>;
