/// Error taxonomy for the ReplyForge orchestration engine.
///
/// We use thiserror for the crate-local error hierarchy and anyhow for
/// provider-failure context. Only `EngineError::ConsentDenied` and
/// `EngineError::Catastrophic` are ever allowed to escape
/// `generate_response` as an `Err`; every other variant is converted into
/// an error-shaped `DraftResponse` at the orchestration boundary.
use thiserror::Error;

use crate::consent::ConsentError;

/// Result type alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid/expired/mismatched token on the primary (`vault.read.email`) scope.
    /// Aborts the run; surfaced to the caller as a permission failure.
    #[error("consent denied: {0}")]
    ConsentDenied(#[from] ConsentError),

    /// A provider call (mail, calendar, LLM, embedding, web search) failed inside a node.
    /// The failing node returns an error string as its agent outcome; the composer still runs.
    #[error("provider failure in node '{node}': {source}")]
    ProviderFailure {
        node: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A scheduler tool call failed; becomes a tool-result message, not a hard abort.
    #[error("tool execution error: {0}")]
    ToolExecutionError(String),

    /// The classifier's JSON response could not be parsed; triggers the static fallback.
    #[error("classifier parse failure: {0}")]
    ParseFailure(String),

    /// Any uncaught failure in the graph. Converted to `DraftResponse { response_type: Error, .. }`
    /// rather than propagated, except when the caller explicitly unwraps `generate_response`'s `Result`.
    #[error("catastrophic failure: {0}")]
    Catastrophic(#[from] anyhow::Error),
}

impl EngineError {
    pub fn provider(node: &'static str, source: impl Into<anyhow::Error>) -> Self {
        EngineError::ProviderFailure {
            node,
            source: source.into(),
        }
    }
}

/// Errors raised by the provider traits themselves (§6). Kept distinct from
/// `EngineError` so provider implementations do not need to depend on the
/// orchestration error taxonomy; node code wraps these via `EngineError::provider`.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned an empty or unusable result")]
    Empty,

    #[error("provider timed out")]
    Timeout,

    #[error("provider rejected the request: {0}")]
    Rejected(String),
}
