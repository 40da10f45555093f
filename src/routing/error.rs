//! Dispatch failure types.

use thiserror::Error;

/// Boxed error returned by host-supplied routers and lookups.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a failed resolution.
///
/// `NotFound`, `NonCanonicalPath` and `Forbidden` are the three expected
/// outcomes. `Lookup` and `Router` carry failures raised by host code that
/// abort the walk.
#[derive(Debug, Error)]
pub enum DispatchError<H> {
    /// Every fallback was exhausted without resolving a handler.
    #[error("no handler resolved for path")]
    NotFound,

    /// An index handler was reached without the trailing separator.
    /// The caller decides whether to redirect or serve `handler`.
    #[error("index handler reached without trailing separator")]
    NonCanonicalPath { handler: H, remainder: Vec<String> },

    /// The security policy rejected a crossing or the resolved handler.
    #[error(transparent)]
    Forbidden(#[from] SecurityError),

    /// A lookup handler failed for a reason other than argument arity.
    #[error("lookup handler failed: {0}")]
    Lookup(#[source] LookupError),

    /// A custom router failed.
    #[error("custom router failed: {0}")]
    Router(#[source] BoxError),
}

impl<H> DispatchError<H> {
    /// Short label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchError::NotFound => "not_found",
            DispatchError::NonCanonicalPath { .. } => "non_canonical",
            DispatchError::Forbidden(_) => "forbidden",
            DispatchError::Lookup(_) => "lookup_error",
            DispatchError::Router(_) => "router_error",
        }
    }
}

/// Errors a lookup handler may return.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The handler cannot accept this many path segments. The resolver
    /// treats this as a decline and keeps backtracking.
    #[error("lookup takes {expected} argument(s) but {given} were given")]
    Arity { expected: String, given: usize },

    /// Any other failure. Aborts the resolution.
    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl LookupError {
    /// Verify `given` lies within `min..=max` (`max = None` is variadic).
    pub fn check_arity(min: usize, max: Option<usize>, given: usize) -> Result<(), LookupError> {
        let fits = given >= min && max.map_or(true, |max| given <= max);
        if fits {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        Err(LookupError::Arity { expected, given })
    }

    pub fn is_arity(&self) -> bool {
        matches!(self, LookupError::Arity { .. })
    }
}

/// Rejection raised by a security policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access to {target} denied: {reason}")]
pub struct SecurityError {
    pub target: String,
    pub reason: String,
}

impl SecurityError {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reason: reason.into(),
        }
    }
}
