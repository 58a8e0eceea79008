/// Classification of a failed gateway call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Upstream answered 404.
    NotFound,
    /// Upstream answered 401/403.
    Unauthorized,
    /// No response at all (connect error, timeout, closed transport).
    NetworkError,
    /// Any other upstream error response.
    Unknown,
    /// A success response whose payload is missing expected data.
    Validation,
}

/// Normalized failure of a single gateway call.
///
/// `message` is the upstream message verbatim when upstream supplied one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NetworkError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }
}

/// `Success(payload)` | `Failure(kind, message)`.
pub type ApiResult<T> = std::result::Result<T, ApiFailure>;
