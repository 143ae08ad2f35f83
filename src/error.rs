//! Error taxonomy shared by the gateway, the proxy endpoints and the UI.
//!
//! Every network-facing operation returns `Result<T, AppError>`, so callers
//! branch on one normalized shape instead of re-deriving messages at each
//! call site. The message carried by each variant is always safe to show to
//! the user.

use thiserror::Error;

/// Classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Backend,
    Transport,
    ClientSide,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Backend => "backend",
            Self::Transport => "transport",
            Self::ClientSide => "client-side",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Malformed or missing input, detected before any network call.
    #[error("{0}")]
    Validation(String),
    /// The backend answered with a non-success response.
    #[error("{0}")]
    Backend(String),
    /// The backend could not be reached or the exchange broke down.
    #[error("{0}")]
    Transport(String),
    /// Local failure that never touched the network (e.g. clipboard).
    #[error("{0}")]
    ClientSide(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Backend(_) => ErrorKind::Backend,
            Self::Transport(_) => ErrorKind::Transport,
            Self::ClientSide(_) => ErrorKind::ClientSide,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Backend(m) | Self::Transport(m) | Self::ClientSide(m) => m,
        }
    }

    /// HTTP status used when the error is returned by a proxy endpoint.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::Validation("bad".into());
        assert_eq!(err.status(), 400);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn upstream_failures_map_to_server_error() {
        assert_eq!(AppError::Backend("x".into()).status(), 500);
        assert_eq!(AppError::Transport("x".into()).status(), 500);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::Backend("repo not found".into());
        assert_eq!(err.to_string(), "repo not found");
        assert_eq!(err.message(), "repo not found");
        assert_eq!(err.kind().to_string(), "backend");
    }
}
