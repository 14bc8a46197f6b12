use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced by the grid model and its adapters
#[derive(Error, Debug)]
pub enum GridError {
    /// A registration call received something that cannot be called
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A grid document that is empty or not rectangular
    #[error("Invalid grid document: {0}")]
    InvalidDocument(String),

    /// The remote end answered with a non-success status
    #[error("HTTP error! status: {status}")]
    Transfer { status: u16 },

    /// The transport itself rejected the request
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A load or save was started while another one was in flight
    #[error("A load or save is already in progress")]
    Busy,
}

impl GridError {
    /// Short machine-readable code for host bindings
    pub fn code(&self) -> &'static str {
        match self {
            GridError::InvalidArgument(_) => "INVALID_ARGUMENT",
            GridError::InvalidDocument(_) => "INVALID_DOCUMENT",
            GridError::Transfer { .. } | GridError::Transport(_) => "TRANSFER_FAILURE",
            GridError::Json(_) => "INVALID_JSON",
            GridError::Busy => "TRANSFER_IN_PROGRESS",
        }
    }
}

/// Failure reported by a transport before any HTTP status was available
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raised by a change or selection listener
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("listener failed: {0}")]
pub struct ListenerFault(pub String);

impl ListenerFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Category of a recorded diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Load,
    Save,
    Catalog,
    Listener,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Load => write!(f, "Error loading grid data"),
            DiagnosticKind::Save => write!(f, "Error saving grid"),
            DiagnosticKind::Catalog => write!(f, "Error loading JSON file list"),
            DiagnosticKind::Listener => write!(f, "Listener fault"),
        }
    }
}

/// A runtime failure that was caught at a boundary operation and reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_display() {
        let err = GridError::Transfer { status: 404 };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.code(), "TRANSFER_FAILURE");
    }

    #[test]
    fn test_busy_code() {
        assert_eq!(GridError::Busy.code(), "TRANSFER_IN_PROGRESS");
    }

    #[test]
    fn test_transport_error_converts() {
        let err: GridError = TransportError::new("connection refused").into();
        assert_eq!(err.code(), "TRANSFER_FAILURE");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(DiagnosticKind::Load, "HTTP error! status: 500");
        assert_eq!(
            diag.to_string(),
            "Error loading grid data: HTTP error! status: 500"
        );
    }
}
