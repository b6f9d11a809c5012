//! Error types for the gridview engine.

use thiserror::Error;

/// Result type alias using ViewError.
pub type ViewResult<T> = Result<T, ViewError>;

/// Primary error type for engine operations.
#[derive(Debug, Error)]
pub enum ViewError {
    // === Invariant violations (corrupt in-memory model) ===
    #[error("virtual index {index} beyond aggregate extent {extent} of '{variable}'")]
    IndexBeyondExtent {
        variable: String,
        index: usize,
        extent: usize,
    },

    #[error("coordinate mapping for '{variable}' has {effective_dims} effective dimensions (only 0 or 2 supported)")]
    UnsupportedMapping {
        variable: String,
        effective_dims: usize,
    },

    #[error("distance increased during geolocation at step {step}: {previous} -> {current}")]
    UnimodalityBroken {
        step: usize,
        previous: f64,
        current: f64,
    },

    #[error("dimension '{dimension}' of '{variable}' has extent {found}, expected {expected} across all files")]
    ChainShapeMismatch {
        variable: String,
        dimension: String,
        expected: usize,
        found: usize,
    },

    // === Data-quality conditions ===
    #[error("range of '{0}' is degenerate (min == max)")]
    DegenerateRange(String),

    #[error("coordinate range of dimension '{0}' has zero width")]
    ZeroCoordinateRange(String),

    #[error("edits pending on '{0}': export or discard them before loading")]
    EditsPending(String),

    // === Collaborator-boundary failures ===
    #[error("failed to open overlay file '{path}': {message}")]
    OverlayOpen { path: String, message: String },

    #[error("bad overlay header: {0}")]
    OverlayHeader(String),

    #[error("unsupported overlay version {0} (accepted 0.95 to 1.05)")]
    OverlayVersion(f64),

    #[error("bad overlay point file at line {line}: {message}")]
    OverlayFormat { line: usize, message: String },

    #[error("failed to read data: {0}")]
    ReadFailed(String),

    #[error("variable not found: {0}")]
    VariableNotFound(String),

    #[error("dimension not found: {0}")]
    DimensionNotFound(String),
}

/// How an error should be treated by callers, per the recovery classes of
/// the engine design: fatal errors indicate a corrupt in-memory model,
/// recoverable ones have a documented fallback, failures leave state
/// unchanged and are reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Corrupt in-memory model; not meant to be recovered from.
    Fatal,
    /// The caller is offered a fallback and execution continues.
    Recoverable,
    /// Reported as a failure result; engine state is left unchanged.
    Failure,
}

impl ViewError {
    /// Classify this error into a recovery class.
    pub fn severity(&self) -> Severity {
        match self {
            ViewError::IndexBeyondExtent { .. }
            | ViewError::UnsupportedMapping { .. }
            | ViewError::UnimodalityBroken { .. }
            | ViewError::ChainShapeMismatch { .. } => Severity::Fatal,

            ViewError::DegenerateRange(_)
            | ViewError::ZeroCoordinateRange(_)
            | ViewError::EditsPending(_) => Severity::Recoverable,

            ViewError::OverlayOpen { .. }
            | ViewError::OverlayHeader(_)
            | ViewError::OverlayVersion(_)
            | ViewError::OverlayFormat { .. }
            | ViewError::ReadFailed(_)
            | ViewError::VariableNotFound(_)
            | ViewError::DimensionNotFound(_) => Severity::Failure,
        }
    }

    /// True when this error indicates a corrupt in-memory model.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        ViewError::ReadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classes() {
        let fatal = ViewError::IndexBeyondExtent {
            variable: "sst".to_string(),
            index: 10,
            extent: 8,
        };
        assert_eq!(fatal.severity(), Severity::Fatal);
        assert!(fatal.is_fatal());

        let recoverable = ViewError::DegenerateRange("sst".to_string());
        assert_eq!(recoverable.severity(), Severity::Recoverable);

        let failure = ViewError::OverlayVersion(2.0);
        assert_eq!(failure.severity(), Severity::Failure);
        assert!(!failure.is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = ViewError::IndexBeyondExtent {
            variable: "temp".to_string(),
            index: 12,
            extent: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("temp"));
    }
}
