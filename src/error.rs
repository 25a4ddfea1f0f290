//! Error handling for the soundgen-rs application
//!
//! This module defines the crate-level error type and a Result alias. Graph
//! operations have their own [`GraphError`](crate::graph::GraphError), which
//! converts into [`SoundGenError`] with `?`.

use crate::graph::GraphError;
use thiserror::Error;

/// Main error type for soundgen-rs operations
#[derive(Error, Debug)]
pub enum SoundGenError {
    /// Rejected graph edits and stale handles
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Patch descriptions that cannot be turned into a graph
    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SoundGenError>,
    },
}

impl SoundGenError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SoundGenError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The graph error at the root of this error, if any
    pub fn as_graph_error(&self) -> Option<&GraphError> {
        match self {
            SoundGenError::Graph(e) => Some(e),
            SoundGenError::WithContext { source, .. } => source.as_graph_error(),
            _ => None,
        }
    }
}

/// Result type alias for soundgen-rs operations
pub type Result<T> = std::result::Result<T, SoundGenError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, GraphError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SoundGenError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SoundGenError::from(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkId;

    #[test]
    fn test_error_display() {
        let err = SoundGenError::Config("missing sample rate".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing sample rate");
    }

    #[test]
    fn test_error_with_context() {
        let err = SoundGenError::InvalidPatch("test".to_string());
        let with_ctx = err.with_context("Failed to load patch");
        assert!(with_ctx.to_string().contains("Failed to load patch"));
    }

    #[test]
    fn test_graph_error_context_keeps_root() {
        let result: std::result::Result<(), GraphError> = Err(GraphError::UnknownLink(LinkId(3)));
        let err = result.context("Replaying link 3").unwrap_err();

        assert!(err.to_string().starts_with("Replaying link 3"));
        assert_eq!(
            err.as_graph_error(),
            Some(&GraphError::UnknownLink(LinkId(3)))
        );
    }
}
