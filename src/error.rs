use crate::transport::TransportError;
use crate::types::PartKey;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "options.endpoint", "fragment[2].status_line")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, offending input)
    pub details: Option<String>,
    /// Source of the error (e.g., "batch_process", "response_parser")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for batch capture, framing and transport.
///
/// All batch variants are client-side and non-retriable. A batch POST that
/// comes back with a non-200 status is not an error: it is returned to the
/// caller as [`crate::batch::ProcessOutcome::Failed`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Batch is not active on this connection")]
    NotActive,

    #[error("Cannot process empty batch")]
    EmptyBatch,

    #[error("Batch has already been processed; create a new batch to capture again")]
    AlreadyProcessed,

    #[error("Batch part does not exist: {key}")]
    UnknownPart { key: PartKey },

    #[error("Batch response fragment '{key}' does not correspond to any captured part")]
    ProtocolCorrelation { key: PartKey },

    #[error("Could not determine response data type for batch part kind '{kind}'")]
    UnsupportedKind { kind: String },

    #[error("Framing error: {message}{}", format_context(.context))]
    Framing {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new framing error with structured context
    pub fn framing_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Framing {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Framing { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the error was raised by a local precondition before any network I/O.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NotActive | Error::EmptyBatch | Error::AlreadyProcessed
        )
    }
}
