//! Engine errors

use thiserror::Error;

/// Error returned by a native method handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised while evaluating or compiling an expression
#[derive(Debug, Error)]
pub enum EngineError {
    /// No matching operation where one is required
    #[error("Resolution failed: {message}")]
    Resolution {
        /// What could not be resolved
        message: String,
    },

    /// The construct cannot be compiled to source
    #[error("Unsupported construct: {message}")]
    UnsupportedConstruct {
        /// Why compilation gave up
        message: String,
    },

    /// The underlying operation raised
    #[error("Invocation of '{method}' failed: {source}")]
    Invocation {
        /// Name of the invoked operation
        method: String,
        /// Cause reported by the handler or the argument conversion
        #[source]
        source: HandlerError,
    },

    /// An argument array was released without a matching checkout
    #[error("Argument pool integrity violated: {message}")]
    PoolIntegrity {
        /// Details of the violation
        message: String,
    },
}

impl EngineError {
    /// Build a resolution failure
    pub fn resolution(message: impl Into<String>) -> Self {
        EngineError::Resolution {
            message: message.into(),
        }
    }

    /// Build an unsupported-construct failure
    pub fn unsupported(message: impl Into<String>) -> Self {
        EngineError::UnsupportedConstruct {
            message: message.into(),
        }
    }

    /// Wrap a handler or conversion error as an invocation failure
    pub fn invocation(method: impl Into<String>, source: impl Into<HandlerError>) -> Self {
        EngineError::Invocation {
            method: method.into(),
            source: source.into(),
        }
    }

    /// Build a pool integrity failure
    pub fn pool_integrity(message: impl Into<String>) -> Self {
        EngineError::PoolIntegrity {
            message: message.into(),
        }
    }

    /// Whether this is a resolution failure
    pub fn is_resolution(&self) -> bool {
        matches!(self, EngineError::Resolution { .. })
    }

    /// Whether this is an unsupported-construct failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, EngineError::UnsupportedConstruct { .. })
    }

    /// Whether this is an invocation failure
    pub fn is_invocation(&self) -> bool {
        matches!(self, EngineError::Invocation { .. })
    }
}
