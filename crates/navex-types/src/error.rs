//! Type model errors

use thiserror::Error;

/// Errors raised while building or inspecting types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A type name could not be parsed
    #[error("Invalid type name: '{name}'")]
    InvalidTypeName {
        /// The rejected name
        name: String,
    },

    /// A primitive type was required
    #[error("Not a primitive or boxed primitive type: {ty}")]
    NotPrimitive {
        /// Display form of the offending type
        ty: String,
    },
}
