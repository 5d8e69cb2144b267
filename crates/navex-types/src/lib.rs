//! navex Type Model
//!
//! Static type representation shared by the object model, the interpreter and
//! the source-fragment compiler.

#![warn(missing_docs)]

pub mod error;
pub mod subtyping;
pub mod ty;

pub use error::TypeError;
pub use subtyping::{Compatibility, SubtypingContext, TypeHierarchy};
pub use ty::{PrimitiveType, Type};
