//! Reflection metadata for the object model
//!
//! Types are registered with their fields, methods (each backed by a native
//! handler) and inheritance edges. The registry doubles as the
//! [`TypeHierarchy`](navex_types::TypeHierarchy) used for subtyping checks.

mod class_metadata;

pub use class_metadata::{
    ClassMetadata, ClassRegistry, FieldInfo, MethodDef, MethodDescriptor, MethodHandler,
};
