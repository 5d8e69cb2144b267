//! Object model and interpreter runtime
//!
//! This module provides:
//! - Values and heap objects
//! - Class metadata and method descriptors
//! - Method resolution and invocation
//! - Null policies for absent call results
//! - The argument pool used by interpreted calls

pub mod context;
pub mod convert;
pub mod invoker;
pub mod null_handler;
pub mod pool;
pub mod reflect;
pub mod resolver;
pub mod runtime;
pub mod value;

pub use context::EvalContext;
pub use convert::{convert_value, ConversionError};
pub use invoker::{Invoker, ReflectiveInvoker};
pub use null_handler::{NullPolicy, NullPolicyRegistry, PassThroughNull};
pub use pool::{ArgumentLease, ArgumentPool, PoolStats};
pub use reflect::{ClassMetadata, ClassRegistry, FieldInfo, MethodDef, MethodDescriptor, MethodHandler};
pub use resolver::{AccessorKind, ArgShapes, MethodResolver, RegistryResolver, Resolution};
pub use runtime::Runtime;
pub use value::{Object, ObjectRef, Value};
