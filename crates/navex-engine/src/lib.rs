//! navex engine
//!
//! This crate provides the runtime side of navigation expressions:
//! - **VM**: values, class metadata, method resolution and invocation, null
//!   policies and the argument pool (`vm` module)
//! - **AST**: expression nodes with interpreted evaluation (`ast` module)
//! - **Compiler**: source-fragment generation with type threading and
//!   argument coercion (`compiler` module)
//! - **Expression**: the driver choosing between compiled and interpreted
//!   execution (`expression` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use navex_engine::{ClassMetadata, ClassRegistry, ExprTree, Expression, MethodDef, Object, Runtime, Value};
//! use navex_types::{PrimitiveType, Type};
//!
//! let int = Type::Primitive(PrimitiveType::Int);
//! let mut registry = ClassRegistry::new();
//! registry.register(ClassMetadata::class("Calc").with_method(
//!     MethodDef::new("compute", |_, args| Ok(Value::Int(args[0].as_i64().unwrap_or(0) as i32 * 2)))
//!         .params([int.clone()])
//!         .returns(int),
//! ));
//! let runtime = Runtime::new(registry);
//!
//! let mut tree = ExprTree::new();
//! let one = tree.constant(21);
//! let call = tree.method("compute", [one]);
//! let expr = Expression::new(tree, call);
//!
//! let root = Value::object(Object::new("Calc"));
//! assert_eq!(expr.evaluate(&runtime, &root)?, Value::Int(42));
//! assert_eq!(expr.compile(&runtime, &root)?.getter, "return ((Calc)target).compute(21);");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Expression nodes
pub mod ast;

/// Source-fragment compiler
pub mod compiler;

/// Engine configuration
pub mod config;

/// Engine errors
pub mod error;

/// Expression driver
pub mod expression;

/// Object model and interpreter runtime
pub mod vm;

// ============================================================================
// Re-exports
// ============================================================================

pub use ast::{ExprTree, MethodCall, Node, NodeId, NodeKind, NodeVisitor};
pub use compiler::{
    coerce, CompilationContext, CompiledAccessor, CompiledFragment, DynamicCompiler, Role, SourceUnit,
};
pub use config::{ConfigError, EngineConfig, PoolConfig, SampleFailure, SamplingConfig};
pub use error::{EngineError, EngineResult, HandlerError};
pub use expression::{ExecutionStrategy, Expression};
pub use vm::{
    ArgShapes, ArgumentPool, ClassMetadata, ClassRegistry, EvalContext, MethodDef, MethodDescriptor,
    MethodResolver, NullPolicy, Object, Resolution, Runtime, Value,
};
