//! Source-fragment compiler
//!
//! Nodes compile to [`CompiledFragment`]s: snippets of target source that a
//! [`DynamicCompiler`] backend turns into a [`CompiledAccessor`]. A single
//! [`CompilationContext`] threads inferred types from node to node during one
//! traversal.
//!
//! Fragments use a small, fixed dialect:
//! - calls are suffixes anchored on a target expression (`.compute(1, 2)`)
//! - arguments navigate from the `root` parameter (`((Point)root).getX()`)
//! - conversions go through the `Ops` runtime helpers (`Ops.convertValue`,
//!   `Ops.toArray`, `Ops.box`, `Ops.toBoolean`)

pub mod backend;
pub mod coerce;
pub mod context;
pub mod fragment;
pub mod sampling;
pub mod syntax;

pub use backend::{CompiledAccessor, DynamicCompiler, SourceUnit};
pub use coerce::{coerce, is_coerced, Role};
pub use context::{CompilationContext, ScratchKey};
pub use fragment::{Anchor, CompiledFragment, ValueExpr, Wrapper};
