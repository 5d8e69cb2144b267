//! Backend traits
//!
//! Defines the `DynamicCompiler` trait a code-loading backend implements. The
//! engine hands it a [`SourceUnit`] and gets back something it can call.

use std::sync::Arc;

use navex_types::Type;

use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::value::Value;

/// Generated source for one expression
///
/// The getter body reads `target` (and `root` for arguments); the setter body
/// additionally reads `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// Runtime type of the root the expression was compiled against
    pub root_type: Option<Type>,
    /// Static type of the getter's result, when known
    pub result_type: Option<Type>,
    /// Getter body
    pub getter: String,
    /// Setter body, when the expression is assignable
    pub setter: Option<String>,
}

/// Executable form of a compiled expression
pub trait CompiledAccessor: Send + Sync {
    /// Evaluate against `target`
    fn get(&self, ctx: &EvalContext<'_>, target: &Value) -> EngineResult<Value>;

    /// Assign `value` through the expression
    fn set(&self, _ctx: &EvalContext<'_>, _target: &Value, _value: &Value) -> EngineResult<()> {
        Err(EngineError::unsupported("expression is not assignable"))
    }
}

/// Turns generated source into executable accessors
pub trait DynamicCompiler {
    /// Compile a unit
    fn compile(&self, unit: &SourceUnit) -> EngineResult<Arc<dyn CompiledAccessor>>;
}
