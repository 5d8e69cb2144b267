//! Literal node

use crate::compiler::syntax::literal;
use crate::compiler::{CompilationContext, CompiledFragment};
use crate::error::{EngineError, EngineResult};
use crate::vm::value::Value;

use super::Node;

pub(super) fn compile_read(value: &Value, ctx: &mut CompilationContext<'_>) -> EngineResult<CompiledFragment> {
    let code = literal(value).ok_or_else(|| {
        EngineError::unsupported(format!("constant {:?} has no source literal", value))
    })?;
    let ty = value.runtime_type();
    ctx.current_object = value.clone();
    ctx.set_current_type(ty.clone());
    ctx.current_accessor = None;
    Ok(CompiledFragment::standalone(code, ty))
}

/// A literal only has a write form as part of an enclosing node
pub(super) fn compile_write(
    node: Node<'_>,
    value: &Value,
    ctx: &mut CompilationContext<'_>,
) -> EngineResult<CompiledFragment> {
    if node.parent().is_none() {
        return Err(EngineError::unsupported("can't modify constant values"));
    }
    compile_read(value, ctx)
}
