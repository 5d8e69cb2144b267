//! Navigation chain node: each step runs against the previous step's result

use crate::compiler::{CompilationContext, CompiledFragment};
use crate::error::EngineResult;
use crate::vm::context::EvalContext;
use crate::vm::value::Value;

use super::Node;

pub(super) fn evaluate(node: Node<'_>, ctx: &EvalContext<'_>, source: &Value) -> EngineResult<Value> {
    let mut current = source.clone();
    for step in node.children() {
        current = step.evaluate(ctx, &current)?;
    }
    Ok(current)
}

/// Compile every step for reading; with `write_last`, the last step is
/// compiled for writing instead
///
/// A step with nothing to contribute makes the whole chain blank.
pub(super) fn compile(
    node: Node<'_>,
    ctx: &mut CompilationContext<'_>,
    target: &Value,
    write_last: bool,
) -> EngineResult<CompiledFragment> {
    let count = node.child_count();
    let mut acc = CompiledFragment::empty();
    let mut current = target.clone();
    for (i, step) in node.children().enumerate() {
        let last = i + 1 == count;
        let fragment = if last && write_last {
            step.compile_write(ctx, &current)?
        } else {
            step.compile_read(ctx, &current)?
        };
        if fragment.is_blank() {
            return Ok(CompiledFragment::empty());
        }
        acc.append(fragment);
        if !last {
            if let Some(cast) = ctx.take_pre_cast() {
                acc.apply_cast(&cast);
            }
            current = ctx.current_object.clone();
        }
    }
    Ok(acc)
}
