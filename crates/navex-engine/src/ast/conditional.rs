//! Logical test node: `cond ? then : else`
//!
//! Branches are compiled from the root, the way arguments are.

use navex_types::Type;

use crate::compiler::syntax::{root_expression, should_cast, NULL_LITERAL};
use crate::compiler::{CompilationContext, CompiledFragment};
use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::value::Value;

use super::Node;

fn parts<'t>(node: Node<'t>) -> EngineResult<[Node<'t>; 3]> {
    match (node.child(0), node.child(1), node.child(2), node.child_count()) {
        (Some(cond), Some(then), Some(otherwise), 3) => Ok([cond, then, otherwise]),
        _ => Err(EngineError::unsupported(format!(
            "logical test needs 3 operands, found {}",
            node.child_count()
        ))),
    }
}

pub(super) fn evaluate(node: Node<'_>, ctx: &EvalContext<'_>, source: &Value) -> EngineResult<Value> {
    let [cond, then, otherwise] = parts(node)?;
    if cond.evaluate(ctx, source)?.truthy() {
        then.evaluate(ctx, source)
    } else {
        otherwise.evaluate(ctx, source)
    }
}

pub(super) fn compile_read(node: Node<'_>, ctx: &mut CompilationContext<'_>) -> EngineResult<CompiledFragment> {
    let [cond, then, otherwise] = parts(node)?;
    let root = ctx.root();

    let mut operand = |child: Node<'_>| -> EngineResult<(String, Option<Type>)> {
        ctx.reset_to_root();
        let fragment = child.compile_read(ctx, root)?;
        if fragment.is_statement() || ctx.current_type.as_ref().is_some_and(|ty| ty.is_void()) {
            return Err(EngineError::unsupported(format!(
                "logical test operand \"{}\" has no value",
                child
            )));
        }
        if fragment.is_blank() {
            return Ok((NULL_LITERAL.to_string(), None));
        }
        let cast = if should_cast(child) {
            ctx.take_pre_cast().unwrap_or_default()
        } else {
            String::new()
        };
        let code = format!("{}{}", cast, fragment.render(&root_expression(child, root)));
        Ok((code, fragment.static_type))
    };
    let (cond_code, _) = operand(cond)?;
    let (then_code, then_type) = operand(then)?;
    let (else_code, else_type) = operand(otherwise)?;

    let static_type = if then_type == else_type { then_type } else { None };
    ctx.current_object = evaluate(node, ctx.eval(), root)?;
    ctx.set_current_type(static_type.clone());
    ctx.current_accessor = None;

    Ok(CompiledFragment::standalone(
        format!("(Ops.toBoolean({}) ? {} : {})", cond_code, then_code, else_code),
        static_type,
    ))
}

pub(super) fn compile_write() -> EngineResult<CompiledFragment> {
    Err(EngineError::unsupported("a logical test can't be assigned"))
}
