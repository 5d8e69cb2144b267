//! Static method call node

use navex_types::Type;

use crate::compiler::sampling::sample;
use crate::compiler::{CompilationContext, CompiledFragment, Role};
use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::resolver::ArgShapes;
use crate::vm::value::Value;

use super::{arguments, Node};

pub(super) fn evaluate(node: Node<'_>, class: &Type, name: &str, ctx: &EvalContext<'_>) -> EngineResult<Value> {
    let runtime = ctx.runtime();
    let mut args = runtime.pool().checkout(node.child_count());
    for (slot, child) in args.iter_mut().zip(node.children()) {
        *slot = child.evaluate(ctx, ctx.root())?;
    }
    runtime.invoker().invoke_static(ctx, class, name, &args)
}

/// Both roles emit the same call: `Class.name(args)`
pub(super) fn compile(
    node: Node<'_>,
    class: &Type,
    name: &str,
    ctx: &mut CompilationContext<'_>,
) -> EngineResult<CompiledFragment> {
    let Some(method) = ctx
        .runtime()
        .resolver()
        .find_static(class, name, ArgShapes::Arity(node.child_count()))
    else {
        return Ok(CompiledFragment::empty());
    };
    if method.variadic {
        return Err(EngineError::unsupported(format!(
            "variadic method calls can't be compiled: {}",
            method
        )));
    }

    let args = arguments::emit(node, &method, ctx, Role::Read)?;
    let code = format!("{}.{}({})", class, method.name, args);

    sample(ctx, node, &method, Role::Read, |eval| evaluate(node, class, name, eval))?;
    ctx.set_current_type(Some(method.return_type.clone()));
    ctx.current_accessor = Some(class.clone());

    let fragment = CompiledFragment::standalone(code, Some(method.return_type.clone()));
    if method.return_type.is_void() {
        return Ok(fragment.into_statement());
    }
    Ok(fragment)
}
