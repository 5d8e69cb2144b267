//! Argument emission shared by instance and static calls

use crate::compiler::syntax::{root_expression, should_cast, NULL_LITERAL};
use crate::compiler::{coerce, CompilationContext, Role};
use crate::error::{EngineError, EngineResult};
use crate::vm::reflect::MethodDescriptor;

use super::Node;

/// Emit the comma-separated argument list of `node` for a call to `method`
///
/// Every child is compiled from the root. A cast pending before the loop is
/// set aside and restored afterwards.
pub(super) fn emit(
    node: Node<'_>,
    method: &MethodDescriptor,
    ctx: &mut CompilationContext<'_>,
    role: Role,
) -> EngineResult<String> {
    if node.child_count() == 0 {
        return Ok(String::new());
    }

    let pending = ctx.take_pre_cast();
    let mut args = Vec::with_capacity(node.child_count());
    for (i, child) in node.children().enumerate() {
        let prev_type = ctx.current_type.clone();
        ctx.reset_to_root();
        let root = ctx.root();

        let fragment = match role {
            Role::Read => child.compile_read(ctx, root)?,
            Role::Write => child.compile_write(ctx, root)?,
        };
        if fragment.is_statement() || ctx.current_type.as_ref().is_some_and(|ty| ty.is_void()) {
            return Err(EngineError::unsupported("method argument can't be a void type"));
        }
        if role == Role::Write && fragment.is_blank() && child.is_sub_expression() {
            return Err(EngineError::unsupported(format!(
                "setter argument \"{}\" of {} has no compiled form",
                child, method.name
            )));
        }
        if child.is_const() {
            ctx.current_type = prev_type;
        }

        let code = if fragment.is_blank() {
            NULL_LITERAL.to_string()
        } else {
            fragment.render(&root_expression(child, root))
        };
        let cast = if should_cast(child) {
            ctx.take_pre_cast().unwrap_or_default()
        } else {
            String::new()
        };

        let inferred = match fragment.static_type {
            Some(ty) => Some(ty),
            None => child.evaluate(ctx.eval(), root)?.runtime_type(),
        };
        let param = method.param_type(i).ok_or_else(|| {
            EngineError::resolution(format!("{} takes no argument at position {}", method, i))
        })?;
        args.push(coerce(&format!("{}{}", cast, code), inferred.as_ref(), param, role));
    }

    if let Some(cast) = pending {
        ctx.put_pre_cast(cast);
    }
    Ok(args.join(", "))
}
