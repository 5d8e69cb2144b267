//! Sample evaluation during compilation
//!
//! After a call fragment is assembled, the call is run once through the
//! interpreter against the concrete receiver so the next step compiles
//! against a real value. What happens when that run fails depends on the
//! role and on [`SamplingConfig`](crate::config::SamplingConfig).

use crate::ast::Node;
use crate::config::SampleFailure;
use crate::error::EngineResult;
use crate::vm::context::EvalContext;
use crate::vm::reflect::MethodDescriptor;
use crate::vm::value::Value;

use super::coerce::Role;
use super::context::CompilationContext;

/// Run the sample for `node` and store its result as the context's current object
///
/// A skipped sample leaves a null current object, so the skip only applies
/// when no chain step follows `node`.
pub fn sample<F>(
    ctx: &mut CompilationContext<'_>,
    node: Node<'_>,
    method: &MethodDescriptor,
    role: Role,
    run: F,
) -> EngineResult<()>
where
    F: FnOnce(&EvalContext<'_>) -> EngineResult<Value>,
{
    let policy = &ctx.runtime().config().sampling;
    let declared = &method.return_type;
    if policy.skip_when_declared && !node.has_next_step() && (declared.is_void() || declared.is_primitive()) {
        tracing::trace!(method = %method.name, "sample skipped, declared type is enough");
        ctx.current_object = Value::Null;
        return Ok(());
    }

    match run(ctx.eval()) {
        Ok(value) => {
            ctx.current_object = value;
            Ok(())
        }
        Err(err) => match policy.on_failure(role) {
            SampleFailure::Fatal => Err(err),
            SampleFailure::Advisory => {
                tracing::warn!(method = %method.name, ?role, %err, "sample evaluation failed");
                Ok(())
            }
        },
    }
}
