//! Property node: reads a get-accessor or a field, writes through a set-accessor

use navex_types::Type;

use crate::compiler::sampling::sample;
use crate::compiler::syntax::VALUE_PARAM;
use crate::compiler::{CompilationContext, CompiledFragment, Role};
use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::invoker::call;
use crate::vm::value::Value;

use super::Node;

fn null_source(name: &str) -> EngineError {
    EngineError::resolution(format!("source of property \"{}\" is null", name))
}

pub(super) fn evaluate(name: &str, ctx: &EvalContext<'_>, source: &Value) -> EngineResult<Value> {
    let ty = source.runtime_type().ok_or_else(|| null_source(name))?;
    let runtime = ctx.runtime();
    if let Some(getter) = runtime.resolver().find_read_accessor(&ty, name, 0) {
        return call(&getter, source, &[]);
    }
    if let Some(obj) = source.as_object() {
        if let Some(value) = obj.get_field(name) {
            return Ok(value);
        }
        if runtime.registry().find_field(&ty, name).is_some() {
            return Ok(Value::Null);
        }
    }
    Err(EngineError::resolution(format!("no property \"{}\" on {}", name, ty)))
}

pub(super) fn compile_read(
    node: Node<'_>,
    name: &str,
    ctx: &mut CompilationContext<'_>,
    target: &Value,
) -> EngineResult<CompiledFragment> {
    let ty = target.runtime_type().ok_or_else(|| null_source(name))?;
    let runtime = ctx.runtime();

    let (code, declared, accessor) = if let Some(getter) = runtime.resolver().find_read_accessor(&ty, name, 0) {
        sample(ctx, node, &getter, Role::Read, |_| call(&getter, target, &[]))?;
        let accessor = runtime.registry().visible_declaring_type(&getter);
        (format!(".{}()", getter.name), getter.return_type.clone(), accessor)
    } else if let Some(field) = runtime.registry().find_field(&ty, name) {
        ctx.current_object = evaluate(name, ctx.eval(), target)?;
        (format!(".{}", field.name), field.ty.clone(), ty.clone())
    } else {
        return Ok(CompiledFragment::empty());
    };

    // Narrow an Object-typed read to what the sample actually returned
    let mut static_type = declared;
    if static_type == Type::Object {
        if let Some(concrete) = ctx.current_object.runtime_type().filter(|t| *t != Type::Object) {
            if node.parent().is_some() {
                ctx.add_cast(&format!("({})", concrete));
            }
            static_type = concrete;
        }
    }

    ctx.set_current_type(Some(static_type.clone()));
    ctx.current_accessor = Some(accessor);
    Ok(CompiledFragment::expression(code, Some(static_type)))
}

pub(super) fn compile_write(
    name: &str,
    ctx: &mut CompilationContext<'_>,
    target: &Value,
) -> EngineResult<CompiledFragment> {
    let ty = target.runtime_type().ok_or_else(|| null_source(name))?;
    let runtime = ctx.runtime();
    let Some(setter) = runtime.resolver().find_write_accessor(&ty, name, 1) else {
        return Ok(CompiledFragment::empty());
    };
    let Some(param) = setter.params.first().cloned() else {
        return Ok(CompiledFragment::empty());
    };

    ctx.set_current_type(Some(param.clone()));
    ctx.current_accessor = Some(runtime.registry().visible_declaring_type(&setter));
    Ok(CompiledFragment::expression(
        format!(".{}({})", setter.name, VALUE_PARAM),
        Some(param),
    ))
}
