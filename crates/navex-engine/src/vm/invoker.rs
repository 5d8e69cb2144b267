//! Method invocation
//!
//! The invoker resolves an operation against the evaluated arguments, adapts
//! them to the declared parameter types and runs the native handler.

use std::sync::Arc;

use navex_types::Type;

use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::convert::convert_value;
use crate::vm::reflect::MethodDescriptor;
use crate::vm::resolver::ArgShapes;
use crate::vm::value::Value;

/// Runs operations for the interpreter
pub trait Invoker: Send + Sync {
    /// Call the instance operation `name` on `receiver`
    fn invoke(&self, ctx: &EvalContext<'_>, receiver: &Value, name: &str, args: &[Value]) -> EngineResult<Value>;

    /// Call the static operation `name` on `class`
    fn invoke_static(&self, ctx: &EvalContext<'_>, class: &Type, name: &str, args: &[Value]) -> EngineResult<Value>;
}

/// Invoker that resolves through the runtime's [`MethodResolver`](crate::vm::MethodResolver)
///
/// Instance calls fall back to a get-accessor, then a set-accessor, named
/// after the operation, the same order the compiler resolves in.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReflectiveInvoker;

impl Invoker for ReflectiveInvoker {
    fn invoke(&self, ctx: &EvalContext<'_>, receiver: &Value, name: &str, args: &[Value]) -> EngineResult<Value> {
        let Some(ty) = receiver.runtime_type() else {
            return Err(EngineError::resolution(format!(
                "method \"{}\" called on a null receiver",
                name
            )));
        };
        let resolver = ctx.runtime().resolver();
        let method = resolver
            .find_operation(&ty, name, ArgShapes::Values(args), false)
            .or_else(|| resolver.find_read_accessor(&ty, name, args.len()))
            .or_else(|| resolver.find_write_accessor(&ty, name, args.len()))
            .ok_or_else(|| no_such_method(&ty, name, args.len()))?;
        call(&method, receiver, args)
    }

    fn invoke_static(&self, ctx: &EvalContext<'_>, class: &Type, name: &str, args: &[Value]) -> EngineResult<Value> {
        let method = ctx
            .runtime()
            .resolver()
            .find_static(class, name, ArgShapes::Values(args))
            .ok_or_else(|| no_such_method(class, name, args.len()))?;
        call(&method, &Value::Null, args)
    }
}

fn no_such_method(ty: &Type, name: &str, arity: usize) -> EngineError {
    EngineError::resolution(format!(
        "no method \"{}\" on {} accepting {} argument(s)",
        name, ty, arity
    ))
}

/// Adapt `args` to the method's parameters and run its handler
///
/// Trailing arguments of a variadic method are packed into one array.
pub fn call(method: &Arc<MethodDescriptor>, receiver: &Value, args: &[Value]) -> EngineResult<Value> {
    let adapted = adapt_arguments(method, args)?;
    method
        .invoke(receiver, &adapted)
        .map_err(|source| EngineError::invocation(&method.name, source))
}

fn adapt_arguments(method: &MethodDescriptor, args: &[Value]) -> EngineResult<Vec<Value>> {
    let fixed = if method.variadic {
        method.arity().saturating_sub(1)
    } else {
        args.len()
    };
    let mut adapted = Vec::with_capacity(method.arity());
    for (value, param) in args.iter().zip(&method.params).take(fixed) {
        adapted.push(convert_value(value, param).map_err(|e| EngineError::invocation(&method.name, e))?);
    }
    if method.variadic {
        if let Some(rest) = method.params.last() {
            let packed = Value::array(args.iter().skip(fixed).cloned());
            adapted.push(convert_value(&packed, rest).map_err(|e| EngineError::invocation(&method.name, e))?);
        }
    }
    Ok(adapted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::vm::reflect::{ClassMetadata, MethodDef};
    use navex_types::PrimitiveType;

    fn join() -> Arc<MethodDescriptor> {
        let mut meta = ClassMetadata::class("Text");
        meta.add_method(
            MethodDef::new("join", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                let sep = args[0].to_string();
                let Value::Array(parts) = &args[1] else {
                    return Err("expected an array".into());
                };
                let parts: Vec<String> = parts.iter().map(Value::to_string).collect();
                Ok(Value::str(parts.join(&sep)))
            })
            .params([Type::String, Type::array(Type::String)])
            .returns(Type::String)
            .variadic(),
        )
    }

    #[test]
    fn test_variadic_packing() {
        let method = join();
        let result = call(
            &method,
            &Value::Null,
            &[Value::str("-"), Value::Int(1), Value::str("b")],
        )
        .unwrap();
        assert_eq!(result, Value::str("1-b"));
    }

    #[test]
    fn test_arguments_are_converted() {
        let mut meta = ClassMetadata::class("Calc");
        let half = meta.add_method(
            MethodDef::new("half", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                match args[0] {
                    Value::Long(v) => Ok(Value::Long(v / 2)),
                    _ => Err("expected long".into()),
                }
            })
            .params([Type::Primitive(PrimitiveType::Long)])
            .returns(Type::Primitive(PrimitiveType::Long)),
        );
        assert_eq!(call(&half, &Value::Null, &[Value::Int(9)]).unwrap(), Value::Long(4));
    }

    #[test]
    fn test_handler_error_is_wrapped() {
        let mut meta = ClassMetadata::class("Calc");
        let fail = meta.add_method(MethodDef::new("fail", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> {
            Err("boom".into())
        }));
        let err = call(&fail, &Value::Null, &[]).unwrap_err();
        assert!(err.is_invocation());
        assert_eq!(err.to_string(), "Invocation of 'fail' failed: boom");
    }
}
