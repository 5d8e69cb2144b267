//! Shared fixtures for the navex-engine integration tests
//!
//! The object model:
//! - `Computer` (public interface): `int compute(int, int)`
//! - `Calc` (public class, implements `Computer`): arithmetic, text helpers,
//!   a variadic `format`, a null-returning `find`, a failing `divide`, and
//!   the accessors `getName`, `isReady`, `getPeer`, `setTags(String...)`
//! - `Sink`: `void compute(int, int)`, `void reset()`
//! - `Writer`: `void setLevel(int)` only
//! - `Counter`: `int setCount(int)`, `boolean isArmed()`

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use navex_engine::{ClassMetadata, ClassRegistry, EngineConfig, HandlerError, MethodDef, Object, Runtime, Value};
use navex_types::{PrimitiveType, Type};

pub fn int() -> Type {
    Type::Primitive(PrimitiveType::Int)
}

pub fn boolean() -> Type {
    Type::Primitive(PrimitiveType::Boolean)
}

fn arg_i64(args: &[Value], i: usize) -> Result<i64, HandlerError> {
    args.get(i)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("argument {} is not a number", i).into())
}

/// Counts calls into the `compute` handlers
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn registry(calls: &Calls) -> ClassRegistry {
    let mut registry = ClassRegistry::new();

    registry.register(ClassMetadata::class("Computer").with_method(
        MethodDef::new("compute", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> {
            Err("abstract operation".into())
        })
        .params([int(), int()])
        .returns(int()),
    ));

    let counted = calls.clone();
    registry.register(
        ClassMetadata::class("Calc")
            .implements(Type::class("Computer"))
            .with_field("name", Type::String)
            .with_method(
                MethodDef::new("compute", move |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    counted.hit();
                    Ok(Value::Int((arg_i64(args, 0)? + arg_i64(args, 1)?) as i32))
                })
                .params([int(), int()])
                .returns(int()),
            )
            .with_method(
                MethodDef::new("concat", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::str(format!("{}{}", args[0], args[1])))
                })
                .params([Type::String, Type::String])
                .returns(Type::String),
            )
            .with_method(
                MethodDef::new("describe", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::str(format!("{:?}", args[0])))
                })
                .params([Type::class("Calc")])
                .returns(Type::String),
            )
            .with_method(
                MethodDef::new("divide", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    let divisor = arg_i64(args, 1)?;
                    if divisor == 0 {
                        return Err("division by zero".into());
                    }
                    Ok(Value::Int((arg_i64(args, 0)? / divisor) as i32))
                })
                .params([int(), int()])
                .returns(int()),
            )
            .with_method(
                MethodDef::new("format", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::str(format!("{}{}", args[0], args[1])))
                })
                .params([Type::String, Type::array(Type::Object)])
                .returns(Type::String)
                .variadic(),
            )
            .with_method(
                MethodDef::new("find", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> { Ok(Value::Null) })
                    .params([Type::String])
                    .returns(Type::String),
            )
            .with_method(
                MethodDef::new("reset", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> { Ok(Value::Null) })
                    .returns(Type::Void),
            )
            .with_method(
                MethodDef::new("getName", |this: &Value, _: &[Value]| -> Result<Value, HandlerError> {
                    Ok(this.as_object().and_then(|o| o.get_field("name")).unwrap_or_default())
                })
                .returns(Type::String),
            )
            .with_method(
                MethodDef::new("isReady", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::Bool(true))
                })
                .returns(boolean()),
            )
            .with_method(
                MethodDef::new("getPeer", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::object(Object::new("Calc").with_field("name", "peer")))
                })
                .returns(Type::Object),
            )
            .with_method(
                MethodDef::new("setTags", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> { Ok(Value::Null) })
                    .params([Type::array(Type::String)])
                    .returns(Type::Void)
                    .variadic(),
            )
            .with_method(
                MethodDef::new("max", |_: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::Int(arg_i64(args, 0)?.max(arg_i64(args, 1)?) as i32))
                })
                .params([int(), int()])
                .returns(int())
                .static_method(),
            ),
    );

    let counted = calls.clone();
    registry.register(
        ClassMetadata::class("Sink")
            .with_method(
                MethodDef::new("compute", move |this: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    counted.hit();
                    if let Some(obj) = this.as_object() {
                        obj.set_field("last", Value::Long(arg_i64(args, 0)? + arg_i64(args, 1)?));
                    }
                    Ok(Value::Null)
                })
                .params([int(), int()])
                .returns(Type::Void),
            )
            .with_method(
                MethodDef::new("reset", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> { Ok(Value::Null) })
                    .returns(Type::Void),
            ),
    );

    registry.register(ClassMetadata::class("Writer").with_method(
        MethodDef::new("setLevel", |this: &Value, args: &[Value]| -> Result<Value, HandlerError> {
            if let Some(obj) = this.as_object() {
                obj.set_field("level", args[0].clone());
            }
            Ok(Value::Null)
        })
        .params([int()])
        .returns(Type::Void),
    ));

    registry.register(
        ClassMetadata::class("Counter")
            .with_method(
                MethodDef::new("setCount", |this: &Value, args: &[Value]| -> Result<Value, HandlerError> {
                    let previous = this
                        .as_object()
                        .and_then(|o| o.set_field("count", args[0].clone()))
                        .unwrap_or(Value::Int(0));
                    Ok(previous)
                })
                .params([int()])
                .returns(int()),
            )
            .with_method(
                MethodDef::new("isArmed", |_: &Value, _: &[Value]| -> Result<Value, HandlerError> {
                    Ok(Value::Bool(false))
                })
                .returns(boolean()),
            ),
    );

    registry
}

pub fn runtime(calls: &Calls) -> Runtime {
    Runtime::new(registry(calls))
}

pub fn runtime_with(calls: &Calls, config: EngineConfig) -> Runtime {
    Runtime::with_config(registry(calls), config)
}

pub fn calc() -> Value {
    Value::object(Object::new("Calc").with_field("name", "calc"))
}

pub fn sink() -> Value {
    Value::object(Object::new("Sink"))
}

pub fn writer() -> Value {
    Value::object(Object::new("Writer"))
}

pub fn counter() -> Value {
    Value::object(Object::new("Counter"))
}
