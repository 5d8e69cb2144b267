//! Instance method call node
//!
//! Interpreted, a call resolves and invokes the named operation on the source
//! object. Compiled, it emits a call suffix (`.name(args)`) in either the
//! value-production or the value-acceptance role.

use navex_types::Type;

use crate::compiler::sampling::sample;
use crate::compiler::{CompilationContext, CompiledFragment, Role, Wrapper};
use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::reflect::MethodDescriptor;
use crate::vm::resolver::{AccessorKind, Resolution};
use crate::vm::value::Value;

use super::{arguments, Node, NodeKind};

/// Payload of a method call node; the arguments are the node's children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    name: String,
}

impl MethodCall {
    /// Call of the operation `name`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Operation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the operation on `source` with the children evaluated against the root
    ///
    /// A null result is handed to the null policy of the source's type.
    pub fn evaluate(&self, node: Node<'_>, ctx: &EvalContext<'_>, source: &Value) -> EngineResult<Value> {
        let runtime = ctx.runtime();
        let mut args = runtime.pool().checkout(node.child_count());
        for (slot, child) in args.iter_mut().zip(node.children()) {
            *slot = child.evaluate(ctx, ctx.root())?;
        }

        let result = runtime.invoker().invoke(ctx, source, &self.name, &args)?;
        if !result.is_null() {
            return Ok(result);
        }
        match source.runtime_type() {
            Some(ty) => Ok(runtime.null_policy(&ty).on_absence(ctx, source, &self.name, &args)),
            None => Ok(result),
        }
    }

    /// Compile in the value-production role
    ///
    /// Sets `current_object` to the sampled result, `current_type` to the
    /// return type and `current_accessor` to the nearest visible type
    /// declaring the operation.
    pub fn compile_read(
        &self,
        node: Node<'_>,
        ctx: &mut CompilationContext<'_>,
        target: &Value,
    ) -> EngineResult<CompiledFragment> {
        let Some(receiver_type) = target.runtime_type() else {
            return Err(EngineError::resolution(format!(
                "target of method \"{}\" is null",
                self.name
            )));
        };
        let lookup_type = ctx.current_type.clone().unwrap_or_else(|| receiver_type.clone());
        let resolution = Resolution::for_read(
            ctx.runtime().resolver(),
            &lookup_type,
            &receiver_type,
            &self.name,
            node.child_count(),
        );
        tracing::debug!(name = %self.name, %lookup_type, ?resolution, "resolved read target");

        let method = match resolution {
            Resolution::Found(method) => method,
            Resolution::UsesAccessor {
                kind: AccessorKind::Read,
                method,
            } => method,
            Resolution::UsesAccessor {
                kind: AccessorKind::Write,
                ..
            } => {
                let fragment = self.compile_write(node, ctx, target)?;
                if fragment.is_blank() {
                    return Err(EngineError::unsupported("can't find suitable getter method"));
                }
                return Ok(fragment.terminated());
            }
            Resolution::NotFound => return Ok(CompiledFragment::empty()),
        };
        reject_variadic(&method)?;

        let args = arguments::emit(node, &method, ctx, Role::Read)?;
        let code = format!(".{}({})", method.name, args);

        sample(ctx, node, &method, Role::Read, |eval| self.evaluate(node, eval, target))?;
        finish(ctx, &method);

        let fragment = CompiledFragment::expression(code, Some(method.return_type.clone()));
        if method.return_type.is_void() {
            return Ok(fragment.into_statement());
        }
        Ok(fragment)
    }

    /// Compile in the value-acceptance role
    ///
    /// Looks up a set-accessor on the current type, or the target's type when
    /// none is inferred. Sets the same context fields as
    /// [`compile_read`](Self::compile_read).
    pub fn compile_write(
        &self,
        node: Node<'_>,
        ctx: &mut CompilationContext<'_>,
        target: &Value,
    ) -> EngineResult<CompiledFragment> {
        let not_found = || {
            EngineError::resolution(format!(
                "unable to determine setter method generation for {}",
                self.name
            ))
        };
        let lookup_type = ctx
            .current_type
            .clone()
            .or_else(|| target.runtime_type())
            .ok_or_else(not_found)?;
        let method = ctx
            .runtime()
            .resolver()
            .find_write_accessor(&lookup_type, &self.name, node.child_count())
            .ok_or_else(not_found)?;
        tracing::debug!(name = %self.name, %lookup_type, method = %method, "resolved write target");

        let mut static_type = method.return_type.clone();
        let mut wrapper = None;
        if let Type::Primitive(p) = method.return_type {
            let under_test = node
                .parent()
                .is_some_and(|parent| matches!(parent.kind(), NodeKind::Test));
            if !under_test {
                wrapper = Some(Wrapper::boxed(p));
                static_type = Type::Boxed(p);
            }
        }
        reject_variadic(&method)?;

        let args = arguments::emit(node, &method, ctx, Role::Write)?;
        let code = format!(".{}({})", method.name, args);

        sample(ctx, node, &method, Role::Write, |eval| self.evaluate(node, eval, target))?;
        finish(ctx, &method);

        let mut fragment = CompiledFragment::expression(code, Some(static_type));
        fragment.wrapper = wrapper;
        Ok(fragment)
    }
}

fn reject_variadic(method: &MethodDescriptor) -> EngineResult<()> {
    if method.variadic {
        return Err(EngineError::unsupported(format!(
            "variadic method calls can't be compiled: {}",
            method
        )));
    }
    Ok(())
}

fn finish(ctx: &mut CompilationContext<'_>, method: &MethodDescriptor) {
    let accessor = ctx.runtime().registry().visible_declaring_type(method);
    ctx.set_current_type(Some(method.return_type.clone()));
    ctx.current_accessor = Some(accessor);
}
