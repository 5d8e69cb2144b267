//! Method resolution
//!
//! Resolves an operation by receiver type, name and argument shape. The
//! compiler only knows how many arguments a call has, the interpreter knows
//! their values; [`ArgShapes`] covers both.

use std::sync::Arc;

use navex_types::{Compatibility, SubtypingContext, Type};

use crate::vm::reflect::{ClassRegistry, MethodDescriptor};
use crate::vm::value::Value;

/// What is known about the arguments of a call
#[derive(Debug, Clone, Copy)]
pub enum ArgShapes<'a> {
    /// Only the argument count (compilation)
    Arity(usize),
    /// The evaluated arguments (interpretation)
    Values(&'a [Value]),
}

impl ArgShapes<'_> {
    /// Number of arguments
    pub fn len(&self) -> usize {
        match self {
            ArgShapes::Arity(n) => *n,
            ArgShapes::Values(values) => values.len(),
        }
    }

    /// Whether the call has no arguments
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves operations on the object model
pub trait MethodResolver: Send + Sync {
    /// Best instance method named `name` callable with `args` on `receiver`
    ///
    /// `for_write` breaks ties between otherwise equal overloads in favour of
    /// void-returning candidates; value-returning ones win when it is false.
    fn find_operation(
        &self,
        receiver: &Type,
        name: &str,
        args: ArgShapes<'_>,
        for_write: bool,
    ) -> Option<Arc<MethodDescriptor>>;

    /// Get-accessor for `name` (`name`, `getName`, `isName`, `hasName`) taking `arity` arguments
    fn find_read_accessor(&self, ty: &Type, name: &str, arity: usize) -> Option<Arc<MethodDescriptor>>;

    /// Set-accessor for `name` (`name`, `setName`) taking `arity` arguments
    fn find_write_accessor(&self, ty: &Type, name: &str, arity: usize) -> Option<Arc<MethodDescriptor>>;

    /// Best static method named `name` on `class`
    fn find_static(&self, class: &Type, name: &str, args: ArgShapes<'_>) -> Option<Arc<MethodDescriptor>>;
}

/// Which accessor convention satisfied a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// Get-accessor
    Read,
    /// Set-accessor; the call can only be compiled in the write role
    Write,
}

/// Outcome of a compile-time lookup
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Exact operation match
    Found(Arc<MethodDescriptor>),
    /// Matched through an accessor naming convention
    UsesAccessor {
        /// Convention that matched
        kind: AccessorKind,
        /// The accessor
        method: Arc<MethodDescriptor>,
    },
    /// Nothing matched
    NotFound,
}

impl Resolution {
    /// Resolve a call for the value-production role
    ///
    /// Tries, in order: an exact match on `lookup_type` (the inferred current
    /// type, or the receiver's runtime type), a get-accessor on the receiver
    /// type, then a set-accessor on the receiver type.
    pub fn for_read(
        resolver: &dyn MethodResolver,
        lookup_type: &Type,
        receiver_type: &Type,
        name: &str,
        arity: usize,
    ) -> Self {
        if let Some(method) = resolver.find_operation(lookup_type, name, ArgShapes::Arity(arity), false) {
            return Resolution::Found(method);
        }
        if let Some(method) = resolver.find_read_accessor(receiver_type, name, arity) {
            return Resolution::UsesAccessor {
                kind: AccessorKind::Read,
                method,
            };
        }
        if let Some(method) = resolver.find_write_accessor(receiver_type, name, arity) {
            return Resolution::UsesAccessor {
                kind: AccessorKind::Write,
                method,
            };
        }
        Resolution::NotFound
    }

    /// The resolved method, if any
    pub fn method(&self) -> Option<&Arc<MethodDescriptor>> {
        match self {
            Resolution::Found(method) | Resolution::UsesAccessor { method, .. } => Some(method),
            Resolution::NotFound => None,
        }
    }
}

/// Resolver backed by a [`ClassRegistry`]
pub struct RegistryResolver {
    registry: Arc<ClassRegistry>,
}

impl RegistryResolver {
    /// Create a resolver over a registry
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self { registry }
    }

    /// Overloads of `name` visible on `ty`, nearest declaration first
    fn candidates<'a>(&'a self, ty: &Type, name: &'a str) -> impl Iterator<Item = &'a Arc<MethodDescriptor>> + 'a {
        self.registry
            .lineage(ty)
            .into_iter()
            .flat_map(move |meta| meta.methods_named(name))
    }

    /// Pick the best overload; the first of equally ranked candidates wins
    fn best<'a>(
        &self,
        candidates: impl Iterator<Item = &'a Arc<MethodDescriptor>>,
        args: ArgShapes<'_>,
        for_write: bool,
    ) -> Option<Arc<MethodDescriptor>> {
        let subtyping = SubtypingContext::new(&*self.registry);
        let mut best: Option<(&Arc<MethodDescriptor>, (bool, u32, bool))> = None;
        for method in candidates {
            if !method.accepts_arity(args.len()) {
                continue;
            }
            let Some(score) = score(&subtyping, method, args) else {
                continue;
            };
            let key = (!method.variadic, score, method.return_type.is_void() == for_write);
            if best.as_ref().map_or(true, |(_, best_key)| key > *best_key) {
                best = Some((method, key));
            }
        }
        best.map(|(method, _)| method.clone())
    }

    fn find_accessor(
        &self,
        ty: &Type,
        arity: usize,
        matches: impl Fn(&str) -> bool,
    ) -> Option<Arc<MethodDescriptor>> {
        self.registry
            .lineage(ty)
            .into_iter()
            .flat_map(|meta| meta.methods().iter())
            .find(|m| !m.is_static && m.accepts_arity(arity) && matches(&m.name))
            .cloned()
    }
}

/// Sum of argument compatibility grades; `None` when an argument cannot be passed
fn score(subtyping: &SubtypingContext<'_>, method: &MethodDescriptor, args: ArgShapes<'_>) -> Option<u32> {
    let ArgShapes::Values(values) = args else {
        return Some(0);
    };
    let mut total = 0;
    for (i, value) in values.iter().enumerate() {
        let param = method.param_type(i)?;
        let grade = subtyping.compatibility(value.runtime_type().as_ref(), param);
        if grade == Compatibility::Incompatible {
            return None;
        }
        total += grade as u32;
    }
    Some(total)
}

fn prefixed(candidate: &str, prefix: &str, name: &str) -> bool {
    if candidate.len() != prefix.len() + name.len() {
        return false;
    }
    match (candidate.get(..prefix.len()), candidate.get(prefix.len()..)) {
        (Some(head), Some(rest)) => head.eq_ignore_ascii_case(prefix) && rest.eq_ignore_ascii_case(name),
        _ => false,
    }
}

fn is_read_accessor_name(candidate: &str, name: &str) -> bool {
    let matched = candidate.eq_ignore_ascii_case(name)
        || ["get", "is", "has"].iter().any(|prefix| prefixed(candidate, prefix, name));
    matched && !candidate.starts_with("set")
}

fn is_write_accessor_name(candidate: &str, name: &str) -> bool {
    let matched = candidate.eq_ignore_ascii_case(name) || prefixed(candidate, "set", name);
    matched && !candidate.starts_with("get")
}

impl MethodResolver for RegistryResolver {
    fn find_operation(
        &self,
        receiver: &Type,
        name: &str,
        args: ArgShapes<'_>,
        for_write: bool,
    ) -> Option<Arc<MethodDescriptor>> {
        let found = self.best(
            self.candidates(receiver, name).filter(|m| !m.is_static),
            args,
            for_write,
        );
        tracing::debug!(%receiver, name, arity = args.len(), found = found.is_some(), "find_operation");
        found
    }

    fn find_read_accessor(&self, ty: &Type, name: &str, arity: usize) -> Option<Arc<MethodDescriptor>> {
        self.find_accessor(ty, arity, |candidate| is_read_accessor_name(candidate, name))
    }

    fn find_write_accessor(&self, ty: &Type, name: &str, arity: usize) -> Option<Arc<MethodDescriptor>> {
        self.find_accessor(ty, arity, |candidate| is_write_accessor_name(candidate, name))
    }

    fn find_static(&self, class: &Type, name: &str, args: ArgShapes<'_>) -> Option<Arc<MethodDescriptor>> {
        self.best(
            self.candidates(class, name).filter(|m| m.is_static),
            args,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::vm::reflect::{ClassMetadata, MethodDef};
    use navex_types::PrimitiveType;

    fn noop(_: &Value, _: &[Value]) -> Result<Value, HandlerError> {
        Ok(Value::Null)
    }

    fn resolver() -> RegistryResolver {
        let int = Type::Primitive(PrimitiveType::Int);
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassMetadata::class("Point")
                .with_method(MethodDef::new("getX", noop).returns(int.clone()))
                .with_method(MethodDef::new("setX", noop).params([int.clone()]))
                .with_method(MethodDef::new("isVisible", noop).returns(Type::Primitive(PrimitiveType::Boolean)))
                .with_method(MethodDef::new("scale", noop).params([int.clone()]).returns(Type::class("Point")))
                .with_method(MethodDef::new("scale", noop).params([Type::String]).returns(Type::class("Point")))
                .with_method(MethodDef::new("touch", noop).returns(int.clone()))
                .with_method(MethodDef::new("touch", noop))
                .with_method(MethodDef::new("origin", noop).returns(Type::class("Point")).static_method()),
        );
        RegistryResolver::new(Arc::new(registry))
    }

    #[test]
    fn test_accessor_conventions() {
        let r = resolver();
        let point = Type::class("Point");
        assert_eq!(r.find_read_accessor(&point, "x", 0).unwrap().name, "getX");
        assert_eq!(r.find_read_accessor(&point, "visible", 0).unwrap().name, "isVisible");
        assert!(r.find_read_accessor(&point, "x", 1).is_none());
        assert_eq!(r.find_write_accessor(&point, "x", 1).unwrap().name, "setX");
        assert!(r.find_write_accessor(&point, "x", 0).is_none());
    }

    #[test]
    fn test_accessor_lookup_with_non_ascii_names() {
        let mut registry = ClassRegistry::new();
        registry.register(
            ClassMetadata::class("Glyph")
                .with_method(MethodDef::new("aé", noop).returns(Type::String))
                .with_method(MethodDef::new("aaé", noop).params([Type::String]))
                .with_method(MethodDef::new("getÉtat", noop).returns(Type::String))
                .with_method(MethodDef::new("getX", noop).returns(Type::String)),
        );
        let r = RegistryResolver::new(Arc::new(registry));
        let glyph = Type::class("Glyph");

        assert_eq!(r.find_read_accessor(&glyph, "x", 0).unwrap().name, "getX");
        assert!(r.find_write_accessor(&glyph, "x", 1).is_none());
        assert_eq!(r.find_read_accessor(&glyph, "État", 0).unwrap().name, "getÉtat");
        assert_eq!(r.find_read_accessor(&glyph, "aé", 0).unwrap().name, "aé");
    }

    #[test]
    fn test_overload_by_value() {
        let r = resolver();
        let point = Type::class("Point");
        let by_int = r
            .find_operation(&point, "scale", ArgShapes::Values(&[Value::Int(2)]), false)
            .unwrap();
        assert_eq!(by_int.params[0], Type::Primitive(PrimitiveType::Int));
        let by_str = r
            .find_operation(&point, "scale", ArgShapes::Values(&[Value::str("2")]), false)
            .unwrap();
        assert_eq!(by_str.params[0], Type::String);
    }

    #[test]
    fn test_for_write_tiebreak() {
        let r = resolver();
        let point = Type::class("Point");
        let read = r.find_operation(&point, "touch", ArgShapes::Arity(0), false).unwrap();
        assert!(!read.return_type.is_void());
        let write = r.find_operation(&point, "touch", ArgShapes::Arity(0), true).unwrap();
        assert!(write.return_type.is_void());
    }

    #[test]
    fn test_static_and_instance_are_separate() {
        let r = resolver();
        let point = Type::class("Point");
        assert!(r.find_operation(&point, "origin", ArgShapes::Arity(0), false).is_none());
        assert!(r.find_static(&point, "origin", ArgShapes::Arity(0)).is_some());
    }

    #[test]
    fn test_resolution_order() {
        let r = resolver();
        let point = Type::class("Point");
        assert!(matches!(
            Resolution::for_read(&r, &point, &point, "scale", 1),
            Resolution::Found(_)
        ));
        assert!(matches!(
            Resolution::for_read(&r, &point, &point, "x", 0),
            Resolution::UsesAccessor { kind: AccessorKind::Read, .. }
        ));
        assert!(matches!(
            Resolution::for_read(&r, &point, &point, "x", 1),
            Resolution::UsesAccessor { kind: AccessorKind::Write, .. }
        ));
        assert!(matches!(
            Resolution::for_read(&r, &point, &point, "missing", 0),
            Resolution::NotFound
        ));
    }
}
