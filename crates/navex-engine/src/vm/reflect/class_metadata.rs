//! Class metadata for the object model
//!
//! Stores fields, methods and inheritance edges of each registered type. The
//! resolver, the invoker and the compiler all read from the same registry.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use navex_types::{Type, TypeHierarchy};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::HandlerError;
use crate::vm::value::Value;

/// Native implementation of a method: `(receiver, args) -> result`
///
/// Static methods receive `Value::Null` as the receiver.
pub type MethodHandler = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, HandlerError> + Send + Sync>;

/// A resolved method
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Declared parameter types; for a variadic method the last one is an array
    pub params: Vec<Type>,
    /// Declared return type (`Type::Void` for commands)
    pub return_type: Type,
    /// Type that declares the method
    pub declaring: Type,
    /// Whether the last parameter collects the trailing arguments
    pub variadic: bool,
    /// Whether the method is called without a receiver
    pub is_static: bool,
    handler: MethodHandler,
}

impl MethodDescriptor {
    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether a call with `count` arguments can target this method
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.variadic {
            count + 1 >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Declared type receiving argument `index`
    ///
    /// Trailing arguments of a variadic call map to the element type of the
    /// last parameter.
    pub fn param_type(&self, index: usize) -> Option<&Type> {
        if self.variadic && index + 1 >= self.params.len() {
            let last = self.params.last()?;
            return last.element().or(Some(last));
        }
        self.params.get(index)
    }

    /// Whether both methods have the same name and parameter list
    pub fn same_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Run the native handler with already adapted arguments
    pub fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value, HandlerError> {
        (self.handler)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("declaring", &self.declaring)
            .field("variadic", &self.variadic)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}(", self.return_type, self.declaring, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i + 1 == self.params.len() {
                write!(f, "{}...", param.element().unwrap_or(param))?;
            } else {
                write!(f, "{}", param)?;
            }
        }
        f.write_str(")")
    }
}

/// Builder for a method declaration
pub struct MethodDef {
    name: String,
    params: Vec<Type>,
    return_type: Type,
    variadic: bool,
    is_static: bool,
    handler: MethodHandler,
}

impl MethodDef {
    /// Start a declaration; the method takes no parameters and returns void
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            return_type: Type::Void,
            variadic: false,
            is_static: false,
            handler: Arc::new(handler),
        }
    }

    /// Set the parameter types
    pub fn params(mut self, params: impl IntoIterator<Item = Type>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Set the return type
    pub fn returns(mut self, ty: Type) -> Self {
        self.return_type = ty;
        self
    }

    /// Mark the last parameter as variadic (it must be an array type)
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Mark the method as static
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: Type,
}

/// Metadata for a single class or interface
#[derive(Debug)]
pub struct ClassMetadata {
    ty: Type,
    public: bool,
    superclass: Option<Type>,
    interfaces: Vec<Type>,
    /// Field declarations in order
    fields: Vec<FieldInfo>,
    /// Field name to index mapping
    field_indices: FxHashMap<String, usize>,
    /// Method declarations in order
    methods: Vec<Arc<MethodDescriptor>>,
    /// Method name to indices of its overloads
    method_indices: FxHashMap<String, Vec<usize>>,
}

impl ClassMetadata {
    /// Create new public metadata for a type
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            public: true,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            field_indices: FxHashMap::default(),
            methods: Vec::new(),
            method_indices: FxHashMap::default(),
        }
    }

    /// Create new public metadata for a named class
    pub fn class(name: &str) -> Self {
        Self::new(Type::class(name))
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: Type) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Hide the type from emitted source
    pub fn non_public(mut self) -> Self {
        self.public = false;
        self
    }

    /// Add a field
    pub fn add_field(&mut self, name: &str, ty: Type) {
        self.field_indices.insert(name.to_string(), self.fields.len());
        self.fields.push(FieldInfo {
            name: name.to_string(),
            ty,
        });
    }

    /// Add a method declared by this type
    pub fn add_method(&mut self, def: MethodDef) -> Arc<MethodDescriptor> {
        let method = Arc::new(MethodDescriptor {
            name: def.name,
            params: def.params,
            return_type: def.return_type,
            declaring: self.ty.clone(),
            variadic: def.variadic,
            is_static: def.is_static,
            handler: def.handler,
        });
        self.method_indices
            .entry(method.name.clone())
            .or_default()
            .push(self.methods.len());
        self.methods.push(method.clone());
        method
    }

    /// Builder-style `add_field`
    pub fn with_field(mut self, name: &str, ty: Type) -> Self {
        self.add_field(name, ty);
        self
    }

    /// Builder-style `add_method`
    pub fn with_method(mut self, def: MethodDef) -> Self {
        self.add_method(def);
        self
    }

    /// The described type
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Whether the type may be named in emitted source
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Superclass, if any
    pub fn superclass(&self) -> Option<&Type> {
        self.superclass.as_ref()
    }

    /// Implemented interfaces
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// All declared methods
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    /// Declared overloads of a name
    pub fn methods_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Arc<MethodDescriptor>> + 'a {
        self.method_indices
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.methods[idx])
    }

    /// Field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.field_indices.get(name).map(|&idx| &self.fields[idx])
    }

    /// Whether this type declares a method with the same signature
    pub fn declares(&self, method: &MethodDescriptor) -> bool {
        self.methods_named(&method.name).any(|m| m.same_signature(method))
    }
}

/// Registry of class metadata
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: FxHashMap<Type, ClassMetadata>,
}

impl ClassRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata, replacing any previous entry for the same type
    pub fn register(&mut self, metadata: ClassMetadata) {
        self.classes.insert(metadata.ty.clone(), metadata);
    }

    /// Get metadata for a type
    pub fn get(&self, ty: &Type) -> Option<&ClassMetadata> {
        self.classes.get(ty)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The type followed by its registered ancestors, breadth first
    ///
    /// Superclasses come before interfaces at each level; each type appears once.
    pub fn lineage(&self, ty: &Type) -> Vec<&ClassMetadata> {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([ty.clone()]);
        let mut out = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(meta) = self.classes.get(&next) {
                queue.extend(meta.superclass.iter().cloned());
                queue.extend(meta.interfaces.iter().cloned());
                out.push(meta);
            }
        }
        out
    }

    /// Find a field on the type or its ancestors
    pub fn find_field(&self, ty: &Type, name: &str) -> Option<&FieldInfo> {
        self.lineage(ty).into_iter().find_map(|meta| meta.field(name))
    }

    /// Most general public ancestor that declares the method, else its declaring type
    ///
    /// Interfaces are searched before the superclass, and ancestors further up
    /// win over nearer ones.
    pub fn visible_declaring_type(&self, method: &MethodDescriptor) -> Type {
        let mut seen = FxHashSet::default();
        self.visible_ancestor(method, &method.declaring, &mut seen)
            .unwrap_or_else(|| method.declaring.clone())
    }

    fn visible_ancestor(
        &self,
        method: &MethodDescriptor,
        ty: &Type,
        seen: &mut FxHashSet<Type>,
    ) -> Option<Type> {
        if !seen.insert(ty.clone()) {
            return None;
        }
        let meta = self.classes.get(ty)?;
        for parent in meta.interfaces.iter().chain(meta.superclass.iter()) {
            if let Some(found) = self.visible_ancestor(method, parent, seen) {
                return Some(found);
            }
            if let Some(parent_meta) = self.classes.get(parent) {
                if parent_meta.public && parent_meta.declares(method) {
                    return Some(parent.clone());
                }
            }
        }
        None
    }
}

impl TypeHierarchy for ClassRegistry {
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        match self.classes.get(ty) {
            Some(meta) => meta
                .superclass
                .iter()
                .chain(meta.interfaces.iter())
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}
