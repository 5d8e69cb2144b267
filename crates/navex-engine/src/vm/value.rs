//! Runtime values and objects
//!
//! Values are cheap to clone: scalars are stored inline, text, arrays and
//! objects are reference counted. Objects keep their fields behind a
//! `parking_lot::RwLock` so a graph can be read and mutated from several
//! evaluating threads.

use std::fmt;
use std::sync::Arc;

use navex_types::{PrimitiveType, Type};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Shared handle to a heap object
pub type ObjectRef = Arc<Object>;

/// A runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// `boolean`
    Bool(bool),
    /// `char`
    Char(char),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// Immutable text
    Str(Arc<str>),
    /// Immutable array
    Array(Arc<[Value]>),
    /// Object instance
    Object(ObjectRef),
}

impl Value {
    /// Create a string value
    pub fn str(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Wrap an object
    pub fn object(object: Object) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Create an array value
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Check if this value is null
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of the value; `None` for null
    ///
    /// Scalars report their boxed type, the way they are seen through the
    /// object model.
    pub fn runtime_type(&self) -> Option<Type> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => Type::Boxed(PrimitiveType::Boolean),
            Value::Char(_) => Type::Boxed(PrimitiveType::Char),
            Value::Byte(_) => Type::Boxed(PrimitiveType::Byte),
            Value::Short(_) => Type::Boxed(PrimitiveType::Short),
            Value::Int(_) => Type::Boxed(PrimitiveType::Int),
            Value::Long(_) => Type::Boxed(PrimitiveType::Long),
            Value::Float(_) => Type::Boxed(PrimitiveType::Float),
            Value::Double(_) => Type::Boxed(PrimitiveType::Double),
            Value::Str(_) => Type::String,
            Value::Array(items) => {
                let element = items
                    .iter()
                    .find_map(Value::runtime_type)
                    .unwrap_or(Type::Object);
                Type::array(element)
            }
            Value::Object(obj) => obj.class().clone(),
        };
        Some(ty)
    }

    /// Integral view of a numeric or char value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Char(c) => Some(*c as i64),
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            Value::Double(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Floating point view of a numeric or char value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Object payload
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Truthiness used by logical tests: null, `false`, zero and empty text are false
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Char(c) => *c != '\0',
            Value::Str(s) => !s.is_empty(),
            Value::Float(_) | Value::Double(_) => self.as_f64().is_some_and(|v| v != 0.0),
            Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_) => {
                self.as_i64().is_some_and(|v| v != 0)
            }
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Byte(v) => write!(f, "{}b", v),
            Value::Short(v) => write!(f, "{}s", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}L", v),
            Value::Float(v) => write!(f, "{:?}f", v),
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Char(c) => write!(f, "{}", c),
            Value::Object(obj) => write!(f, "{}@{:p}", obj.class(), Arc::as_ptr(obj)),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::object(obj)
    }
}

/// Object instance
pub struct Object {
    class: Type,
    fields: RwLock<FxHashMap<String, Value>>,
}

impl Object {
    /// Create an object of the named class with no fields set
    pub fn new(class: &str) -> Self {
        Self {
            class: Type::class(class),
            fields: RwLock::new(FxHashMap::default()),
        }
    }

    /// Builder-style field initialisation
    pub fn with_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.write().insert(name.to_string(), value.into());
        self
    }

    /// Class of this object
    pub fn class(&self) -> &Type {
        &self.class
    }

    /// Get a field value by name
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    /// Set a field value, returning the previous one
    pub fn set_field(&self, name: &str, value: Value) -> Option<Value> {
        self.fields.write().insert(name.to_string(), value)
    }

    /// Whether the field is present
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.read().contains_key(name)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.read();
        let mut names: Vec<_> = fields.keys().collect();
        names.sort();
        let mut s = f.debug_struct(&self.class.to_string());
        for name in names {
            s.field(name, &fields[name]);
        }
        s.finish()
    }
}
