//! Core type definitions for the navex object model

use std::fmt;
use std::sync::Arc;

use crate::error::TypeError;

/// Primitive (unboxed) value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `char`
    Char,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl PrimitiveType {
    /// All primitive types, in widening order for the numeric ones
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Char,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    /// Name of the primitive in emitted source
    pub fn source_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char => "char",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Name of the boxed counterpart in emitted source
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Char => "Character",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
        }
    }

    /// Accessor that unwraps a boxed value of this primitive (`intValue()`, ...)
    pub fn value_getter(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "booleanValue()",
            PrimitiveType::Char => "charValue()",
            PrimitiveType::Byte => "byteValue()",
            PrimitiveType::Short => "shortValue()",
            PrimitiveType::Int => "intValue()",
            PrimitiveType::Long => "longValue()",
            PrimitiveType::Float => "floatValue()",
            PrimitiveType::Double => "doubleValue()",
        }
    }

    /// Whether this primitive participates in numeric conversion
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean | PrimitiveType::Char)
    }

    /// Whether this is a floating point primitive
    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Double)
    }

    /// Look up a primitive by its source name
    pub fn from_source_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.source_name() == name)
    }

    /// Look up a primitive by the source name of its boxed counterpart
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}

/// A static or runtime type
///
/// Runtime values always report a reference type (`Boxed`, `String`, `Class`,
/// ...); `Primitive` and `Void` only appear in declared signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value (result type of a command operation)
    Void,
    /// Unboxed primitive
    Primitive(PrimitiveType),
    /// Boxed primitive
    Boxed(PrimitiveType),
    /// Immutable text
    String,
    /// Top of the reference hierarchy
    Object,
    /// Named class or interface registered with the object model
    Class(Arc<str>),
    /// Array of an element type
    Array(Box<Type>),
}

impl Type {
    /// Create a class type
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Type::Class(name.into())
    }

    /// Create an array type
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// Parse a type from its source name (`int`, `Integer`, `String`, `Point[]`, ...)
    pub fn parse(name: &str) -> Result<Self, TypeError> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return Ok(Type::array(Type::parse(element)?));
        }
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '$');
        if !valid {
            return Err(TypeError::InvalidTypeName {
                name: name.to_string(),
            });
        }
        Ok(match name {
            "void" => Type::Void,
            "String" => Type::String,
            "Object" => Type::Object,
            other => {
                if let Some(p) = PrimitiveType::from_source_name(other) {
                    Type::Primitive(p)
                } else if let Some(p) = PrimitiveType::from_boxed_name(other) {
                    Type::Boxed(p)
                } else {
                    Type::class(other)
                }
            }
        })
    }

    /// Whether this is the no-value type
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Whether this is an unboxed primitive
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Whether values of this type are references (can be null)
    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Void | Type::Primitive(_))
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Element type of an array
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// The primitive behind a primitive or boxed type
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) | Type::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether this is a numeric primitive or its box
    pub fn is_numeric(&self) -> bool {
        self.primitive().is_some_and(PrimitiveType::is_numeric)
    }

    /// The boxed form of a primitive; other types are returned unchanged
    pub fn boxed(&self) -> Type {
        match self {
            Type::Primitive(p) => Type::Boxed(*p),
            other => other.clone(),
        }
    }

    /// Equality that treats a primitive and its box as the same type
    pub fn same_modulo_boxing(&self, other: &Type) -> bool {
        self == other || self.boxed() == other.boxed()
    }

    /// Name of this type in emitted source
    pub fn source_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Primitive(p) => f.write_str(p.source_name()),
            Type::Boxed(p) => f.write_str(p.boxed_name()),
            Type::String => f.write_str("String"),
            Type::Object => f.write_str("Object"),
            Type::Class(name) => f.write_str(name),
            Type::Array(element) => write!(f, "{}[]", element),
        }
    }
}

impl TryFrom<&Type> for PrimitiveType {
    type Error = TypeError;

    fn try_from(ty: &Type) -> Result<Self, Self::Error> {
        ty.primitive().ok_or_else(|| TypeError::NotPrimitive { ty: ty.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for name in ["int", "Integer", "String", "Object", "void", "Point", "double[]", "Point[][]"] {
            assert_eq!(Type::parse(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Type::parse("a b"),
            Err(TypeError::InvalidTypeName { .. })
        ));
        assert!(Type::parse("").is_err());
        assert!(Type::parse("[]").is_err());
    }

    #[test]
    fn test_boxing_equivalence() {
        let int = Type::Primitive(PrimitiveType::Int);
        let integer = Type::Boxed(PrimitiveType::Int);
        assert!(int.same_modulo_boxing(&integer));
        assert!(integer.same_modulo_boxing(&int));
        assert!(!int.same_modulo_boxing(&Type::Boxed(PrimitiveType::Long)));
        assert!(!Type::String.same_modulo_boxing(&Type::Object));
    }

    #[test]
    fn test_primitive_names() {
        assert_eq!(PrimitiveType::Char.boxed_name(), "Character");
        assert_eq!(PrimitiveType::Int.value_getter(), "intValue()");
        assert_eq!(PrimitiveType::from_boxed_name("Integer"), Some(PrimitiveType::Int));
        assert!(!PrimitiveType::Boolean.is_numeric());
    }

    #[test]
    fn test_try_from_primitive() {
        assert_eq!(
            PrimitiveType::try_from(&Type::Boxed(PrimitiveType::Long)),
            Ok(PrimitiveType::Long)
        );
        assert!(PrimitiveType::try_from(&Type::String).is_err());
    }
}
