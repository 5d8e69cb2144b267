//! Runtime value conversion
//!
//! `convert_value` is the operation the emitted `Ops.convertValue` call names:
//! it adapts an argument to a declared parameter type at invocation time.

use navex_types::{PrimitiveType, Type};
use thiserror::Error;

use super::value::Value;

/// A value could not be converted to the requested type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert {value} to {target}")]
pub struct ConversionError {
    /// Debug rendering of the offending value
    pub value: String,
    /// Requested type
    pub target: String,
}

impl ConversionError {
    fn new(value: &Value, target: &Type) -> Self {
        Self {
            value: format!("{:?}", value),
            target: target.to_string(),
        }
    }
}

/// Convert a value to the given type
///
/// Reference values that already fit (or that no rule applies to) are
/// returned unchanged; resolution has already checked assignability.
pub fn convert_value(value: &Value, target: &Type) -> Result<Value, ConversionError> {
    match target {
        Type::Primitive(p) | Type::Boxed(p) => {
            if value.is_null() {
                return if target.is_primitive() {
                    Ok(default_value(*p))
                } else {
                    Ok(Value::Null)
                };
            }
            to_primitive(value, *p).ok_or_else(|| ConversionError::new(value, target))
        }
        Type::String => Ok(match value {
            Value::Null | Value::Str(_) => value.clone(),
            other => Value::str(other.to_string()),
        }),
        Type::Array(element) => match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => {
                let converted = items
                    .iter()
                    .map(|item| convert_value(item, element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(converted))
            }
            single => Ok(Value::array([convert_value(single, element)?])),
        },
        _ => Ok(value.clone()),
    }
}

/// Zero value of a primitive
pub fn default_value(p: PrimitiveType) -> Value {
    match p {
        PrimitiveType::Boolean => Value::Bool(false),
        PrimitiveType::Char => Value::Char('\0'),
        PrimitiveType::Byte => Value::Byte(0),
        PrimitiveType::Short => Value::Short(0),
        PrimitiveType::Int => Value::Int(0),
        PrimitiveType::Long => Value::Long(0),
        PrimitiveType::Float => Value::Float(0.0),
        PrimitiveType::Double => Value::Double(0.0),
    }
}

fn to_primitive(value: &Value, p: PrimitiveType) -> Option<Value> {
    if let Value::Str(s) = value {
        return parse_primitive(s.trim(), p);
    }
    match p {
        PrimitiveType::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            other => other.as_f64().map(|v| Value::Bool(v != 0.0)),
        },
        PrimitiveType::Char => match value {
            Value::Char(c) => Some(Value::Char(*c)),
            other => other
                .as_i64()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(char::from_u32)
                .map(Value::Char),
        },
        _ => numeric(value, p),
    }
}

fn numeric(value: &Value, p: PrimitiveType) -> Option<Value> {
    if let Value::Bool(b) = value {
        return numeric(&Value::Int(*b as i32), p);
    }
    if p.is_floating() {
        let v = value.as_f64()?;
        return Some(match p {
            PrimitiveType::Float => Value::Float(v as f32),
            _ => Value::Double(v),
        });
    }
    let v = value.as_i64()?;
    Some(match p {
        PrimitiveType::Byte => Value::Byte(v as i8),
        PrimitiveType::Short => Value::Short(v as i16),
        PrimitiveType::Int => Value::Int(v as i32),
        _ => Value::Long(v),
    })
}

fn parse_primitive(s: &str, p: PrimitiveType) -> Option<Value> {
    match p {
        PrimitiveType::Boolean => s.parse().ok().map(Value::Bool),
        PrimitiveType::Char => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        PrimitiveType::Byte => s.parse().ok().map(Value::Byte),
        PrimitiveType::Short => s.parse().ok().map(Value::Short),
        PrimitiveType::Int => s.parse().ok().map(Value::Int),
        PrimitiveType::Long => s.parse().ok().map(Value::Long),
        PrimitiveType::Float => s.parse().ok().map(Value::Float),
        PrimitiveType::Double => s.parse().ok().map(Value::Double),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INT: Type = Type::Primitive(PrimitiveType::Int);

    #[test]
    fn test_numeric_narrowing_and_widening() {
        assert_eq!(convert_value(&Value::Double(2.9), &INT), Ok(Value::Int(2)));
        assert_eq!(
            convert_value(&Value::Int(7), &Type::Boxed(PrimitiveType::Long)),
            Ok(Value::Long(7))
        );
        assert_eq!(
            convert_value(&Value::Int(3), &Type::Primitive(PrimitiveType::Double)),
            Ok(Value::Double(3.0))
        );
    }

    #[test]
    fn test_null_into_primitive_is_zero() {
        assert_eq!(convert_value(&Value::Null, &INT), Ok(Value::Int(0)));
        assert_eq!(
            convert_value(&Value::Null, &Type::Boxed(PrimitiveType::Int)),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(convert_value(&Value::str(" 42 "), &INT), Ok(Value::Int(42)));
        assert_eq!(convert_value(&Value::Int(5), &Type::String), Ok(Value::str("5")));
        assert!(convert_value(&Value::str("abc"), &INT).is_err());
    }

    #[test]
    fn test_arrays() {
        let target = Type::array(Type::Primitive(PrimitiveType::Long));
        assert_eq!(
            convert_value(&Value::array([Value::Int(1), Value::Int(2)]), &target),
            Ok(Value::array([Value::Long(1), Value::Long(2)]))
        );
        assert_eq!(
            convert_value(&Value::Int(1), &target),
            Ok(Value::array([Value::Long(1)]))
        );
    }

    #[test]
    fn test_references_pass_through() {
        let v = Value::str("x");
        assert_eq!(convert_value(&v, &Type::Object), Ok(v.clone()));
        assert_eq!(convert_value(&v, &Type::class("Point")), Ok(v));
    }
}
