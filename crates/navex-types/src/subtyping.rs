//! Subtyping and argument compatibility
//!
//! Implements the relation T <: U over the reference hierarchy, and grades how
//! well a value type fits a declared parameter type.

use rustc_hash::FxHashSet;

use crate::ty::Type;

/// Source of class/interface inheritance edges
pub trait TypeHierarchy {
    /// Direct superclass and interfaces of a class type
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type>;
}

/// How a value type fits a declared parameter type, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Compatibility {
    /// Cannot be passed even with conversion
    Incompatible,
    /// Needs a runtime conversion (numeric narrowing, to-string, ...)
    Convertible,
    /// Passes by subtyping (or null into a reference)
    Assignable,
    /// Same type, modulo boxing
    Exact,
}

/// Context for checking subtyping relationships
pub struct SubtypingContext<'a> {
    hierarchy: &'a dyn TypeHierarchy,
}

impl<'a> SubtypingContext<'a> {
    /// Create a new subtyping context over a hierarchy
    pub fn new(hierarchy: &'a dyn TypeHierarchy) -> Self {
        SubtypingContext { hierarchy }
    }

    /// Check if `sub` is a subtype of `sup` (sub <: sup)
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        if sub == sup {
            return true;
        }

        match (sub, sup) {
            // Every reference type is an Object
            (s, Type::Object) => s.is_reference(),

            // Arrays are covariant over reference elements
            (Type::Array(a), Type::Array(b)) => {
                a.is_reference() && b.is_reference() && self.is_subtype(a, b)
            }

            (Type::Class(_), Type::Class(_)) => self.class_extends(sub, sup),

            _ => false,
        }
    }

    /// Breadth-first walk up the hierarchy; tolerates cycles
    fn class_extends(&self, sub: &Type, sup: &Type) -> bool {
        let mut seen = FxHashSet::default();
        let mut queue = vec![sub.clone()];
        while let Some(ty) = queue.pop() {
            if !seen.insert(ty.clone()) {
                continue;
            }
            for parent in self.hierarchy.direct_supertypes(&ty) {
                if &parent == sup {
                    return true;
                }
                queue.push(parent);
            }
        }
        false
    }

    /// Grade a value type (None for a null value) against a parameter type
    pub fn compatibility(&self, value: Option<&Type>, param: &Type) -> Compatibility {
        let Some(value) = value else {
            return if param.is_reference() {
                Compatibility::Assignable
            } else {
                Compatibility::Convertible
            };
        };

        if value.same_modulo_boxing(param) {
            return Compatibility::Exact;
        }
        if self.is_subtype(value, param) {
            return Compatibility::Assignable;
        }
        if value.is_numeric() && param.is_numeric() {
            return Compatibility::Convertible;
        }
        match param {
            Type::String => Compatibility::Convertible,
            p if p.primitive().is_some() && value == &Type::String => Compatibility::Convertible,
            _ => Compatibility::Incompatible,
        }
    }
}
