//! Attribute values stored inside module objects.

use std::sync::Arc;

use crate::module::ModuleObject;

/// A value bound to a module attribute.
///
/// Scalars cover what a module manifest can declare; `Module` links a
/// submodule into its parent so a package forms a tree of module objects.
#[derive(Debug, Clone)]
pub enum Value {
    Str(Arc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Module(Arc<ModuleObject>),
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the module this value links to, if it is a submodule binding.
    pub fn as_module(&self) -> Option<&Arc<ModuleObject>> {
        match self {
            Value::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Value::Module(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_accessors() {
        assert_eq!(Value::string("hi").as_str(), Some("hi"));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn accessor_type_mismatch() {
        assert!(Value::Int(1).as_str().is_none());
        assert!(Value::string("x").as_int().is_none());
        assert!(!Value::Bool(false).is_module());
    }

    #[test]
    fn module_value() {
        let m = Arc::new(ModuleObject::new("pkg"));
        let v = Value::Module(Arc::clone(&m));
        assert!(v.is_module());
        assert!(Arc::ptr_eq(v.as_module().unwrap(), &m));
    }
}
