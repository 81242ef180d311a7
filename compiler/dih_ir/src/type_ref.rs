//! Type reference shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TypeIdentity;

/// A reference to a type as it appears in a field, parameter, or result.
///
/// Only [`TypeRef::Named`] and a [`TypeRef::Pointer`] to a named type are
/// injectable; every other shape exists so the resolver can reject it with a
/// precise error instead of guessing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A declared type used by value.
    Named(TypeIdentity),
    /// A reference to another type (emitted as `Box<T>`).
    Pointer(Box<TypeRef>),
    /// A sequence of elements.
    Slice(Box<TypeRef>),
    /// A key/value map.
    Map(Box<TypeRef>, Box<TypeRef>),
    /// A tuple; module lists are declared as tuples of module references.
    Tuple(Vec<TypeRef>),
    /// An unnamed primitive such as `u64` or `String`.
    Builtin(String),
    /// The canonical error type of a fallible result.
    Error,
}

/// The two injectable shapes of a [`TypeRef`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shape<'a> {
    /// `T`
    Value(&'a TypeIdentity),
    /// `Box<T>`
    Reference(&'a TypeIdentity),
}

impl<'a> Shape<'a> {
    pub fn identity(self) -> &'a TypeIdentity {
        match self {
            Shape::Value(id) | Shape::Reference(id) => id,
        }
    }

    pub fn is_reference(self) -> bool {
        matches!(self, Shape::Reference(_))
    }
}

impl TypeRef {
    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Named(TypeIdentity::new(path, name))
    }

    pub fn pointer(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    /// Reference to a named type, the shape of every injectable struct.
    pub fn pointer_to(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::pointer(TypeRef::named(path, name))
    }

    /// Classify this reference as one of the injectable shapes.
    ///
    /// Returns `None` for slices, maps, tuples, builtins, the error type, and
    /// pointers to anything other than a named type.
    pub fn shape(&self) -> Option<Shape<'_>> {
        match self {
            TypeRef::Named(id) => Some(Shape::Value(id)),
            TypeRef::Pointer(inner) => match inner.as_ref() {
                TypeRef::Named(id) => Some(Shape::Reference(id)),
                TypeRef::Pointer(_)
                | TypeRef::Slice(_)
                | TypeRef::Map(..)
                | TypeRef::Tuple(_)
                | TypeRef::Builtin(_)
                | TypeRef::Error => None,
            },
            TypeRef::Slice(_)
            | TypeRef::Map(..)
            | TypeRef::Tuple(_)
            | TypeRef::Builtin(_)
            | TypeRef::Error => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(id) => write!(f, "{id}"),
            TypeRef::Pointer(inner) => write!(f, "&{inner}"),
            TypeRef::Slice(inner) => write!(f, "[{inner}]"),
            TypeRef::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            TypeRef::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            TypeRef::Builtin(name) => f.write_str(name),
            TypeRef::Error => f.write_str("Error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_pointer_are_injectable_shapes() {
        let named = TypeRef::named("crate::app", "Greeting");
        let pointer = TypeRef::pointer_to("crate::app", "Service");

        assert_eq!(
            named.shape(),
            Some(Shape::Value(&TypeIdentity::new("crate::app", "Greeting")))
        );
        assert!(pointer.shape().is_some_and(Shape::is_reference));
    }

    #[test]
    fn collections_have_no_shape() {
        let element = TypeRef::named("crate::app", "Greeting");
        assert_eq!(TypeRef::Slice(Box::new(element.clone())).shape(), None);
        assert_eq!(
            TypeRef::Map(Box::new(element.clone()), Box::new(element.clone())).shape(),
            None
        );
        assert_eq!(TypeRef::pointer(TypeRef::pointer(element)).shape(), None);
        assert_eq!(TypeRef::Builtin("u64".into()).shape(), None);
    }

    #[test]
    fn display_uses_path_syntax() {
        let ty = TypeRef::Map(
            Box::new(TypeRef::Builtin("String".into())),
            Box::new(TypeRef::pointer_to("crate::app", "Service")),
        );
        assert_eq!(ty.to_string(), "Map<String, &crate::app::Service>");
    }
}
