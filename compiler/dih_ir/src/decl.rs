//! Type declarations.
//!
//! A [`TypeDecl`] is the structural description of one declared type: what a
//! type checker would report for it. The resolver only ever reads these.

use serde::{Deserialize, Serialize};

use crate::{TypeIdentity, TypeRef};

bitflags::bitflags! {
    /// Markers attached to a struct declaration.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeFlags: u8 {
        /// The struct may be constructed field-by-field without a provider.
        const INJECT = 1;
        /// The module is passed into the generated constructor instead of
        /// being default-constructed.
        const PROVIDED_MODULE = 1 << 1;
    }
}

impl Default for TypeFlags {
    fn default() -> Self {
        TypeFlags::empty()
    }
}

/// Visibility of a type, field, or method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to generated code.
    #[default]
    Public,
    /// Invisible to generated code; skipped by discovery and synthesis.
    Private,
}

/// Per-field generation tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTag {
    #[default]
    None,
    /// Excluded from the factory's assignment plan; must be set by other means.
    Skip,
}

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub tag: FieldTag,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDecl {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            tag: FieldTag::None,
        }
    }

    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.tag = FieldTag::Skip;
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Whether the factory assigns this field.
    pub fn is_injected(&self) -> bool {
        self.visibility == Visibility::Public && self.tag != FieldTag::Skip
    }
}

/// A named method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A method signature. The receiver is implied by the declaring type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<TypeRef>,
}

impl MethodSig {
    pub fn new(name: impl Into<String>) -> Self {
        MethodSig {
            name: name.into(),
            visibility: Visibility::Public,
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    #[must_use]
    pub fn result(mut self, ty: TypeRef) -> Self {
        self.results.push(ty);
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// The kind of a declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeKind {
    /// A struct: value module, injectable struct, or plain data.
    Struct {
        #[serde(default)]
        fields: Vec<FieldDecl>,
        #[serde(default)]
        methods: Vec<MethodSig>,
    },
    /// An interface (trait): binding module, definition, or bindable type.
    Interface {
        #[serde(default)]
        methods: Vec<MethodSig>,
    },
    /// Any other named type, e.g. a newtype over a primitive.
    Opaque {
        #[serde(default)]
        methods: Vec<MethodSig>,
    },
}

/// A declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDecl {
    #[serde(flatten)]
    pub identity: TypeIdentity,
    #[serde(flatten)]
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub flags: TypeFlags,
}

impl TypeDecl {
    pub fn structure(identity: TypeIdentity, fields: Vec<FieldDecl>) -> Self {
        TypeDecl {
            identity,
            kind: TypeKind::Struct {
                fields,
                methods: Vec::new(),
            },
            visibility: Visibility::Public,
            flags: TypeFlags::empty(),
        }
    }

    pub fn interface(identity: TypeIdentity, methods: Vec<MethodSig>) -> Self {
        TypeDecl {
            identity,
            kind: TypeKind::Interface { methods },
            visibility: Visibility::Public,
            flags: TypeFlags::empty(),
        }
    }

    pub fn opaque(identity: TypeIdentity) -> Self {
        TypeDecl {
            identity,
            kind: TypeKind::Opaque {
                methods: Vec::new(),
            },
            visibility: Visibility::Public,
            flags: TypeFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Attach a method. Methods on interfaces are its declared methods; on
    /// structs and opaque types they are the type's inherent methods.
    #[must_use]
    pub fn with_method(mut self, method: MethodSig) -> Self {
        match &mut self.kind {
            TypeKind::Struct { methods, .. }
            | TypeKind::Interface { methods }
            | TypeKind::Opaque { methods } => methods.push(method),
        }
        self
    }

    pub fn methods(&self) -> &[MethodSig] {
        match &self.kind {
            TypeKind::Struct { methods, .. }
            | TypeKind::Interface { methods }
            | TypeKind::Opaque { methods } => methods,
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.methods()
            .iter()
            .find(|m| m.is_public() && m.name == name)
    }

    /// Struct fields in declaration order; empty for non-structs.
    pub fn fields(&self) -> &[FieldDecl] {
        match &self.kind {
            TypeKind::Struct { fields, .. } => fields,
            TypeKind::Interface { .. } | TypeKind::Opaque { .. } => &[],
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface { .. })
    }

    pub fn is_injectable(&self) -> bool {
        self.is_struct() && self.flags.contains(TypeFlags::INJECT)
    }

    pub fn is_provided_module(&self) -> bool {
        self.flags.contains(TypeFlags::PROVIDED_MODULE)
    }
}
