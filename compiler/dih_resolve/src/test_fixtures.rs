//! Builders for small type universes.

use dih_ir::{FieldDecl, MethodSig, TypeDecl, TypeFlags, TypeIdentity, TypeRef, Universe};

use crate::definition::MODULES_METHOD;

pub(crate) const PKG: &str = "crate::app";

pub(crate) fn id(name: &str) -> TypeIdentity {
    TypeIdentity::new(PKG, name)
}

pub(crate) fn named(name: &str) -> TypeRef {
    TypeRef::named(PKG, name)
}

pub(crate) fn ptr(name: &str) -> TypeRef {
    TypeRef::pointer_to(PKG, name)
}

pub(crate) fn modules(refs: Vec<TypeRef>) -> MethodSig {
    MethodSig::new(MODULES_METHOD).result(TypeRef::Tuple(refs))
}

/// A struct whose methods are the given providers.
pub(crate) fn value_module(name: &str, methods: Vec<MethodSig>) -> TypeDecl {
    methods
        .into_iter()
        .fold(TypeDecl::structure(id(name), vec![]), TypeDecl::with_method)
}

pub(crate) fn injectable(name: &str, fields: Vec<FieldDecl>) -> TypeDecl {
    TypeDecl::structure(id(name), fields).with_flags(TypeFlags::INJECT)
}

pub(crate) fn field(name: &str, ty: TypeRef) -> FieldDecl {
    FieldDecl::new(name, ty)
}

/// A definition named `Component` with the given modules and targets.
pub(crate) fn definition(module_refs: Vec<TypeRef>, targets: Vec<MethodSig>) -> TypeDecl {
    let mut methods = vec![modules(module_refs)];
    methods.extend(targets);
    TypeDecl::interface(id("Component"), methods)
}

pub(crate) fn target(name: &str, ty: TypeRef) -> MethodSig {
    MethodSig::new(name).result(ty)
}

pub(crate) fn fallible_target(name: &str, ty: TypeRef) -> MethodSig {
    MethodSig::new(name).result(ty).result(TypeRef::Error)
}

#[allow(clippy::unwrap_used, reason = "fixtures never declare a type twice")]
pub(crate) fn universe(decls: Vec<TypeDecl>) -> Universe {
    decls
        .into_iter()
        .fold(Universe::new(), |u, decl| u.with(decl).unwrap())
}
