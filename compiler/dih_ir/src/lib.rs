//! dihedral IR - the static type universe consumed by the generator.
//!
//! This crate holds the data the resolver reads and never mutates:
//! - [`TypeIdentity`]: the `(path, name)` key of a declared type
//! - [`TypeRef`]: a closed set of type reference shapes
//! - [`TypeDecl`]: struct, interface, and opaque declarations with their methods
//! - [`TypeUniverse`]: the lookup interface, plus the in-memory [`Universe`]
//!
//! # Design Philosophy
//!
//! - **Closed shapes**: every dispatch on a type reference is an exhaustive
//!   `match`, so supporting a new shape is a compile-time decision.
//! - **Typed markers**: injection markers are [`TypeFlags`] and field tags are
//!   [`FieldTag`], never string conventions.
//! - **Ordered storage**: declarations live in a `BTreeMap` keyed by identity so
//!   every traversal of the universe is deterministic.

mod decl;
mod identity;
mod type_ref;
pub mod universe;

pub use decl::{FieldDecl, FieldTag, MethodSig, Param, TypeDecl, TypeFlags, TypeKind, Visibility};
pub use identity::TypeIdentity;
pub use type_ref::{Shape, TypeRef};
pub use universe::{TypeUniverse, Universe, UniverseError};
