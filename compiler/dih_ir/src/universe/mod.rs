//! The type universe.
//!
//! [`TypeUniverse`] is the boundary to whatever produced the declarations (a
//! source parser, a type checker, a JSON dump). The generator only needs
//! lookup by identity; [`Universe`] is the in-memory implementation used by
//! the CLI and by tests.
//!
//! # File format
//!
//! ```text
//! {
//!   "root_package": "crate::app",
//!   "types": [
//!     { "path": "crate::app", "name": "Service", "kind": "struct",
//!       "flags": "INJECT", "fields": [ ... ], "methods": [ ... ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{TypeDecl, TypeIdentity};

/// Read access to a snapshot of declared types.
pub trait TypeUniverse {
    /// Resolve a type by identity into its declaration.
    fn lookup(&self, identity: &TypeIdentity) -> Option<&TypeDecl>;

    /// Find a declaration by package path and name.
    fn find(&self, package: &str, name: &str) -> Option<&TypeDecl> {
        self.lookup(&TypeIdentity::new(package, name))
    }
}

/// Errors building a [`Universe`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UniverseError {
    /// The same identity was declared twice.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(TypeIdentity),
}

/// In-memory type universe keyed by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UniverseFile", into = "UniverseFile")]
pub struct Universe {
    /// Package the CLI falls back to when `--package` is not given.
    root_package: Option<String>,
    types: BTreeMap<TypeIdentity, TypeDecl>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_root_package(mut self, package: impl Into<String>) -> Self {
        self.root_package = Some(package.into());
        self
    }

    pub fn root_package(&self) -> Option<&str> {
        self.root_package.as_deref()
    }

    /// Add a declaration, rejecting a second declaration of the same identity.
    pub fn insert(&mut self, decl: TypeDecl) -> Result<(), UniverseError> {
        if self.types.contains_key(&decl.identity) {
            return Err(UniverseError::DuplicateType(decl.identity));
        }
        self.types.insert(decl.identity.clone(), decl);
        Ok(())
    }

    /// Builder-style [`Universe::insert`].
    pub fn with(mut self, decl: TypeDecl) -> Result<Self, UniverseError> {
        self.insert(decl)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Declarations in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }
}

impl TypeUniverse for Universe {
    fn lookup(&self, identity: &TypeIdentity) -> Option<&TypeDecl> {
        self.types.get(identity)
    }
}

/// On-disk representation: a flat list keeps files easy to write by hand.
#[derive(Serialize, Deserialize)]
struct UniverseFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root_package: Option<String>,
    #[serde(default)]
    types: Vec<TypeDecl>,
}

impl TryFrom<UniverseFile> for Universe {
    type Error = UniverseError;

    fn try_from(file: UniverseFile) -> Result<Self, Self::Error> {
        let mut universe = Universe {
            root_package: file.root_package,
            types: BTreeMap::new(),
        };
        for decl in file.types {
            universe.insert(decl)?;
        }
        Ok(universe)
    }
}

impl From<Universe> for UniverseFile {
    fn from(universe: Universe) -> Self {
        UniverseFile {
            root_package: universe.root_package,
            types: universe.types.into_values().collect(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
