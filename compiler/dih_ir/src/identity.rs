//! Type identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Globally unique key of a declared type: its defining module path plus its name.
///
/// Two references with equal identities denote the same type. Ordering is by
/// path, then name, which is the order every identity-keyed collection in the
/// generator iterates in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeIdentity {
    /// Module path, e.g. `crate::app::dbstore`.
    pub path: String,
    /// Declared name, e.g. `MemoryDbStore`.
    pub name: String,
}

impl TypeIdentity {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeIdentity {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.path, self.name)
        }
    }
}
