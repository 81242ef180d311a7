//! Per-artifact import aliases.

use rustc_hash::FxHashMap;

use dih_ir::TypeIdentity;

/// Prefix of every generated import alias.
pub const ALIAS_PREFIX: &str = "di_import_";

/// Import aliases of one artifact, numbered from 1 in first-encounter order.
#[derive(Clone, Debug, Default)]
pub struct ImportTable {
    aliases: FxHashMap<String, usize>,
    /// Module paths in first-encounter order.
    order: Vec<String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for a module path, assigning the next number on first use.
    pub fn alias(&mut self, path: &str) -> String {
        let next = self.order.len() + 1;
        let n = *self.aliases.entry(path.to_owned()).or_insert_with(|| {
            self.order.push(path.to_owned());
            next
        });
        format!("{ALIAS_PREFIX}{n}")
    }

    /// Qualified name of `identity` through its alias.
    ///
    /// Identities without a path (prelude types) are used unqualified.
    pub fn qualify(&mut self, identity: &TypeIdentity) -> String {
        if identity.path.is_empty() {
            return identity.name.clone();
        }
        format!("{}::{}", self.alias(&identity.path), identity.name)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `use` lines, one per path, in first-encounter order.
    pub fn render(&self) -> String {
        self.order
            .iter()
            .enumerate()
            .map(|(i, path)| format!("use {path} as {ALIAS_PREFIX}{};\n", i + 1))
            .collect()
    }
}
