//! Identifier naming for generated code.
//!
//! Every generated identifier is derived from a [`TypeIdentity`] through
//! [`sanitize`], which is injective: distinct identities never produce the
//! same identifier.

use std::fmt::Write;

use dih_ir::TypeIdentity;

/// Escape an identity into a Rust identifier fragment.
///
/// ASCII alphanumerics are kept, `_` becomes `_u`, and any other character
/// becomes `_x` followed by six hex digits of its code point. The path and
/// the name are escaped separately and joined with `__`; inside the path
/// `::` also becomes `__`, inside the name every `:` is escaped. A `__` can
/// only come from a separator, so the last one splits path from name.
pub fn sanitize(identity: &TypeIdentity) -> String {
    let mut out = String::with_capacity(identity.path.len() + identity.name.len() + 8);
    if !identity.path.is_empty() {
        escape_into(&mut out, &identity.path, true);
        out.push_str("__");
    }
    escape_into(&mut out, &identity.name, false);
    out
}

fn escape_into(out: &mut String, text: &str, is_path: bool) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if is_path && chars.peek() == Some(&':') => {
                chars.next();
                out.push_str("__");
            }
            '_' => out.push_str("_u"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => {
                // Writing to a String cannot fail.
                let _ = write!(out, "_x{:06x}", u32::from(c));
            }
        }
    }
}

/// A name from the universe as a Rust identifier; keywords become raw
/// identifiers.
pub fn ident(name: &str) -> String {
    if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_owned()
    }
}

/// Keywords usable as raw identifiers. `self`, `Self`, `super`, and `crate`
/// cannot be raw and cannot name a field or method either.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Free function building an injectable struct.
pub fn factory_fn(identity: &TypeIdentity) -> String {
    format!("factory_{}", sanitize(identity))
}

/// Component method wrapping a provider.
pub fn provider_fn(identity: &TypeIdentity) -> String {
    format!("provides_{}", sanitize(identity))
}

/// Artifact (and module) holding a factory.
pub fn factory_artifact(identity: &TypeIdentity) -> String {
    format!("{}_Factory", sanitize(identity))
}

/// Artifact (and module) holding a provider wrapper.
pub fn provider_artifact(identity: &TypeIdentity) -> String {
    format!("{}_Provider", sanitize(identity))
}

/// Component field holding a value module.
pub fn module_field(identity: &TypeIdentity) -> String {
    sanitize(identity)
}
