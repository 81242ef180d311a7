//! Expressions producing a resolved dependency.

use dih_resolve::{Source, SourceKind};

use crate::context::CodegenContext;
use crate::naming;

/// Expression yielding `source`, evaluated against `receiver` (a
/// `&GeneratedComponent`). Fallible sources are propagated with `?`, and a
/// value reached through a binding is cast to its interface.
pub(crate) fn source_expr(ctx: &mut CodegenContext<'_>, source: &Source, receiver: &str) -> String {
    let id = &source.identity;
    let mut expr = match source.kind {
        SourceKind::Provider => format!("{receiver}.{}()", naming::provider_fn(id)),
        SourceKind::Factory => format!(
            "super::{}::{}({receiver})",
            naming::factory_artifact(id),
            naming::factory_fn(id)
        ),
    };
    if source.is_fallible {
        expr.push('?');
    }
    if let Some(interface) = &source.cast {
        expr = format!("{expr} as {}", ctx.render_dyn(interface));
    }
    expr
}

/// Final expression of a function returning `value`.
pub(crate) fn return_expr(value: String, is_fallible: bool) -> String {
    if is_fallible {
        format!("Ok({value})")
    } else {
        value
    }
}
