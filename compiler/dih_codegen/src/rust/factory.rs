//! Factories for injectable structs.

use dih_resolve::FactorySpec;

use super::expr::{return_expr, source_expr};
use crate::context::CodegenContext;
use crate::naming;

/// Emit the free function building `spec`'s struct.
///
/// The struct starts from `Default` and its fields are assigned in
/// declaration order, so a failing step returns before later fields are
/// touched.
pub(crate) fn emit_factory(ctx: &mut CodegenContext<'_>, spec: &FactorySpec) {
    let component = ctx.component;
    let path = ctx.qualify(&spec.identity);
    let ret = ctx.render_return(&format!("Box<{path}>"), spec.is_fallible);

    let fn_name = naming::factory_fn(&spec.identity);
    if spec.fields.is_empty() {
        ctx.writeln(&format!(
            "pub(super) fn {fn_name}(_component: &{component}) -> {ret} {{"
        ));
        ctx.indent();
        let value = format!("Box::new({path}::default())");
        ctx.writeln(&return_expr(value, spec.is_fallible));
        ctx.dedent();
        ctx.writeln("}");
        return;
    }

    ctx.writeln(&format!(
        "pub(super) fn {fn_name}(component: &{component}) -> {ret} {{"
    ));
    ctx.indent();
    ctx.writeln(&format!("let mut target = Box::new({path}::default());"));
    for assignment in &spec.fields {
        let value = source_expr(ctx, &assignment.source, "component");
        ctx.writeln(&format!(
            "target.{} = {value};",
            naming::ident(&assignment.field)
        ));
    }
    ctx.writeln(&return_expr("target".to_owned(), spec.is_fallible));

    ctx.dedent();
    ctx.writeln("}");
}
