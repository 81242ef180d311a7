//! Provider wrappers.
//!
//! Each used provider gets an inherent method on the component that resolves
//! the provider's parameters and calls it on the owning module.

use dih_resolve::ProviderPlan;

use super::expr::{return_expr, source_expr};
use crate::context::CodegenContext;
use crate::naming;

pub(crate) fn emit_provider(ctx: &mut CodegenContext<'_>, plan: &ProviderPlan) {
    let provider = &plan.provider;
    let component = ctx.component;
    let ty = ctx.render_type(&provider.result);
    let ret = ctx.render_return(&ty, plan.is_fallible);

    ctx.writeln(&format!("impl {component} {{"));
    ctx.indent();
    ctx.writeln(&format!(
        "pub(super) fn {}(&self) -> {ret} {{",
        naming::provider_fn(&provider.provides)
    ));
    ctx.indent();

    let mut args = Vec::with_capacity(plan.params.len());
    for (i, source) in plan.params.iter().enumerate() {
        let value = source_expr(ctx, source, "self");
        ctx.writeln(&format!("let param{i} = {value};"));
        args.push(format!("param{i}"));
    }

    let mut call = format!(
        "self.{}.{}({})",
        naming::module_field(&provider.module),
        naming::ident(&provider.method),
        args.join(", ")
    );
    if provider.is_fallible {
        call.push('?');
    }
    ctx.writeln(&return_expr(call, plan.is_fallible));

    ctx.dedent();
    ctx.writeln("}");
    ctx.dedent();
    ctx.writeln("}");
}
