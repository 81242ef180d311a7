//! The component struct, its constructor, and target accessors.

use dih_resolve::{ResolutionPlan, TargetWiring};

use super::expr::{return_expr, source_expr};
use crate::context::CodegenContext;
use crate::naming;

pub(crate) fn emit_component(ctx: &mut CodegenContext<'_>, plan: &ResolutionPlan) {
    let component = ctx.component;

    // Struct: one field per used value module.
    ctx.writeln(&format!("pub struct {component} {{"));
    ctx.indent();
    for module in &plan.modules {
        let ty = ctx.qualify(&module.identity);
        ctx.writeln(&format!(
            "pub(super) {}: {ty},",
            naming::module_field(&module.identity)
        ));
    }
    ctx.dedent();
    ctx.writeln("}");
    ctx.newline();

    ctx.writeln(&format!("impl {component} {{"));
    ctx.indent();
    emit_constructor(ctx, plan);
    if plan.definition.component_interface.is_none() {
        for wiring in &plan.targets {
            ctx.newline();
            emit_accessor(ctx, wiring, "pub ");
        }
    }
    ctx.dedent();
    ctx.writeln("}");

    if let Some(interface) = &plan.definition.component_interface {
        let trait_path = ctx.qualify(interface);
        ctx.newline();
        ctx.writeln(&format!("impl {trait_path} for {component} {{"));
        ctx.indent();
        for (i, wiring) in plan.targets.iter().enumerate() {
            if i > 0 {
                ctx.newline();
            }
            emit_accessor(ctx, wiring, "");
        }
        ctx.dedent();
        ctx.writeln("}");
    }
}

/// `new` takes externally supplied modules; the rest are default-constructed.
fn emit_constructor(ctx: &mut CodegenContext<'_>, plan: &ResolutionPlan) {
    let component = ctx.component;

    let mut params = Vec::new();
    for module in plan.provided_modules() {
        let ty = ctx.qualify(&module.identity);
        params.push(format!("{}: {ty}", naming::module_field(&module.identity)));
    }

    ctx.writeln(&format!("pub fn new({}) -> Self {{", params.join(", ")));
    ctx.indent();
    ctx.writeln(&format!("{component} {{"));
    ctx.indent();
    for module in &plan.modules {
        let field = naming::module_field(&module.identity);
        if module.is_provided {
            ctx.writeln(&format!("{field},"));
        } else {
            let ty = ctx.qualify(&module.identity);
            ctx.writeln(&format!("{field}: {ty}::default(),"));
        }
    }
    ctx.dedent();
    ctx.writeln("}");
    ctx.dedent();
    ctx.writeln("}");
}

fn emit_accessor(ctx: &mut CodegenContext<'_>, wiring: &TargetWiring, visibility: &str) {
    let target = &wiring.target;
    let ty = ctx.render_type(&target.ty);
    let ret = ctx.render_return(&ty, target.is_fallible);

    ctx.writeln(&format!(
        "{visibility}fn {}(&self) -> {ret} {{",
        naming::ident(&target.method)
    ));
    ctx.indent();
    let value = source_expr(ctx, &wiring.source, "self");
    ctx.writeln(&return_expr(value, target.is_fallible));
    ctx.dedent();
    ctx.writeln("}");
}
