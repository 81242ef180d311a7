//! Code generation context and state.
//!
//! A `CodegenContext` renders one artifact: it owns the artifact's import
//! table and output buffer, and borrows the universe for type lookups.

use dih_ir::{TypeIdentity, TypeRef, TypeUniverse};

use crate::imports::ImportTable;

/// Alias of the canonical error type inside generated code.
pub const ERROR_ALIAS: &str = "DiError";

/// Code generation context for a single artifact.
pub struct CodegenContext<'a> {
    universe: &'a dyn TypeUniverse,
    /// Name of the generated component struct.
    pub component: &'a str,
    imports: ImportTable,
    /// Whether the body refers to the error alias.
    uses_error: bool,
    indent: usize,
    output: String,
}

impl<'a> CodegenContext<'a> {
    pub fn new(universe: &'a dyn TypeUniverse, component: &'a str) -> Self {
        Self {
            universe,
            component,
            imports: ImportTable::new(),
            uses_error: false,
            indent: 0,
            output: String::with_capacity(1024),
        }
    }

    /// Qualified path of a declared type.
    pub fn qualify(&mut self, identity: &TypeIdentity) -> String {
        self.imports.qualify(identity)
    }

    fn is_interface(&self, identity: &TypeIdentity) -> bool {
        self.universe
            .lookup(identity)
            .is_some_and(dih_ir::TypeDecl::is_interface)
    }

    /// Rust spelling of a type reference.
    pub fn render_type(&mut self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(id) => {
                let path = self.qualify(id);
                if self.is_interface(id) {
                    format!("Box<dyn {path}>")
                } else {
                    path
                }
            }
            TypeRef::Pointer(inner) => format!("Box<{}>", self.render_type(inner)),
            TypeRef::Slice(inner) => format!("Vec<{}>", self.render_type(inner)),
            TypeRef::Map(key, value) => format!(
                "std::collections::HashMap<{}, {}>",
                self.render_type(key),
                self.render_type(value)
            ),
            TypeRef::Tuple(items) => {
                let items: Vec<_> = items.iter().map(|t| self.render_type(t)).collect();
                format!("({})", items.join(", "))
            }
            TypeRef::Builtin(name) => name.clone(),
            TypeRef::Error => self.error_type(),
        }
    }

    /// Boxed trait object for an interface, the target type of binding casts.
    pub fn render_dyn(&mut self, interface: &TypeIdentity) -> String {
        format!("Box<dyn {}>", self.qualify(interface))
    }

    pub fn error_type(&mut self) -> String {
        self.uses_error = true;
        ERROR_ALIAS.to_owned()
    }

    /// Return type of a function, wrapped in `Result` when it can fail.
    pub fn render_return(&mut self, ty: &str, is_fallible: bool) -> String {
        if is_fallible {
            format!("Result<{ty}, {}>", self.error_type())
        } else {
            ty.to_owned()
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line with indentation.
    pub fn writeln(&mut self, s: &str) {
        if !s.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str("    ");
            }
            self.output.push_str(s);
        }
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Assemble the artifact: `preamble`, the `use` block, then the body.
    pub fn finish(self, preamble: &[&str]) -> String {
        let mut out = String::with_capacity(self.output.len() + 256);
        out.push_str(crate::GENERATED_HEADER);
        out.push('\n');

        let mut uses: Vec<String> = preamble.iter().map(|s| format!("{s}\n")).collect();
        if self.uses_error {
            uses.push(format!("use super::{ERROR_ALIAS};\n"));
        }
        for line in &uses {
            out.push_str(line);
        }
        out.push_str(&self.imports.render());
        if !uses.is_empty() || !self.imports.is_empty() {
            out.push('\n');
        }

        out.push_str(&self.output);
        out
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use dih_ir::{TypeDecl, Universe};
    use pretty_assertions::assert_eq;

    use super::*;

    fn universe() -> Universe {
        Universe::new()
            .with(TypeDecl::interface(TypeIdentity::new("crate::db", "Store"), vec![]))
            .unwrap()
            .with(TypeDecl::structure(TypeIdentity::new("crate::app", "Service"), vec![]))
            .unwrap()
    }

    #[test]
    fn renders_injectable_shapes() {
        let u = universe();
        let mut ctx = CodegenContext::new(&u, "GeneratedComponent");

        assert_eq!(
            ctx.render_type(&TypeRef::pointer_to("crate::app", "Service")),
            "Box<di_import_1::Service>"
        );
        assert_eq!(
            ctx.render_type(&TypeRef::named("crate::db", "Store")),
            "Box<dyn di_import_2::Store>"
        );
        assert_eq!(
            ctx.render_type(&TypeRef::named("crate::app", "Greeting")),
            "di_import_1::Greeting"
        );
    }

    #[test]
    fn renders_other_shapes() {
        let u = universe();
        let mut ctx = CodegenContext::new(&u, "GeneratedComponent");
        let ty = TypeRef::Tuple(vec![
            TypeRef::Slice(Box::new(TypeRef::Builtin("u8".into()))),
            TypeRef::Error,
        ]);
        assert_eq!(ctx.render_type(&ty), "(Vec<u8>, DiError)");
    }

    #[test]
    fn indentation() {
        let u = universe();
        let mut ctx = CodegenContext::new(&u, "GeneratedComponent");

        ctx.writeln("fn a() {");
        ctx.indent();
        ctx.writeln("b();");
        ctx.writeln("");
        ctx.dedent();
        ctx.writeln("}");

        let out = ctx.finish(&[]);
        assert_eq!(
            out,
            format!("{}\nfn a() {{\n    b();\n\n}}\n", crate::GENERATED_HEADER)
        );
    }

    #[test]
    fn finish_writes_uses_before_body() {
        let u = universe();
        let mut ctx = CodegenContext::new(&u, "GeneratedComponent");
        let ret = ctx.render_return("Box<di_import_1::Service>", true);
        let service = ctx.qualify(&TypeIdentity::new("crate::app", "Service"));
        ctx.writeln(&format!("// {service} {ret}"));

        let out = ctx.finish(&["use super::GeneratedComponent;"]);
        assert_eq!(
            out,
            format!(
                "{}\nuse super::GeneratedComponent;\nuse super::DiError;\nuse crate::app as di_import_1;\n\n\
                 // di_import_1::Service Result<Box<di_import_1::Service>, DiError>\n",
                crate::GENERATED_HEADER
            )
        );
    }
}
