//! The root of the generated module tree.

use crate::context::ERROR_ALIAS;

/// Declare every artifact module and re-export the component.
///
/// `modules` are artifact names other than the root itself, in the order
/// they are declared.
pub(crate) fn emit_module_root<'n>(
    modules: impl IntoIterator<Item = &'n str>,
    component: &str,
    definition: &str,
) -> String {
    let mut out = String::from(crate::GENERATED_HEADER);
    out.push_str(&format!("// Component: {definition}\n\n"));
    out.push_str("#![allow(non_snake_case, dead_code)]\n\n");
    for module in modules {
        out.push_str(&format!("mod {module};\n"));
    }
    out.push('\n');
    out.push_str(&format!("pub use {}::{component};\n\n", crate::COMPONENT_ARTIFACT));
    out.push_str("/// Error returned by fallible providers and accessors.\n");
    out.push_str(&format!(
        "pub type {ERROR_ALIAS} = Box<dyn std::error::Error + Send + Sync>;\n"
    ));
    out
}
