//! Rust code generation for resolved components.
//!
//! Renders a [`ResolutionPlan`] into a set of named Rust source artifacts
//! that together form one module tree:
//!
//! ```text
//! mod.rs                      declares the artifacts, re-exports the component
//! component.rs                component struct, `new`, target accessors
//! <Identity>_Factory.rs       one per injectable struct
//! <Identity>_Provider.rs      one per used provider
//! ```
//!
//! Emission is deterministic: providers and factories are emitted in
//! identity order, module fields in first-use order, accessors in
//! declaration order, and imports in first-encounter order per artifact.

mod context;
mod imports;
pub mod naming;
mod rust;

use std::collections::BTreeMap;

use dih_diagnostic::{Diagnostic, ErrorCode};
use dih_ir::{TypeIdentity, TypeUniverse};
use dih_resolve::{ResolutionPlan, Source, SourceKind};
use tracing::debug;

pub use context::{CodegenContext, ERROR_ALIAS};
pub use imports::ImportTable;

/// Logical artifact name → Rust source.
pub type Artifacts = BTreeMap<String, String>;

/// Artifact holding the component struct.
pub const COMPONENT_ARTIFACT: &str = "component";
/// Artifact declaring the module tree.
pub const MODULE_ARTIFACT: &str = "mod";
/// First line of every artifact.
pub const GENERATED_HEADER: &str = "// Code generated by dihc. DO NOT EDIT.\n";

/// Emission settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// Name of the generated component struct.
    pub component_type: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            component_type: "GeneratedComponent".to_owned(),
        }
    }
}

/// Emission failures. A plan produced by the resolver always emits; these
/// guard against hand-built plans and bad configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("plan uses {kind} `{identity}` but does not contain it")]
    DanglingSource {
        kind: &'static str,
        identity: TypeIdentity,
    },

    #[error("component type `{0}` is not a Rust identifier")]
    InvalidComponentType(String),
}

impl EmitError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            EmitError::DanglingSource { .. } => ErrorCode::E9001,
            EmitError::InvalidComponentType(_) => ErrorCode::E9002,
        };
        Diagnostic::error(code).with_message(self.to_string())
    }
}

/// Whether `name` can be used as a Rust identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name != "_"
}

/// Render `plan` into artifacts.
///
/// # Errors
///
/// Fails when the component type is not an identifier or the plan refers to
/// a provider or factory it does not contain.
#[tracing::instrument(level = "debug", skip_all, fields(definition = %plan.definition.identity))]
pub fn emit(
    plan: &ResolutionPlan,
    universe: &dyn TypeUniverse,
    config: &EmitConfig,
) -> Result<Artifacts, EmitError> {
    if !is_identifier(&config.component_type) {
        return Err(EmitError::InvalidComponentType(config.component_type.clone()));
    }
    check_sources(plan)?;

    let component = config.component_type.as_str();
    let preamble = format!("use super::{component};");
    let mut artifacts = Artifacts::new();

    let mut ctx = CodegenContext::new(universe, component);
    rust::emit_component(&mut ctx, plan);
    artifacts.insert(COMPONENT_ARTIFACT.to_owned(), ctx.finish(&[]));

    for spec in plan.factories.values() {
        let mut ctx = CodegenContext::new(universe, component);
        rust::emit_factory(&mut ctx, spec);
        artifacts.insert(
            naming::factory_artifact(&spec.identity),
            ctx.finish(&[preamble.as_str()]),
        );
    }

    for provider in plan.providers.values() {
        let mut ctx = CodegenContext::new(universe, component);
        rust::emit_provider(&mut ctx, provider);
        artifacts.insert(
            naming::provider_artifact(&provider.provider.provides),
            ctx.finish(&[preamble.as_str()]),
        );
    }

    let root = rust::emit_module_root(
        artifacts.keys().map(String::as_str),
        component,
        &plan.definition.identity.to_string(),
    );
    artifacts.insert(MODULE_ARTIFACT.to_owned(), root);

    debug!(artifacts = artifacts.len(), "emitted");
    Ok(artifacts)
}

/// Every source in the plan must name a provider or factory the plan holds.
fn check_sources(plan: &ResolutionPlan) -> Result<(), EmitError> {
    let check = |source: &Source| {
        let present = match source.kind {
            SourceKind::Provider => plan.providers.contains_key(&source.identity),
            SourceKind::Factory => plan.factories.contains_key(&source.identity),
        };
        if present {
            Ok(())
        } else {
            Err(EmitError::DanglingSource {
                kind: match source.kind {
                    SourceKind::Provider => "provider",
                    SourceKind::Factory => "factory",
                },
                identity: source.identity.clone(),
            })
        }
    };

    plan.targets.iter().try_for_each(|t| check(&t.source))?;
    plan.providers
        .values()
        .flat_map(|p| &p.params)
        .try_for_each(&check)?;
    plan.factories
        .values()
        .flat_map(|f| &f.fields)
        .try_for_each(|f| check(&f.source))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
