//! Generation pipeline: definition → discovery → resolution → emission.
//!
//! Portable (no filesystem IO). The universe comes in by reference, results
//! come out as a [`GenerateOutput`].

use dih_codegen::{is_identifier, EmitConfig};
use dih_diagnostic::{Diagnostic, ErrorCode};
use dih_ir::TypeUniverse;
use tracing::{debug, info};

use crate::output::{ErrorPhase, GenerateOutput};

/// Configuration for a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Package path declaring the definition.
    pub package: String,
    /// Name of the definition interface.
    pub definition: String,
    /// Name of the generated module (and output directory).
    pub output_module: String,
    /// Name of the generated component struct.
    pub component_type: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            package: "crate".to_string(),
            definition: "Component".to_string(),
            output_module: "digen".to_string(),
            component_type: "GeneratedComponent".to_string(),
        }
    }
}

impl GenerateConfig {
    pub fn new(package: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            definition: definition.into(),
            ..Self::default()
        }
    }
}

/// Run the full pipeline.
///
/// Stops at the first failing phase; a failed run carries no artifacts.
#[tracing::instrument(level = "info", skip_all, fields(
    package = %config.package,
    definition = %config.definition,
))]
pub fn generate<U: TypeUniverse>(universe: &U, config: &GenerateConfig) -> GenerateOutput {
    // Definition
    let definition =
        match dih_resolve::load_definition(universe, &config.package, &config.definition) {
            Ok(definition) => definition,
            Err(e) => return GenerateOutput::failure(ErrorPhase::Definition, e.to_diagnostic()),
        };

    // Discovery
    let registry = match dih_resolve::discover_modules(universe, &definition.modules) {
        Ok(registry) => registry,
        Err(e) => return GenerateOutput::failure(ErrorPhase::Discovery, e.to_diagnostic()),
    };

    // Resolution
    let plan = match dih_resolve::resolve(universe, &definition, &registry) {
        Ok(plan) => plan,
        Err(e) => return GenerateOutput::failure(ErrorPhase::Resolution, e.to_diagnostic()),
    };
    let summary = plan.summary();
    debug!(%summary, "plan ready");

    // Emission
    if !is_identifier(&config.output_module) {
        let diag = Diagnostic::error(ErrorCode::E9002).with_message(format!(
            "output module `{}` is not a Rust identifier",
            config.output_module
        ));
        return GenerateOutput::failure(ErrorPhase::Emission, diag);
    }
    let emit_config = EmitConfig {
        component_type: config.component_type.clone(),
    };
    let artifacts = match dih_codegen::emit(&plan, universe, &emit_config) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            let mut output = GenerateOutput::failure(ErrorPhase::Emission, e.to_diagnostic());
            output.plan_summary = Some(summary);
            return output;
        }
    };

    info!(artifacts = artifacts.len(), "generated");
    GenerateOutput {
        success: true,
        artifacts,
        plan_summary: Some(summary),
        diagnostics: Vec::new(),
        error_phase: None,
    }
}
