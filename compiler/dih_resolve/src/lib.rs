//! Definition loading, module discovery, and dependency resolution.
//!
//! The pipeline is three pure steps over a read-only [`TypeUniverse`]:
//!
//! ```text
//! load_definition ──► discover_modules ──► resolve ──► ResolutionPlan
//! ```
//!
//! [`resolve_component`] runs all three. Each step stops at its first error;
//! every error converts to a [`dih_diagnostic::Diagnostic`].

pub mod definition;
pub mod discovery;
mod error;
mod factory;
mod graph;
mod plan;
mod stack;

#[cfg(test)]
mod test_fixtures;

use dih_ir::TypeUniverse;

pub use definition::{load_definition, ComponentDefinition, Target};
pub use discovery::{discover_modules, Binding, Provider, Registry, ValueModule};
pub use error::{ErrorKind, RegistrationSite, Requirement, ResolveError};
pub use factory::synthesize_factory;
pub use graph::resolve;
pub use plan::{
    FactorySpec, FieldAssignment, PlanSummary, ProviderPlan, ResolutionPlan, Source, SourceKind,
    TargetWiring,
};

/// Load `package::definition`, discover its modules, and resolve its targets.
///
/// # Errors
///
/// Returns the first error of whichever step failed.
pub fn resolve_component<U: TypeUniverse + ?Sized>(
    universe: &U,
    package: &str,
    definition: &str,
) -> Result<ResolutionPlan, ResolveError> {
    let definition = load_definition(universe, package, definition)?;
    let registry = discover_modules(universe, &definition.modules)?;
    resolve(universe, &definition, &registry)
}
