//! The resolution plan handed to code generation.
//!
//! Every collection here either is keyed by identity (and iterates in
//! identity order) or preserves declaration order, so two runs over the same
//! input produce equal plans.

use std::collections::BTreeMap;

use dih_ir::TypeIdentity;

use crate::definition::{ComponentDefinition, Target};
use crate::discovery::{Binding, Provider, ValueModule};
use crate::error::RegistrationSite;

/// How a resolved dependency is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Call the registered provider.
    Provider,
    /// Call the synthesized factory of an injectable struct.
    Factory,
}

/// A resolved dependency edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    pub kind: SourceKind,
    /// Provided type, or the injectable struct the factory builds.
    pub identity: TypeIdentity,
    /// Interface the value is cast to when it was reached through a binding.
    pub cast: Option<TypeIdentity>,
    /// Whether producing the value can fail, transitively.
    pub is_fallible: bool,
}

/// A provider the component calls, with its parameters resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderPlan {
    pub provider: Provider,
    /// One source per parameter, in parameter order.
    pub params: Vec<Source>,
    /// The provider's own fallibility combined with its parameters'.
    pub is_fallible: bool,
}

/// One assignment in a factory body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: String,
    pub source: Source,
}

/// A synthesized constructor for an injectable struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactorySpec {
    pub identity: TypeIdentity,
    /// Assignments in field declaration order.
    pub fields: Vec<FieldAssignment>,
    pub is_fallible: bool,
}

/// A target accessor wired to its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetWiring {
    pub target: Target,
    pub source: Source,
}

/// Everything needed to emit a component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub definition: ComponentDefinition,
    /// Value modules owning a used provider, in first-use order.
    pub modules: Vec<ValueModule>,
    pub providers: BTreeMap<TypeIdentity, ProviderPlan>,
    /// Bindings some dependency was resolved through.
    pub bindings: BTreeMap<TypeIdentity, Binding>,
    pub factories: BTreeMap<TypeIdentity, FactorySpec>,
    pub targets: Vec<TargetWiring>,
}

impl ResolutionPlan {
    /// Modules the generated constructor takes as parameters.
    pub fn provided_modules(&self) -> impl Iterator<Item = &ValueModule> {
        self.modules.iter().filter(|m| m.is_provided)
    }

    /// Find a fallible provider that makes `source` fallible.
    ///
    /// Returns `None` when `source` cannot fail.
    pub fn fallible_origin(&self, source: &Source) -> Option<RegistrationSite> {
        if !source.is_fallible {
            return None;
        }
        match source.kind {
            SourceKind::Provider => {
                let plan = self.providers.get(&source.identity)?;
                if plan.provider.is_fallible {
                    return Some(plan.provider.site());
                }
                plan.params.iter().find_map(|p| self.fallible_origin(p))
            }
            SourceKind::Factory => self
                .factories
                .get(&source.identity)?
                .fields
                .iter()
                .find_map(|f| self.fallible_origin(&f.source)),
        }
    }

    /// Counts for logs and the CLI summary.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            targets: self.targets.len(),
            providers: self.providers.len(),
            bindings: self.bindings.len(),
            factories: self.factories.len(),
            modules: self.modules.len(),
        }
    }
}

/// Sizes of a [`ResolutionPlan`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub targets: usize,
    pub providers: usize,
    pub bindings: usize,
    pub factories: usize,
    pub modules: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} target(s), {} provider(s), {} binding(s), {} factory(ies), {} module(s)",
            self.targets, self.providers, self.bindings, self.factories, self.modules
        )
    }
}
