//! Dependency graph resolution.
//!
//! Starting from each target, every required type is classified in order:
//!
//! 1. a registered provider,
//! 2. a binding, whose implementation is then resolved as a reference,
//! 3. an injectable struct requested by reference, built by a synthesized
//!    factory.
//!
//! Anything else is unresolved. Resolution is depth-first with a three-state
//! memo: a node seen while still in progress closes a cycle, and a node seen
//! after completion is reused. Fallibility is computed bottom-up as nodes
//! complete.

use std::collections::BTreeMap;

use dih_ir::{TypeDecl, TypeIdentity, TypeRef, TypeUniverse};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::definition::ComponentDefinition;
use crate::discovery::{Provider, Registry};
use crate::error::Requirement;
use crate::factory::synthesize_factory;
use crate::plan::{ProviderPlan, ResolutionPlan, Source, SourceKind, TargetWiring};
use crate::stack::ensure_sufficient_stack;
use crate::ResolveError;

/// Memo state of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Visit {
    InProgress,
    Resolved { is_fallible: bool },
}

/// Resolve every target of `definition` against `registry`.
///
/// # Errors
///
/// Fails on the first unresolved dependency, cycle, unsupported shape, or
/// by-value/by-reference mismatch, and when a target that cannot fail depends
/// on a fallible provider.
#[tracing::instrument(level = "debug", skip_all, fields(definition = %definition.identity))]
pub fn resolve<U: TypeUniverse + ?Sized>(
    universe: &U,
    definition: &ComponentDefinition,
    registry: &Registry,
) -> Result<ResolutionPlan, ResolveError> {
    let mut resolver = Resolver::new(universe, registry, definition);

    let mut targets = Vec::with_capacity(definition.targets.len());
    for target in &definition.targets {
        let requirement = Requirement::Target {
            method: target.method.clone(),
        };
        let source = resolver.resolve_ref(&target.ty, &requirement)?;
        targets.push(TargetWiring {
            target: target.clone(),
            source,
        });
    }

    let plan = ResolutionPlan {
        targets,
        ..resolver.plan
    };

    for wiring in &plan.targets {
        if wiring.target.is_fallible || !wiring.source.is_fallible {
            continue;
        }
        if let Some(provider) = plan.fallible_origin(&wiring.source) {
            return Err(ResolveError::FallibleChainInInfallibleTarget {
                method: wiring.target.method.clone(),
                provider,
            });
        }
    }

    debug!(summary = %plan.summary(), "resolved");
    Ok(plan)
}

struct Resolver<'a, U: ?Sized> {
    universe: &'a U,
    registry: &'a Registry,
    memo: FxHashMap<TypeIdentity, Visit>,
    /// Nodes currently in progress, outermost first.
    path: Vec<TypeIdentity>,
    used_modules: FxHashSet<TypeIdentity>,
    plan: ResolutionPlan,
}

impl<'a, U: TypeUniverse + ?Sized> Resolver<'a, U> {
    fn new(universe: &'a U, registry: &'a Registry, definition: &ComponentDefinition) -> Self {
        Resolver {
            universe,
            registry,
            memo: FxHashMap::default(),
            path: Vec::new(),
            used_modules: FxHashSet::default(),
            plan: ResolutionPlan {
                definition: definition.clone(),
                modules: Vec::new(),
                providers: BTreeMap::new(),
                bindings: BTreeMap::new(),
                factories: BTreeMap::new(),
                targets: Vec::new(),
            },
        }
    }

    /// Resolve one requested type to the source that produces it.
    fn resolve_ref(
        &mut self,
        ty: &TypeRef,
        required_by: &Requirement,
    ) -> Result<Source, ResolveError> {
        let shape = ty
            .shape()
            .ok_or_else(|| ResolveError::UnsupportedDependencyShape {
                ty: ty.clone(),
                required_by: required_by.clone(),
            })?;
        let identity = shape.identity();
        let registry = self.registry;
        let universe = self.universe;

        if let Some(provider) = registry.provider(identity) {
            if provider.is_reference() != shape.is_reference() {
                return Err(ResolveError::ReferenceMismatch {
                    ty: ty.clone(),
                    provided: provider.result.clone(),
                    required_by: required_by.clone(),
                });
            }
            let is_fallible = self.visit_provider(provider)?;
            return Ok(Source {
                kind: SourceKind::Provider,
                identity: identity.clone(),
                cast: None,
                is_fallible,
            });
        }

        if let Some(binding) = registry.binding(identity) {
            if shape.is_reference() {
                return Err(ResolveError::ReferenceMismatch {
                    ty: ty.clone(),
                    provided: TypeRef::Named(identity.clone()),
                    required_by: required_by.clone(),
                });
            }
            trace!("{} bound to {}", binding.interface, binding.implementation);
            self.plan
                .bindings
                .entry(binding.interface.clone())
                .or_insert_with(|| binding.clone());

            let implementation = TypeRef::Pointer(Box::new(TypeRef::Named(
                binding.implementation.clone(),
            )));
            let through = Requirement::Binding {
                interface: binding.interface.clone(),
            };
            let source = self.resolve_ref(&implementation, &through)?;
            return Ok(Source {
                cast: Some(binding.interface.clone()),
                ..source
            });
        }

        match universe.lookup(identity) {
            Some(decl) if decl.is_injectable() => {
                if !shape.is_reference() {
                    return Err(ResolveError::ReferenceMismatch {
                        ty: ty.clone(),
                        provided: TypeRef::Pointer(Box::new(TypeRef::Named(identity.clone()))),
                        required_by: required_by.clone(),
                    });
                }
                let is_fallible = self.visit_factory(decl)?;
                Ok(Source {
                    kind: SourceKind::Factory,
                    identity: identity.clone(),
                    cast: None,
                    is_fallible,
                })
            }
            _ => Err(ResolveError::UnresolvedDependency {
                ty: ty.clone(),
                required_by: required_by.clone(),
                chain: self.path.clone(),
            }),
        }
    }

    /// Consult the memo. `Ok(Some(..))` is a finished node; `Ok(None)` means
    /// the caller must build it.
    fn enter(&mut self, identity: &TypeIdentity) -> Result<Option<bool>, ResolveError> {
        match self.memo.get(identity) {
            Some(Visit::Resolved { is_fallible }) => Ok(Some(*is_fallible)),
            Some(Visit::InProgress) => {
                let start = self
                    .path
                    .iter()
                    .position(|node| node == identity)
                    .unwrap_or(0);
                let mut chain = self.path[start..].to_vec();
                chain.push(identity.clone());
                Err(ResolveError::CyclicDependency { chain })
            }
            None => {
                self.memo.insert(identity.clone(), Visit::InProgress);
                self.path.push(identity.clone());
                Ok(None)
            }
        }
    }

    fn leave(&mut self, identity: &TypeIdentity, is_fallible: bool) {
        self.path.pop();
        self.memo
            .insert(identity.clone(), Visit::Resolved { is_fallible });
    }

    fn visit_provider(&mut self, provider: &'a Provider) -> Result<bool, ResolveError> {
        let identity = &provider.provides;
        if let Some(is_fallible) = self.enter(identity)? {
            return Ok(is_fallible);
        }

        let params = ensure_sufficient_stack(|| {
            provider
                .params
                .iter()
                .map(|param| {
                    let requirement = Requirement::Parameter {
                        site: provider.site(),
                        param: param.name.clone(),
                    };
                    self.resolve_ref(&param.ty, &requirement)
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let is_fallible = provider.is_fallible || params.iter().any(|p| p.is_fallible);
        if self.used_modules.insert(provider.module.clone()) {
            if let Some(module) = self.registry.value_module(&provider.module) {
                self.plan.modules.push(module.clone());
            }
        }
        self.plan.providers.insert(
            identity.clone(),
            ProviderPlan {
                provider: provider.clone(),
                params,
                is_fallible,
            },
        );

        self.leave(identity, is_fallible);
        Ok(is_fallible)
    }

    fn visit_factory(&mut self, decl: &TypeDecl) -> Result<bool, ResolveError> {
        let identity = &decl.identity;
        if let Some(is_fallible) = self.enter(identity)? {
            return Ok(is_fallible);
        }

        let spec = ensure_sufficient_stack(|| {
            synthesize_factory(decl, |field| {
                let requirement = Requirement::Field {
                    owner: identity.clone(),
                    field: field.name.clone(),
                };
                self.resolve_ref(&field.ty, &requirement)
            })
        })?;

        let is_fallible = spec.is_fallible;
        self.plan.factories.insert(identity.clone(), spec);

        self.leave(identity, is_fallible);
        Ok(is_fallible)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
