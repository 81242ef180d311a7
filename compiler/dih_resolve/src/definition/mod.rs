//! Component definitions.
//!
//! A definition is an interface with two kinds of methods:
//!
//! - `modules`, which takes nothing and returns the modules to include,
//!   either as a tuple or as a plain result list;
//! - target accessors, which take nothing and return the value to build,
//!   optionally followed by the canonical error.
//!
//! A definition may instead declare `target`, returning another interface
//! whose methods are the targets. The generated component then implements
//! that interface.

use dih_ir::{MethodSig, TypeIdentity, TypeRef, TypeUniverse};
use tracing::debug;

use crate::ResolveError;

/// Reserved method listing a definition's modules, and a binding module's nested ones.
pub const MODULES_METHOD: &str = "modules";
/// Reserved method naming the interface the component implements.
pub const TARGET_METHOD: &str = "target";
/// Inherent methods the generated component always has, or has per provider.
const CONSTRUCTOR: &str = "new";
const PROVIDER_PREFIX: &str = "provides_";

/// A target accessor on the generated component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Accessor name.
    pub method: String,
    /// Declared result type.
    pub ty: TypeRef,
    /// Whether the declared signature returns an error.
    pub is_fallible: bool,
}

/// A validated component definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentDefinition {
    pub identity: TypeIdentity,
    /// Module references in declaration order.
    pub modules: Vec<TypeRef>,
    /// Targets in declaration order.
    pub targets: Vec<Target>,
    /// Interface the component implements, when declared through `target`.
    pub component_interface: Option<TypeIdentity>,
}

/// Find `package::name` and validate it as a definition.
///
/// # Errors
///
/// Fails when the definition is missing or is not an interface, when it has
/// no usable `modules` method, or when a target has an unsupported shape.
#[tracing::instrument(level = "debug", skip(universe))]
pub fn load_definition<U: TypeUniverse + ?Sized>(
    universe: &U,
    package: &str,
    name: &str,
) -> Result<ComponentDefinition, ResolveError> {
    let identity = TypeIdentity::new(package, name);
    let decl = universe
        .lookup(&identity)
        .ok_or_else(|| ResolveError::DefinitionNotFound(identity.clone()))?;
    if !decl.is_interface() {
        return Err(ResolveError::DefinitionNotInterface(identity));
    }

    let modules = decl
        .method(MODULES_METHOD)
        .filter(|m| m.params.is_empty())
        .map(|m| module_list(&m.results))
        .ok_or_else(|| ResolveError::MissingModulesMethod(identity.clone()))?;

    let (targets, component_interface) = match decl.method(TARGET_METHOD) {
        Some(method) => {
            let interface = component_interface(universe, method)?;
            let iface_decl = universe
                .lookup(&interface)
                .ok_or_else(|| ResolveError::DefinitionNotFound(interface.clone()))?;
            (extract_targets(iface_decl.methods())?, Some(interface))
        }
        None => {
            let targets = extract_targets(decl.methods())?;
            check_inherent_names(&targets)?;
            (targets, None)
        }
    };

    if targets.is_empty() {
        return Err(ResolveError::NoTargets(identity));
    }

    debug!(
        modules = modules.len(),
        targets = targets.len(),
        "loaded definition {identity}"
    );

    Ok(ComponentDefinition {
        identity,
        modules,
        targets,
        component_interface,
    })
}

/// Flatten a `modules` result list. A single tuple result lists its elements.
pub(crate) fn module_list(results: &[TypeRef]) -> Vec<TypeRef> {
    match results {
        [TypeRef::Tuple(items)] => items.clone(),
        _ => results.to_vec(),
    }
}

fn component_interface<U: TypeUniverse + ?Sized>(
    universe: &U,
    method: &MethodSig,
) -> Result<TypeIdentity, ResolveError> {
    if !method.params.is_empty() {
        return Err(ResolveError::TargetHasParameters {
            method: method.name.clone(),
            count: method.params.len(),
        });
    }
    match method.results.as_slice() {
        [TypeRef::Named(id)]
            if universe.lookup(id).is_some_and(dih_ir::TypeDecl::is_interface) =>
        {
            Ok(id.clone())
        }
        [ty] => Err(ResolveError::UnsupportedTargetType {
            method: method.name.clone(),
            ty: ty.clone(),
        }),
        _ => Err(ResolveError::InvalidTargetResults {
            method: method.name.clone(),
        }),
    }
}

/// Public methods other than the reserved ones, validated as targets.
fn extract_targets(methods: &[MethodSig]) -> Result<Vec<Target>, ResolveError> {
    methods
        .iter()
        .filter(|m| m.is_public() && m.name != MODULES_METHOD && m.name != TARGET_METHOD)
        .map(validate_target)
        .collect()
}

/// Targets declared on the definition itself become inherent methods of the
/// component and must not shadow its constructor or provider wrappers.
fn check_inherent_names(targets: &[Target]) -> Result<(), ResolveError> {
    match targets
        .iter()
        .find(|t| t.method == CONSTRUCTOR || t.method.starts_with(PROVIDER_PREFIX))
    {
        Some(target) => Err(ResolveError::ReservedTargetName {
            method: target.method.clone(),
        }),
        None => Ok(()),
    }
}

fn validate_target(method: &MethodSig) -> Result<Target, ResolveError> {
    if !method.params.is_empty() {
        return Err(ResolveError::TargetHasParameters {
            method: method.name.clone(),
            count: method.params.len(),
        });
    }

    let (ty, is_fallible) = match method.results.as_slice() {
        [ty] if !ty.is_error() => (ty, false),
        [ty, TypeRef::Error] if !ty.is_error() => (ty, true),
        _ => {
            return Err(ResolveError::InvalidTargetResults {
                method: method.name.clone(),
            })
        }
    };

    if ty.shape().is_none() {
        return Err(ResolveError::UnsupportedTargetType {
            method: method.name.clone(),
            ty: ty.clone(),
        });
    }

    Ok(Target {
        method: method.name.clone(),
        ty: ty.clone(),
        is_fallible,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
