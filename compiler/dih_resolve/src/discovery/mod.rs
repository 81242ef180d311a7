//! Module discovery.
//!
//! Walks the module graph reachable from a definition and builds the
//! [`Registry`] of providers and bindings the resolver draws from.
//!
//! - A reference to a struct is a *value module*. Each of its public methods
//!   is a provider returning one named value (or reference), optionally
//!   followed by the canonical error.
//! - An interface is a *binding module*. Each of its public methods binds an
//!   interface to a struct implementation, and it may include further modules
//!   through its own `modules` method.
//!
//! Traversal uses an explicit work stack and visits each module once, so
//! modules that include each other terminate.

use std::collections::BTreeMap;

use dih_ir::{MethodSig, Param, TypeDecl, TypeIdentity, TypeRef, TypeUniverse};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::definition::{module_list, MODULES_METHOD};
use crate::error::RegistrationSite;
use crate::ResolveError;

/// A value-module method that constructs a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider {
    /// Identity of the constructed type.
    pub provides: TypeIdentity,
    pub module: TypeIdentity,
    pub method: String,
    pub params: Vec<Param>,
    /// Declared result, `T` or `&T`.
    pub result: TypeRef,
    /// Whether the method returns an error alongside the value.
    pub is_fallible: bool,
}

impl Provider {
    pub fn site(&self) -> RegistrationSite {
        RegistrationSite::new(&self.module, &self.method)
    }

    /// Whether the value is provided by reference.
    pub fn is_reference(&self) -> bool {
        matches!(self.result, TypeRef::Pointer(_))
    }
}

/// A binding-module method mapping an interface to its implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub interface: TypeIdentity,
    pub implementation: TypeIdentity,
    pub module: TypeIdentity,
    pub method: String,
}

impl Binding {
    pub fn site(&self) -> RegistrationSite {
        RegistrationSite::new(&self.module, &self.method)
    }
}

/// A struct whose methods are providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueModule {
    pub identity: TypeIdentity,
    /// Passed into the generated constructor instead of default-constructed.
    pub is_provided: bool,
}

/// Everything discovery found, keyed by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    pub providers: BTreeMap<TypeIdentity, Provider>,
    pub bindings: BTreeMap<TypeIdentity, Binding>,
    pub value_modules: BTreeMap<TypeIdentity, ValueModule>,
}

impl Registry {
    pub fn provider(&self, identity: &TypeIdentity) -> Option<&Provider> {
        self.providers.get(identity)
    }

    pub fn binding(&self, identity: &TypeIdentity) -> Option<&Binding> {
        self.bindings.get(identity)
    }

    pub fn value_module(&self, identity: &TypeIdentity) -> Option<&ValueModule> {
        self.value_modules.get(identity)
    }

    /// Site that already registered `identity`, as a provider or a binding.
    fn registered_by(&self, identity: &TypeIdentity) -> Option<RegistrationSite> {
        self.providers
            .get(identity)
            .map(Provider::site)
            .or_else(|| self.bindings.get(identity).map(Binding::site))
    }

    fn check_unregistered(
        &self,
        identity: &TypeIdentity,
        site: &RegistrationSite,
    ) -> Result<(), ResolveError> {
        match self.registered_by(identity) {
            Some(first) => Err(ResolveError::DuplicateRegistration {
                identity: identity.clone(),
                first,
                second: site.clone(),
            }),
            None => Ok(()),
        }
    }

    fn add_provider(&mut self, provider: Provider) -> Result<(), ResolveError> {
        self.check_unregistered(&provider.provides, &provider.site())?;
        trace!("provider {} for {}", provider.site(), provider.provides);
        self.providers.insert(provider.provides.clone(), provider);
        Ok(())
    }

    fn add_binding(&mut self, binding: Binding) -> Result<(), ResolveError> {
        self.check_unregistered(&binding.interface, &binding.site())?;
        trace!("binding {} for {}", binding.site(), binding.interface);
        self.bindings.insert(binding.interface.clone(), binding);
        Ok(())
    }
}

/// Build the registry for the given top-level modules.
///
/// Modules are processed depth-first in declaration order; a binding module's
/// nested modules are processed before the modules declared after it.
///
/// # Errors
///
/// Fails on the first malformed module or method, and when two methods
/// register the same type.
#[tracing::instrument(level = "debug", skip_all, fields(modules = modules.len()))]
pub fn discover_modules<U: TypeUniverse + ?Sized>(
    universe: &U,
    modules: &[TypeRef],
) -> Result<Registry, ResolveError> {
    let mut registry = Registry::default();
    let mut seen = FxHashSet::default();
    let mut stack: Vec<TypeRef> = modules.iter().rev().cloned().collect();

    while let Some(module) = stack.pop() {
        match &module {
            TypeRef::Named(identity) => {
                let decl = lookup_module(universe, identity)?;
                if !decl.is_interface() {
                    return Err(ResolveError::UnsupportedModule(module.clone()));
                }
                if !seen.insert(identity.clone()) {
                    continue;
                }
                let nested = register_binding_module(universe, decl, &mut registry)?;
                stack.extend(nested.into_iter().rev());
            }
            TypeRef::Pointer(inner) => {
                let TypeRef::Named(identity) = inner.as_ref() else {
                    return Err(ResolveError::UnsupportedModule(module.clone()));
                };
                let decl = lookup_module(universe, identity)?;
                if !decl.is_struct() {
                    return Err(ResolveError::UnsupportedModule(module.clone()));
                }
                if !seen.insert(identity.clone()) {
                    continue;
                }
                register_value_module(universe, decl, &mut registry)?;
            }
            TypeRef::Slice(_)
            | TypeRef::Map(..)
            | TypeRef::Tuple(_)
            | TypeRef::Builtin(_)
            | TypeRef::Error => return Err(ResolveError::UnsupportedModule(module.clone())),
        }
    }

    debug!(
        providers = registry.providers.len(),
        bindings = registry.bindings.len(),
        value_modules = registry.value_modules.len(),
        "discovered modules"
    );
    Ok(registry)
}

fn lookup_module<'u, U: TypeUniverse + ?Sized>(
    universe: &'u U,
    identity: &TypeIdentity,
) -> Result<&'u TypeDecl, ResolveError> {
    universe
        .lookup(identity)
        .ok_or_else(|| ResolveError::ModuleNotFound(identity.clone()))
}

fn register_value_module<U: TypeUniverse + ?Sized>(
    universe: &U,
    decl: &TypeDecl,
    registry: &mut Registry,
) -> Result<(), ResolveError> {
    let module = &decl.identity;
    if decl.method(MODULES_METHOD).is_some() {
        return Err(ResolveError::ValueModuleDeclaresModules(module.clone()));
    }

    for method in decl.methods().iter().filter(|m| m.is_public()) {
        registry.add_provider(provider_from(universe, module, method)?)?;
    }

    registry.value_modules.insert(
        module.clone(),
        ValueModule {
            identity: module.clone(),
            is_provided: decl.is_provided_module(),
        },
    );
    Ok(())
}

fn provider_from<U: TypeUniverse + ?Sized>(
    universe: &U,
    module: &TypeIdentity,
    method: &MethodSig,
) -> Result<Provider, ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidProviderMethod {
        site: RegistrationSite::new(module, &method.name),
        reason: reason.to_owned(),
    };

    let (result, is_fallible) = match method.results.as_slice() {
        [result] => (result, false),
        [result, TypeRef::Error] => (result, true),
        [] => return Err(invalid("returns nothing")),
        _ => return Err(invalid("must return one value, optionally followed by an error")),
    };
    let shape = result
        .shape()
        .ok_or_else(|| invalid("must return a named type or a reference to one"))?;
    // Interfaces are already boxed trait objects.
    if shape.is_reference()
        && universe
            .lookup(shape.identity())
            .is_some_and(TypeDecl::is_interface)
    {
        return Err(invalid("must return an interface by value"));
    }

    Ok(Provider {
        provides: shape.identity().clone(),
        module: module.clone(),
        method: method.name.clone(),
        params: method.params.clone(),
        result: result.clone(),
        is_fallible,
    })
}

/// Register a binding module's bindings and return its nested modules.
fn register_binding_module<U: TypeUniverse + ?Sized>(
    universe: &U,
    decl: &TypeDecl,
    registry: &mut Registry,
) -> Result<Vec<TypeRef>, ResolveError> {
    let module = &decl.identity;
    let mut nested = Vec::new();

    for method in decl.methods().iter().filter(|m| m.is_public()) {
        if method.name == MODULES_METHOD {
            if !method.params.is_empty() {
                return Err(ResolveError::InvalidBindingMethod {
                    site: RegistrationSite::new(module, &method.name),
                    reason: "must take no parameters".to_owned(),
                });
            }
            nested = module_list(&method.results);
            continue;
        }
        registry.add_binding(binding_from(universe, module, method)?)?;
    }

    Ok(nested)
}

fn binding_from<U: TypeUniverse + ?Sized>(
    universe: &U,
    module: &TypeIdentity,
    method: &MethodSig,
) -> Result<Binding, ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidBindingMethod {
        site: RegistrationSite::new(module, &method.name),
        reason: reason.to_owned(),
    };

    let ([param], [result]) = (method.params.as_slice(), method.results.as_slice()) else {
        return Err(invalid("must take exactly one parameter and return exactly one value"));
    };

    let TypeRef::Named(interface) = result else {
        return Err(invalid("must return an interface by value"));
    };
    if !universe.lookup(interface).is_some_and(TypeDecl::is_interface) {
        return Err(invalid("must return an interface"));
    }

    let implementation = match param.ty.shape() {
        Some(shape) if shape.is_reference() => shape.identity(),
        _ => return Err(invalid("must take a reference to its implementation")),
    };
    if !universe.lookup(implementation).is_some_and(TypeDecl::is_struct) {
        return Err(invalid("must take a reference to a struct"));
    }

    Ok(Binding {
        interface: interface.clone(),
        implementation: implementation.clone(),
        module: module.clone(),
        method: method.name.clone(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
