//! Resolution errors and their diagnostics.

use std::fmt;

use dih_diagnostic::{Diagnostic, ErrorCode};
use dih_ir::{TypeIdentity, TypeRef};

/// The module method that registered a provider or binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationSite {
    pub module: TypeIdentity,
    pub method: String,
}

impl RegistrationSite {
    pub fn new(module: &TypeIdentity, method: &str) -> Self {
        RegistrationSite {
            module: module.clone(),
            method: method.to_owned(),
        }
    }
}

impl fmt::Display for RegistrationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.method)
    }
}

/// What asked for a dependency.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// A target accessor of the definition.
    Target { method: String },
    /// A field of an injectable struct.
    Field { owner: TypeIdentity, field: String },
    /// A parameter of a provider method.
    Parameter { site: RegistrationSite, param: String },
    /// The implementation side of a binding.
    Binding { interface: TypeIdentity },
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Target { method } => write!(f, "target `{method}`"),
            Requirement::Field { owner, field } => write!(f, "field `{field}` of `{owner}`"),
            Requirement::Parameter { site, param } => {
                write!(f, "parameter `{param}` of provider `{site}`")
            }
            Requirement::Binding { interface } => write!(f, "the binding for `{interface}`"),
        }
    }
}

/// Broad failure category, independent of the precise error code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingDefinition,
    InvalidTargetShape,
    UnsupportedShape,
    DuplicateRegistration,
    UnresolvedDependency,
    CyclicDependency,
}

/// A failure in definition loading, module discovery, or graph resolution.
///
/// Resolution stops at the first error; nothing is emitted for a run that
/// produced one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("definition `{0}` not found")]
    DefinitionNotFound(TypeIdentity),

    #[error("definition `{0}` is not an interface")]
    DefinitionNotInterface(TypeIdentity),

    #[error("definition `{0}` has no zero-argument `modules` method")]
    MissingModulesMethod(TypeIdentity),

    #[error("definition `{0}` declares no targets")]
    NoTargets(TypeIdentity),

    #[error("target `{method}` takes {count} parameter(s)")]
    TargetHasParameters { method: String, count: usize },

    #[error("target `{method}` must return one value, optionally followed by an error")]
    InvalidTargetResults { method: String },

    #[error("target `{method}` returns `{ty}`, which is not a named type or a reference to one")]
    UnsupportedTargetType { method: String, ty: TypeRef },

    #[error("target `{method}` clashes with a generated method of the component")]
    ReservedTargetName { method: String },

    #[error("target `{method}` cannot fail, but provider `{provider}` in its dependency chain can")]
    FallibleChainInInfallibleTarget {
        method: String,
        provider: RegistrationSite,
    },

    #[error("module `{0}` is neither a reference to a struct nor an interface")]
    UnsupportedModule(TypeRef),

    #[error("module `{0}` is not declared")]
    ModuleNotFound(TypeIdentity),

    #[error("provider `{site}` {reason}")]
    InvalidProviderMethod {
        site: RegistrationSite,
        reason: String,
    },

    #[error("binding `{site}` {reason}")]
    InvalidBindingMethod {
        site: RegistrationSite,
        reason: String,
    },

    #[error("value module `{0}` declares nested modules")]
    ValueModuleDeclaresModules(TypeIdentity),

    #[error("`{identity}` is registered by both `{first}` and `{second}`")]
    DuplicateRegistration {
        identity: TypeIdentity,
        first: RegistrationSite,
        second: RegistrationSite,
    },

    #[error("no provider, binding, or injectable struct for `{ty}` required by {required_by}")]
    UnresolvedDependency {
        ty: TypeRef,
        required_by: Requirement,
        chain: Vec<TypeIdentity>,
    },

    #[error("cyclic dependency: {}", display_chain(.chain))]
    CyclicDependency { chain: Vec<TypeIdentity> },

    #[error("`{ty}` required by {required_by} is not a named type or a reference to one")]
    UnsupportedDependencyShape { ty: TypeRef, required_by: Requirement },

    #[error("{required_by} requests `{ty}`, but it is provided as `{provided}`")]
    ReferenceMismatch {
        ty: TypeRef,
        provided: TypeRef,
        required_by: Requirement,
    },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::DefinitionNotFound(_) | ResolveError::DefinitionNotInterface(_) => {
                ErrorCode::E1001
            }
            ResolveError::TargetHasParameters { .. } => ErrorCode::E1002,
            ResolveError::InvalidTargetResults { .. } => ErrorCode::E1003,
            ResolveError::UnsupportedTargetType { .. } => ErrorCode::E1004,
            ResolveError::FallibleChainInInfallibleTarget { .. } => ErrorCode::E1005,
            ResolveError::ReservedTargetName { .. } => ErrorCode::E1008,
            ResolveError::MissingModulesMethod(_) => ErrorCode::E1006,
            ResolveError::NoTargets(_) => ErrorCode::E1007,
            ResolveError::UnsupportedModule(_) => ErrorCode::E2001,
            ResolveError::InvalidProviderMethod { .. } => ErrorCode::E2002,
            ResolveError::InvalidBindingMethod { .. } => ErrorCode::E2003,
            ResolveError::ValueModuleDeclaresModules(_) => ErrorCode::E2004,
            ResolveError::DuplicateRegistration { .. } => ErrorCode::E2005,
            ResolveError::ModuleNotFound(_) => ErrorCode::E2006,
            ResolveError::UnresolvedDependency { .. } => ErrorCode::E3001,
            ResolveError::CyclicDependency { .. } => ErrorCode::E3002,
            ResolveError::UnsupportedDependencyShape { .. } => ErrorCode::E3003,
            ResolveError::ReferenceMismatch { .. } => ErrorCode::E3004,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::DefinitionNotFound(_)
            | ResolveError::DefinitionNotInterface(_)
            | ResolveError::ModuleNotFound(_) => ErrorKind::MissingDefinition,
            ResolveError::MissingModulesMethod(_)
            | ResolveError::NoTargets(_)
            | ResolveError::TargetHasParameters { .. }
            | ResolveError::InvalidTargetResults { .. }
            | ResolveError::UnsupportedTargetType { .. }
            | ResolveError::ReservedTargetName { .. }
            | ResolveError::FallibleChainInInfallibleTarget { .. } => {
                ErrorKind::InvalidTargetShape
            }
            ResolveError::UnsupportedModule(_)
            | ResolveError::InvalidProviderMethod { .. }
            | ResolveError::InvalidBindingMethod { .. }
            | ResolveError::ValueModuleDeclaresModules(_)
            | ResolveError::UnsupportedDependencyShape { .. }
            | ResolveError::ReferenceMismatch { .. } => ErrorKind::UnsupportedShape,
            ResolveError::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
            ResolveError::UnresolvedDependency { .. } => ErrorKind::UnresolvedDependency,
            ResolveError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
        }
    }

    /// Convert to a diagnostic with notes and suggestions.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());

        match self {
            ResolveError::DefinitionNotFound(_) => {
                diag.with_suggestion("check `--package` and `--definition`")
            }
            ResolveError::MissingModulesMethod(_) => {
                diag.with_suggestion("add `fn modules(&self) -> (...)` listing the modules")
            }
            ResolveError::TargetHasParameters { .. } => {
                diag.with_suggestion("remove the parameters; targets are built from modules")
            }
            ResolveError::ReservedTargetName { .. } => diag.with_suggestion(
                "rename the target, or declare targets on an interface returned by `target`",
            ),
            ResolveError::FallibleChainInInfallibleTarget { method, .. } => diag
                .with_suggestion(format!("declare `{method}` as returning a `Result`")),
            ResolveError::DuplicateRegistration { first, .. } => diag
                .with_note(format!("first registered by `{first}`"))
                .with_suggestion("remove one of the registrations"),
            ResolveError::UnresolvedDependency { ty, chain, .. } => {
                let diag = if chain.is_empty() {
                    diag
                } else {
                    diag.with_note(format!("while resolving {}", display_chain(chain)))
                };
                match ty.shape() {
                    Some(shape) if shape.is_reference() => diag.with_suggestion(format!(
                        "add a provider for `{ty}`, or mark `{}` as injectable",
                        shape.identity()
                    )),
                    _ => diag.with_suggestion(format!("add a provider or binding for `{ty}`")),
                }
            }
            ResolveError::CyclicDependency { .. } => diag.with_suggestion(
                "break the cycle with a provider that constructs one side explicitly",
            ),
            ResolveError::ReferenceMismatch { provided, .. } => {
                diag.with_suggestion(format!("request the dependency as `{provided}`"))
            }
            ResolveError::DefinitionNotInterface(_)
            | ResolveError::NoTargets(_)
            | ResolveError::InvalidTargetResults { .. }
            | ResolveError::UnsupportedTargetType { .. }
            | ResolveError::UnsupportedModule(_)
            | ResolveError::ModuleNotFound(_)
            | ResolveError::InvalidProviderMethod { .. }
            | ResolveError::InvalidBindingMethod { .. }
            | ResolveError::ValueModuleDeclaresModules(_)
            | ResolveError::UnsupportedDependencyShape { .. } => diag,
        }
    }
}

/// Render `a -> b -> a`.
pub(crate) fn display_chain(chain: &[TypeIdentity]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
