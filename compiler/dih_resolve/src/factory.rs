//! Factory synthesis for injectable structs.

use dih_ir::{FieldDecl, TypeDecl};

use crate::plan::{FactorySpec, FieldAssignment, Source};
use crate::ResolveError;

/// Build the assignment plan for an injectable struct.
///
/// Public, non-skipped fields are assigned in declaration order; each is
/// resolved through `resolve_field`. The factory is fallible when any
/// assignment is.
///
/// # Errors
///
/// Propagates the first error returned by `resolve_field`.
pub fn synthesize_factory<F>(decl: &TypeDecl, mut resolve_field: F) -> Result<FactorySpec, ResolveError>
where
    F: FnMut(&FieldDecl) -> Result<Source, ResolveError>,
{
    let fields = decl
        .fields()
        .iter()
        .filter(|field| field.is_injected())
        .map(|field| {
            Ok(FieldAssignment {
                field: field.name.clone(),
                source: resolve_field(field)?,
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;

    let is_fallible = fields.iter().any(|f| f.source.is_fallible);
    Ok(FactorySpec {
        identity: decl.identity.clone(),
        fields,
        is_fallible,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use dih_ir::{TypeIdentity, TypeRef};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::plan::SourceKind;

    fn source_for(field: &FieldDecl, is_fallible: bool) -> Source {
        let shape = field.ty.shape().unwrap();
        Source {
            kind: SourceKind::Provider,
            identity: shape.identity().clone(),
            cast: None,
            is_fallible,
        }
    }

    fn service() -> TypeDecl {
        TypeDecl::structure(
            TypeIdentity::new("crate::app", "Service"),
            vec![
                FieldDecl::new("greeting", TypeRef::named("crate::app", "Greeting")),
                FieldDecl::new("cache", TypeRef::pointer_to("crate::app", "Cache")).skipped(),
                FieldDecl::new("store", TypeRef::pointer_to("crate::db", "Store")),
                FieldDecl::new("count", TypeRef::Builtin("u64".into())).private(),
            ],
        )
    }

    #[test]
    fn assigns_public_unskipped_fields_in_order() {
        let spec = synthesize_factory(&service(), |field| Ok(source_for(field, false))).unwrap();

        let names: Vec<_> = spec.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["greeting", "store"]);
        assert!(!spec.is_fallible);
    }

    #[test]
    fn one_fallible_field_makes_the_factory_fallible() {
        let spec =
            synthesize_factory(&service(), |field| Ok(source_for(field, field.name == "store")))
                .unwrap();
        assert!(spec.is_fallible);
    }

    #[test]
    fn struct_without_injected_fields_has_an_empty_plan() {
        let decl = TypeDecl::structure(TypeIdentity::new("crate::app", "Empty"), vec![]);
        let spec = synthesize_factory(&decl, |_| unreachable!()).unwrap();
        assert!(spec.fields.is_empty());
        assert!(!spec.is_fallible);
    }

    #[test]
    fn first_field_error_stops_synthesis() {
        let mut visited = Vec::new();
        let err = synthesize_factory(&service(), |field| {
            visited.push(field.name.clone());
            Err(ResolveError::NoTargets(TypeIdentity::new("crate::app", "X")))
        })
        .unwrap_err();

        assert_eq!(visited, vec!["greeting".to_owned()]);
        assert!(matches!(err, ResolveError::NoTargets(_)));
    }
}
