use pretty_assertions::assert_eq;

use super::*;
use crate::{FieldDecl, FieldTag, MethodSig, TypeFlags, TypeKind, TypeRef, Visibility};

const SAMPLE: &str = r#"{
    "root_package": "crate::app",
    "types": [
        {
            "path": "crate::app",
            "name": "Service",
            "kind": "struct",
            "flags": "INJECT",
            "fields": [
                { "name": "timeout", "type": { "named": { "path": "crate::app", "name": "Timeout" } } },
                { "name": "cache", "type": { "builtin": "String" }, "tag": "skip" },
                { "name": "secret", "type": { "builtin": "String" }, "visibility": "private" }
            ]
        },
        {
            "path": "crate::app",
            "name": "Timeout",
            "kind": "opaque"
        },
        {
            "path": "crate::app",
            "name": "AppModule",
            "kind": "struct",
            "flags": "PROVIDED_MODULE",
            "methods": [
                {
                    "name": "provides_timeout",
                    "results": [ { "named": { "path": "crate::app", "name": "Timeout" } }, "error" ]
                }
            ]
        }
    ]
}"#;

#[test]
fn loads_universe_from_json() {
    let universe: Universe = serde_json::from_str(SAMPLE).unwrap();

    assert_eq!(universe.len(), 3);
    assert_eq!(universe.root_package(), Some("crate::app"));

    let service = universe.find("crate::app", "Service").unwrap();
    assert!(service.is_injectable());
    assert_eq!(
        service.fields().iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["timeout", "cache", "secret"]
    );
    assert_eq!(service.fields()[1].tag, FieldTag::Skip);
    assert_eq!(service.fields()[2].visibility, Visibility::Private);
    assert_eq!(
        service
            .fields()
            .iter()
            .filter(|f| f.is_injected())
            .count(),
        1
    );

    let module = universe.find("crate::app", "AppModule").unwrap();
    assert!(module.is_provided_module());
    let method = module.method("provides_timeout").unwrap();
    assert_eq!(
        method.results,
        vec![TypeRef::named("crate::app", "Timeout"), TypeRef::Error]
    );

    let timeout = universe.find("crate::app", "Timeout").unwrap();
    assert!(matches!(timeout.kind, TypeKind::Opaque { .. }));
}

#[test]
fn rejects_duplicate_declarations() {
    let id = TypeIdentity::new("crate::app", "Service");
    let mut universe = Universe::new();
    universe
        .insert(TypeDecl::structure(id.clone(), Vec::new()))
        .unwrap();

    let err = universe
        .insert(TypeDecl::interface(id.clone(), Vec::new()))
        .unwrap_err();
    assert_eq!(err, UniverseError::DuplicateType(id));
}

#[test]
fn duplicate_in_file_fails_to_load() {
    let json = r#"{ "types": [
        { "path": "a", "name": "B", "kind": "opaque" },
        { "path": "a", "name": "B", "kind": "opaque" }
    ] }"#;
    let err = serde_json::from_str::<Universe>(json).unwrap_err();
    assert!(err.to_string().contains("declared more than once"), "{err}");
}

#[test]
fn builder_round_trips_through_json() {
    let universe = Universe::new()
        .with_root_package("crate::app")
        .with(
            TypeDecl::structure(
                TypeIdentity::new("crate::app", "Service"),
                vec![FieldDecl::new("timeout", TypeRef::named("crate::app", "Timeout")).skipped()],
            )
            .with_flags(TypeFlags::INJECT),
        )
        .unwrap()
        .with(
            TypeDecl::interface(TypeIdentity::new("crate::app", "Store"), Vec::new())
                .with_method(MethodSig::new("get").result(TypeRef::Builtin("String".into()))),
        )
        .unwrap();

    let json = serde_json::to_string(&universe).unwrap();
    let reloaded: Universe = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, universe);
}
