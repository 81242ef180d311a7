use dih_ir::{FieldDecl, MethodSig, TypeDecl, TypeFlags, TypeIdentity, TypeRef, Universe};
use dih_resolve::{resolve_component, ResolutionPlan, SourceKind};
use pretty_assertions::assert_eq;

use super::*;

const APP: &str = "crate::app";
const DB: &str = "crate::db";

fn app(name: &str) -> TypeIdentity {
    TypeIdentity::new(APP, name)
}

fn db(name: &str) -> TypeIdentity {
    TypeIdentity::new(DB, name)
}

fn build(decls: Vec<TypeDecl>) -> Universe {
    decls
        .into_iter()
        .fold(Universe::new(), |u, decl| u.with(decl).unwrap())
}

/// Two providers, one binding, and an injectable service.
fn service_universe(targets: Vec<MethodSig>) -> Universe {
    let modules = MethodSig::new("modules").result(TypeRef::Tuple(vec![
        TypeRef::pointer_to(APP, "ServiceModule"),
        TypeRef::named(DB, "StoreBindings"),
    ]));
    let definition = targets
        .into_iter()
        .fold(TypeDecl::interface(app("ServiceComponent"), vec![modules]), TypeDecl::with_method);

    build(vec![
        definition,
        TypeDecl::opaque(app("Greeting")),
        TypeDecl::opaque(app("Timeout")),
        TypeDecl::structure(app("ServiceModule"), vec![])
            .with_method(MethodSig::new("provide_greeting").result(TypeRef::named(APP, "Greeting")))
            .with_method(MethodSig::new("provide_timeout").result(TypeRef::named(APP, "Timeout"))),
        TypeDecl::interface(
            db("StoreBindings"),
            vec![MethodSig::new("binds_memory")
                .param("store", TypeRef::pointer_to(DB, "MemoryStore"))
                .result(TypeRef::named(DB, "Store"))],
        ),
        TypeDecl::interface(db("Store"), vec![]),
        TypeDecl::structure(db("MemoryStore"), vec![]).with_flags(TypeFlags::INJECT),
        TypeDecl::structure(
            app("Service"),
            vec![
                FieldDecl::new("greeting", TypeRef::named(APP, "Greeting")),
                FieldDecl::new("timeout", TypeRef::named(APP, "Timeout")),
                FieldDecl::new("store", TypeRef::named(DB, "Store")),
            ],
        )
        .with_flags(TypeFlags::INJECT),
    ])
}

fn service_target() -> MethodSig {
    MethodSig::new("service").result(TypeRef::pointer_to(APP, "Service"))
}

fn plan_for(u: &Universe) -> ResolutionPlan {
    resolve_component(u, APP, "ServiceComponent").unwrap()
}

fn emit_default(u: &Universe) -> Artifacts {
    emit(&plan_for(u), u, &EmitConfig::default()).unwrap()
}

#[test]
fn artifact_names() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    let names: Vec<_> = artifacts.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "component",
            "crate__app__Greeting_Provider",
            "crate__app__Service_Factory",
            "crate__app__Timeout_Provider",
            "crate__db__MemoryStore_Factory",
            "mod",
        ]
    );
}

#[test]
fn component_artifact() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    assert_eq!(
        artifacts["component"],
        "// Code generated by dihc. DO NOT EDIT.

use crate::app as di_import_1;

pub struct GeneratedComponent {
    pub(super) crate__app__ServiceModule: di_import_1::ServiceModule,
}

impl GeneratedComponent {
    pub fn new() -> Self {
        GeneratedComponent {
            crate__app__ServiceModule: di_import_1::ServiceModule::default(),
        }
    }

    pub fn service(&self) -> Box<di_import_1::Service> {
        super::crate__app__Service_Factory::factory_crate__app__Service(self)
    }
}
"
    );
}

#[test]
fn factory_assigns_fields_in_order_and_casts_bindings() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    assert_eq!(
        artifacts["crate__app__Service_Factory"],
        "// Code generated by dihc. DO NOT EDIT.

use super::GeneratedComponent;
use crate::app as di_import_1;
use crate::db as di_import_2;

pub(super) fn factory_crate__app__Service(component: &GeneratedComponent) -> Box<di_import_1::Service> {
    let mut target = Box::new(di_import_1::Service::default());
    target.greeting = component.provides_crate__app__Greeting();
    target.timeout = component.provides_crate__app__Timeout();
    target.store = super::crate__db__MemoryStore_Factory::factory_crate__db__MemoryStore(component) as Box<dyn di_import_2::Store>;
    target
}
"
    );
}

#[test]
fn factory_without_fields() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    assert_eq!(
        artifacts["crate__db__MemoryStore_Factory"],
        "// Code generated by dihc. DO NOT EDIT.

use super::GeneratedComponent;
use crate::db as di_import_1;

pub(super) fn factory_crate__db__MemoryStore(_component: &GeneratedComponent) -> Box<di_import_1::MemoryStore> {
    Box::new(di_import_1::MemoryStore::default())
}
"
    );
}

#[test]
fn provider_wrapper() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    assert_eq!(
        artifacts["crate__app__Greeting_Provider"],
        "// Code generated by dihc. DO NOT EDIT.

use super::GeneratedComponent;
use crate::app as di_import_1;

impl GeneratedComponent {
    pub(super) fn provides_crate__app__Greeting(&self) -> di_import_1::Greeting {
        self.crate__app__ServiceModule.provide_greeting()
    }
}
"
    );
}

#[test]
fn module_root() {
    let artifacts = emit_default(&service_universe(vec![service_target()]));

    assert_eq!(
        artifacts["mod"],
        "// Code generated by dihc. DO NOT EDIT.
// Component: crate::app::ServiceComponent

#![allow(non_snake_case, dead_code)]

mod component;
mod crate__app__Greeting_Provider;
mod crate__app__Service_Factory;
mod crate__app__Timeout_Provider;
mod crate__db__MemoryStore_Factory;

pub use component::GeneratedComponent;

/// Error returned by fallible providers and accessors.
pub type DiError = Box<dyn std::error::Error + Send + Sync>;
"
    );
}

#[test]
fn interface_target_is_cast_in_the_accessor() {
    let store = MethodSig::new("store").result(TypeRef::named(DB, "Store"));
    let artifacts = emit_default(&service_universe(vec![store]));

    let component = &artifacts["component"];
    assert!(component.contains(
        "    pub fn store(&self) -> Box<dyn di_import_1::Store> {\n        \
         super::crate__db__MemoryStore_Factory::factory_crate__db__MemoryStore(self) \
         as Box<dyn di_import_1::Store>\n    }\n"
    ));
    // No provider was used, so the component holds no modules.
    assert!(component.contains("pub struct GeneratedComponent {\n}\n"));
}

#[test]
fn component_interface_is_implemented() {
    let mut u = service_universe(vec![]);
    let definition = TypeDecl::interface(
        app("Wired"),
        vec![
            MethodSig::new("modules").result(TypeRef::Tuple(vec![TypeRef::pointer_to(
                APP,
                "ServiceModule",
            )])),
            MethodSig::new("target").result(TypeRef::named(APP, "App")),
        ],
    );
    u.insert(definition).unwrap();
    u.insert(TypeDecl::interface(
        app("App"),
        vec![MethodSig::new("greeting").result(TypeRef::named(APP, "Greeting"))],
    ))
    .unwrap();

    let plan = resolve_component(&u, APP, "Wired").unwrap();
    let artifacts = emit(&plan, &u, &EmitConfig::default()).unwrap();

    let component = &artifacts["component"];
    assert!(component.contains("impl di_import_1::App for GeneratedComponent {\n"));
    assert!(component.contains(
        "    fn greeting(&self) -> di_import_1::Greeting {\n        \
         self.provides_crate__app__Greeting()\n    }\n"
    ));
    assert!(!component.contains("pub fn greeting"));
}

fn fallible_universe() -> Universe {
    let modules = MethodSig::new("modules").result(TypeRef::Tuple(vec![
        TypeRef::pointer_to(APP, "StoreModule"),
        TypeRef::pointer_to(APP, "PrefixModule"),
    ]));
    let checked = MethodSig::new("service")
        .result(TypeRef::pointer_to(APP, "Service"))
        .result(TypeRef::Error);
    build(vec![
        TypeDecl::interface(app("ServiceComponent"), vec![modules, checked]),
        TypeDecl::structure(app("StoreModule"), vec![]).with_method(
            MethodSig::new("open_store")
                .param("prefix", TypeRef::named(APP, "Prefix"))
                .result(TypeRef::pointer_to(APP, "Store"))
                .result(TypeRef::Error),
        ),
        TypeDecl::structure(app("PrefixModule"), vec![])
            .with_flags(TypeFlags::PROVIDED_MODULE)
            .with_method(MethodSig::new("prefix").result(TypeRef::named(APP, "Prefix"))),
        TypeDecl::structure(
            app("Service"),
            vec![
                FieldDecl::new("prefix", TypeRef::named(APP, "Prefix")),
                FieldDecl::new("store", TypeRef::pointer_to(APP, "Store")),
                FieldDecl::new("after", TypeRef::named(APP, "Prefix")),
            ],
        )
        .with_flags(TypeFlags::INJECT),
    ])
}

#[test]
fn fallible_provider_threads_results() {
    let u = fallible_universe();
    let artifacts = emit_default(&u);

    assert_eq!(
        artifacts["crate__app__Service_Factory"],
        "// Code generated by dihc. DO NOT EDIT.

use super::GeneratedComponent;
use super::DiError;
use crate::app as di_import_1;

pub(super) fn factory_crate__app__Service(component: &GeneratedComponent) -> Result<Box<di_import_1::Service>, DiError> {
    let mut target = Box::new(di_import_1::Service::default());
    target.prefix = component.provides_crate__app__Prefix();
    target.store = component.provides_crate__app__Store()?;
    target.after = component.provides_crate__app__Prefix();
    Ok(target)
}
"
    );

    assert_eq!(
        artifacts["crate__app__Store_Provider"],
        "// Code generated by dihc. DO NOT EDIT.

use super::GeneratedComponent;
use super::DiError;
use crate::app as di_import_1;

impl GeneratedComponent {
    pub(super) fn provides_crate__app__Store(&self) -> Result<Box<di_import_1::Store>, DiError> {
        let param0 = self.provides_crate__app__Prefix();
        Ok(self.crate__app__StoreModule.open_store(param0)?)
    }
}
"
    );

    let component = &artifacts["component"];
    assert!(component.contains("use super::DiError;\n"));
    assert!(component.contains(
        "    pub fn service(&self) -> Result<Box<di_import_1::Service>, DiError> {\n        \
         Ok(super::crate__app__Service_Factory::factory_crate__app__Service(self)?)\n    }\n"
    ));
}

#[test]
fn provided_modules_become_constructor_parameters() {
    let u = fallible_universe();
    let plan = plan_for(&u);
    let artifacts = emit(&plan, &u, &EmitConfig::default()).unwrap();

    // Modules are listed in the order their first provider was resolved.
    let modules: Vec<_> = plan.modules.iter().map(|m| m.identity.name.as_str()).collect();
    assert_eq!(modules, vec!["PrefixModule", "StoreModule"]);

    let component = &artifacts["component"];
    assert!(component.contains(
        "    pub fn new(crate__app__PrefixModule: di_import_1::PrefixModule) -> Self {\n        \
         GeneratedComponent {\n            \
         crate__app__PrefixModule,\n            \
         crate__app__StoreModule: di_import_1::StoreModule::default(),\n        \
         }\n    }\n"
    ));
}

#[test]
fn custom_component_type() {
    let u = service_universe(vec![service_target()]);
    let config = EmitConfig {
        component_type: "AppComponent".into(),
    };
    let artifacts = emit(&plan_for(&u), &u, &config).unwrap();

    assert!(artifacts["component"].contains("pub struct AppComponent {"));
    assert!(artifacts["crate__app__Greeting_Provider"].contains("impl AppComponent {"));
    assert!(artifacts["mod"].contains("pub use component::AppComponent;"));
}

#[test]
fn invalid_component_type_is_rejected() {
    let u = service_universe(vec![service_target()]);
    for bad in ["", "1st", "my-component", "_"] {
        let config = EmitConfig {
            component_type: bad.into(),
        };
        let err = emit(&plan_for(&u), &u, &config).unwrap_err();
        assert_eq!(err, EmitError::InvalidComponentType(bad.into()));
        assert_eq!(err.to_diagnostic().code, ErrorCode::E9002);
    }
}

#[test]
fn dangling_source_is_an_internal_error() {
    let u = service_universe(vec![service_target()]);
    let mut plan = plan_for(&u);
    plan.factories.remove(&db("MemoryStore"));

    let err = emit(&plan, &u, &EmitConfig::default()).unwrap_err();

    assert_eq!(
        err,
        EmitError::DanglingSource {
            kind: "factory",
            identity: db("MemoryStore"),
        }
    );
    assert_eq!(plan.targets[0].source.kind, SourceKind::Factory);
}

#[test]
fn emission_is_deterministic() {
    let u = service_universe(vec![
        service_target(),
        MethodSig::new("store").result(TypeRef::named(DB, "Store")),
    ]);
    assert_eq!(emit_default(&u), emit_default(&u));
}

#[test]
fn keyword_names_are_raw_identifiers() {
    let modules = MethodSig::new("modules").result(TypeRef::Tuple(vec![TypeRef::pointer_to(
        APP,
        "KindModule",
    )]));
    let u = build(vec![
        TypeDecl::interface(app("KeywordComponent"), vec![modules]).with_method(
            MethodSig::new("type").result(TypeRef::pointer_to(APP, "Holder")),
        ),
        TypeDecl::opaque(app("Kind")),
        TypeDecl::structure(app("KindModule"), vec![])
            .with_method(MethodSig::new("match").result(TypeRef::named(APP, "Kind"))),
        TypeDecl::structure(
            app("Holder"),
            vec![FieldDecl::new("type", TypeRef::named(APP, "Kind"))],
        )
        .with_flags(TypeFlags::INJECT),
    ]);
    let plan = resolve_component(&u, APP, "KeywordComponent").unwrap();

    let artifacts = emit(&plan, &u, &EmitConfig::default()).unwrap();

    assert!(artifacts["crate__app__Holder_Factory"]
        .contains("    target.r#type = component.provides_crate__app__Kind();\n"));
    assert!(artifacts["component"].contains("    pub fn r#type(&self) -> Box<di_import_1::Holder> {\n"));
    assert!(artifacts["crate__app__Kind_Provider"]
        .contains("        self.crate__app__KindModule.r#match()\n"));
}
