use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use dih_ir::{MethodSig, TypeDecl, TypeIdentity, TypeRef, Universe};
use pretty_assertions::assert_eq;

use crate::cli::Cli;
use crate::commands::{artifact_path, build_config, generate, module_name, CliError};
use crate::logging::filter_directives;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dihc").chain(args.iter().copied())).unwrap()
}

fn clock_universe() -> Universe {
    let id = |name: &str| TypeIdentity::new("crate::app", name);
    Universe::new()
        .with_root_package("crate::app")
        .with(TypeDecl::interface(
            id("Component"),
            vec![
                MethodSig::new("modules").result(TypeRef::Tuple(vec![TypeRef::pointer_to(
                    "crate::app",
                    "ClockModule",
                )])),
                MethodSig::new("clock").result(TypeRef::named("crate::app", "Clock")),
            ],
        ))
        .unwrap()
        .with(
            TypeDecl::structure(id("ClockModule"), vec![]).with_method(
                MethodSig::new("system_clock").result(TypeRef::named("crate::app", "Clock")),
            ),
        )
        .unwrap()
        .with(TypeDecl::opaque(id("Clock")))
        .unwrap()
}

/// A fresh scratch directory under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dihc-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_universe(dir: &Path, universe: &Universe) -> PathBuf {
    let path = dir.join("universe.json");
    fs::write(&path, serde_json::to_string_pretty(universe).unwrap()).unwrap();
    path
}

#[test]
fn parses_defaults() {
    let cli = parse(&["--universe", "u.json", "--definition", "Component"]);

    assert_eq!(cli.universe, Some(PathBuf::from("u.json")));
    assert_eq!(cli.definition.as_deref(), Some("Component"));
    assert_eq!(cli.package, None);
    assert_eq!(cli.output, PathBuf::from("digen"));
    assert_eq!(cli.component_type, "GeneratedComponent");
    assert!(!cli.dry_run);
}

#[test]
fn explain_needs_no_universe() {
    let cli = parse(&["--explain", "E3001"]);
    assert_eq!(cli.explain.as_deref(), Some("E3001"));
    assert!(Cli::try_parse_from(["dihc"]).is_err());
}

#[test]
fn verbose_adds_debug_directives() {
    assert_eq!(filter_directives(None, false), "warn");
    assert_eq!(filter_directives(Some("  "), false), "warn");
    assert_eq!(filter_directives(Some("info"), false), "info");
    assert_eq!(
        filter_directives(Some("info"), true),
        "info,dih_resolve=debug,dih_codegen=debug,dih_compiler=debug,dihc=debug"
    );
}

#[test]
fn output_paths() {
    assert_eq!(module_name(Path::new("src/digen")).as_deref(), Some("digen"));
    assert_eq!(module_name(Path::new("/")), None);
    assert_eq!(
        artifact_path(Path::new("src/digen"), "crate__app__Clock_Provider"),
        PathBuf::from("src/digen/crate__app__Clock_Provider.rs")
    );
}

#[test]
fn package_defaults_to_root_package() {
    let cli = parse(&[
        "--universe",
        "u.json",
        "--definition",
        "Component",
        "--output",
        "src/wiring",
    ]);

    let config = build_config(&cli, &clock_universe()).unwrap();

    assert_eq!(config.package, "crate::app");
    assert_eq!(config.definition, "Component");
    assert_eq!(config.output_module, "wiring");
}

#[test]
fn missing_root_package_is_an_error() {
    let cli = parse(&["--universe", "u.json", "--definition", "Component"]);

    let err = build_config(&cli, &Universe::new()).unwrap_err();

    assert!(matches!(err, CliError::NoPackage { .. }));
}

#[test]
fn writes_every_artifact() {
    let dir = scratch("write");
    let universe_path = write_universe(&dir, &clock_universe());
    let output = dir.join("digen");
    let cli = parse(&[
        "--universe",
        universe_path.to_str().unwrap(),
        "--definition",
        "Component",
        "--output",
        output.to_str().unwrap(),
    ]);

    generate(&cli).unwrap();

    let mut written: Vec<_> = fs::read_dir(&output)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec!["component.rs", "crate__app__Clock_Provider.rs", "mod.rs"]
    );
    let root = fs::read_to_string(output.join("mod.rs")).unwrap();
    assert!(root.starts_with("// Code generated by dihc. DO NOT EDIT.\n"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn dry_run_writes_nothing() {
    let dir = scratch("dry-run");
    let universe_path = write_universe(&dir, &clock_universe());
    let output = dir.join("digen");
    let cli = parse(&[
        "--universe",
        universe_path.to_str().unwrap(),
        "--definition",
        "Component",
        "--output",
        output.to_str().unwrap(),
        "--dry-run",
    ]);

    generate(&cli).unwrap();

    assert!(!output.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unreadable_universe_is_reported() {
    let cli = parse(&[
        "--universe",
        "/nonexistent/dihc/universe.json",
        "--definition",
        "Component",
    ]);

    let err = generate(&cli).unwrap_err();

    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().starts_with("cannot read `/nonexistent/dihc/universe.json`"));
}
