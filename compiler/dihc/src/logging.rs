//! Tracing subscriber setup.
//!
//! `RUST_LOG` drives the filter; `--verbose` adds `debug` for the generator
//! crates on top of it. `DIH_LOG_TREE=1` renders spans as an indented tree.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

const GENERATOR_CRATES: [&str; 4] = ["dih_resolve", "dih_codegen", "dih_compiler", "dihc"];

/// Filter directives for the given `RUST_LOG` value.
pub(crate) fn filter_directives(env: Option<&str>, verbose: bool) -> String {
    let mut directives = match env {
        Some(env) if !env.trim().is_empty() => env.trim().to_owned(),
        _ => "warn".to_owned(),
    };
    if verbose {
        for krate in GENERATOR_CRATES {
            directives.push_str(&format!(",{krate}=debug"));
        }
    }
    directives
}

pub(crate) fn init_tracing(verbose: bool) {
    let env = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::new(filter_directives(env.as_deref(), verbose));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os("DIH_LOG_TREE").is_some_and(|v| v == "1") {
        registry
            .with(HierarchicalLayer::new(2).with_targets(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
