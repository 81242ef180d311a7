//! dihc - the dihedral code generator.
//!
//! Reads a type universe (JSON), resolves one component definition, and
//! writes the generated Rust module tree.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Some(code) = &cli.explain {
        return commands::explain_error(code);
    }

    match commands::generate(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
