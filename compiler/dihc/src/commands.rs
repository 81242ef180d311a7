//! Command implementations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dih_compiler::{generate as run_pipeline, render_diagnostics, GenerateConfig};
use dih_diagnostic::ErrorCode;
use dih_ir::Universe;
use tracing::{debug, info};

use crate::cli::Cli;

/// Failures outside the generator itself: files and arguments.
#[derive(thiserror::Error, Debug)]
pub(crate) enum CliError {
    #[error("missing required argument `--{0}`")]
    MissingArgument(&'static str),

    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid universe file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no `--package` given and `{}` declares no root package", path.display())]
    NoPackage { path: PathBuf },

    #[error("cannot derive a module name from output directory `{}`", path.display())]
    NoModuleName { path: PathBuf },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub(crate) fn explain_error(code: &str) -> ExitCode {
    let Ok(code) = code.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit, e.g. E1001, E3001.");
        return ExitCode::FAILURE;
    };
    println!("{code}: {}", code.description());
    ExitCode::SUCCESS
}

pub(crate) fn load_universe(path: &Path) -> Result<Universe, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Last path component of the output directory.
pub(crate) fn module_name(output: &Path) -> Option<String> {
    output
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
}

pub(crate) fn artifact_path(output: &Path, artifact: &str) -> PathBuf {
    output.join(format!("{artifact}.rs"))
}

pub(crate) fn build_config(cli: &Cli, universe: &Universe) -> Result<GenerateConfig, CliError> {
    let universe_path = cli
        .universe
        .clone()
        .ok_or(CliError::MissingArgument("universe"))?;
    let definition = cli
        .definition
        .clone()
        .ok_or(CliError::MissingArgument("definition"))?;
    let package = match &cli.package {
        Some(package) => package.clone(),
        None => universe
            .root_package()
            .map(str::to_owned)
            .ok_or(CliError::NoPackage {
                path: universe_path,
            })?,
    };
    let output_module = module_name(&cli.output).ok_or_else(|| CliError::NoModuleName {
        path: cli.output.clone(),
    })?;

    Ok(GenerateConfig {
        package,
        definition,
        output_module,
        component_type: cli.component_type.clone(),
    })
}

pub(crate) fn generate(cli: &Cli) -> Result<ExitCode, CliError> {
    let universe_path = cli
        .universe
        .as_deref()
        .ok_or(CliError::MissingArgument("universe"))?;
    let universe = load_universe(universe_path)?;
    debug!(types = universe.len(), "universe loaded");

    let config = build_config(cli, &universe)?;
    let output = run_pipeline(&universe, &config);

    if !output.success {
        eprint!("{}", render_diagnostics(&output.diagnostics));
        return Ok(ExitCode::FAILURE);
    }

    if let Some(summary) = &output.plan_summary {
        info!(%summary, "resolved");
    }

    if cli.dry_run {
        for name in output.artifacts.keys() {
            println!("{}", artifact_path(&cli.output, name).display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    fs::create_dir_all(&cli.output).map_err(|source| CliError::Write {
        path: cli.output.clone(),
        source,
    })?;
    for (name, source_text) in &output.artifacts {
        let path = artifact_path(&cli.output, name);
        fs::write(&path, source_text).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote artifact");
    }
    info!(
        artifacts = output.artifacts.len(),
        dir = %cli.output.display(),
        "generated"
    );
    Ok(ExitCode::SUCCESS)
}
