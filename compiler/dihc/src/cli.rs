//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Generate a dependency injection component from a type universe.
#[derive(Parser, Debug)]
#[command(name = "dihc")]
#[command(version)]
pub struct Cli {
    /// Type universe file (JSON)
    #[arg(short, long, required_unless_present = "explain")]
    pub universe: Option<PathBuf>,

    /// Name of the component definition interface
    #[arg(short, long, required_unless_present = "explain")]
    pub definition: Option<String>,

    /// Package declaring the definition [default: the universe's root package]
    #[arg(short, long)]
    pub package: Option<String>,

    /// Directory receiving the generated module; its name is the module name
    #[arg(short, long, default_value = "digen")]
    pub output: PathBuf,

    /// Name of the generated component struct
    #[arg(long, default_value = "GeneratedComponent")]
    pub component_type: String,

    /// Resolve and report without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging for the generator crates
    #[arg(short, long)]
    pub verbose: bool,

    /// Explain an error code, e.g. `--explain E3001`
    #[arg(long, value_name = "CODE")]
    pub explain: Option<String>,
}
