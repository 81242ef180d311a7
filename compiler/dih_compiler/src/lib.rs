//! Portable dihedral generator driver.
//!
//! Runs the whole pipeline over an in-memory type universe without touching
//! the filesystem, so it serves the CLI and tests alike.
//!
//! # Usage
//!
//! ```ignore
//! use dih_compiler::{generate, GenerateConfig};
//!
//! let output = generate(&universe, &GenerateConfig::new("crate::app", "ServiceComponent"));
//! assert!(output.success);
//! let component = &output.artifacts["component"];
//! ```
//!
//! # Architecture
//!
//! ```text
//! dih_ir, dih_diagnostic, dih_resolve, dih_codegen
//!                     ↓
//!               dih_compiler  ← this crate
//!                     ↓
//!                   dihc
//! ```

mod output;
mod pipeline;

pub use output::{ErrorPhase, GenerateOutput};
pub use pipeline::{generate, GenerateConfig};

use dih_diagnostic::Diagnostic;

/// Render diagnostics as plain text, one block per diagnostic.
///
/// Ends with a count line when there is at least one error.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        out.push_str(&diag.to_string());
        out.push_str("\n\n");
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    match errors {
        0 => {}
        1 => out.push_str("error: aborting due to 1 previous error\n"),
        n => out.push_str(&format!("error: aborting due to {n} previous errors\n")),
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
