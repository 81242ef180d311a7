//! Result types for the portable generator pipeline.
//!
//! These are the interface between the driver and its consumers (the CLI and
//! tests). They carry everything needed to report a run without exposing the
//! resolver's internal types.

use dih_codegen::Artifacts;
use dih_diagnostic::Diagnostic;
use dih_resolve::PlanSummary;

/// Which generation phase produced the error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Definition lookup and target validation.
    Definition,
    /// Module discovery.
    Discovery,
    /// Dependency graph resolution.
    Resolution,
    /// Rendering artifacts.
    Emission,
}

/// Result of one generation run.
#[derive(Clone, Debug)]
pub struct GenerateOutput {
    /// Whether every phase completed without errors.
    pub success: bool,
    /// Generated artifacts; empty unless `success`.
    pub artifacts: Artifacts,
    /// Sizes of the resolved plan, once resolution succeeded.
    pub plan_summary: Option<PlanSummary>,
    /// Diagnostics from the failing phase.
    pub diagnostics: Vec<Diagnostic>,
    /// Which phase produced the error (if any).
    pub error_phase: Option<ErrorPhase>,
}

impl GenerateOutput {
    pub(crate) fn failure(phase: ErrorPhase, diagnostic: Diagnostic) -> Self {
        GenerateOutput {
            success: false,
            artifacts: Artifacts::new(),
            plan_summary: None,
            diagnostics: vec![diagnostic],
            error_phase: Some(phase),
        }
    }
}
