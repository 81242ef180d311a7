//! Diagnostic system for generator errors.
//!
//! Every failure in a generation run is reported as a [`Diagnostic`]:
//! - Error codes for searchability (`dihc --explain E3001`)
//! - Clear messages (what went wrong)
//! - Notes (which chain of dependencies led there)
//! - Suggestions (how to fix)
//!
//! The generator has no source spans to point at; the type identities named in
//! the message are the location.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
