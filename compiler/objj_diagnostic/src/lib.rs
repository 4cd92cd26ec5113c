//! Diagnostic system for Objective-J lowering.
//!
//! Every finding carries:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - A primary span (where it went wrong), handed back to the caller
//!   for position formatting
//! - Optional notes (why it's wrong)
//!
//! Fatal lowering errors convert into a [`Diagnostic`] with
//! [`Severity::Error`]; non-fatal findings are produced directly as
//! warnings and collected alongside the generated code.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
