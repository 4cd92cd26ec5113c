//! Fatal lowering errors.
//!
//! Every variant aborts the current compilation unit. The offending node's
//! span is carried so the caller can report a position.

use objj_diagnostic::{Diagnostic, ErrorCode};
use objj_ir::Span;

/// Error produced while lowering a compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A superclass or category target is not a known class.
    #[error("undefined class `{name}`")]
    UndefinedClass { name: String, span: Span },

    /// An inherited or adopted protocol is not a known protocol.
    #[error("undefined protocol `{name}`")]
    UndefinedProtocol { name: String, span: Span },

    /// An ivar name declared twice in one class.
    #[error("`{name}` is already declared in this class")]
    Redeclaration { name: String, span: Span },

    /// A reference or dereference the lowering cannot rewrite.
    #[error("unsupported reference usage: {reason}")]
    UnsupportedReferenceUsage { reason: &'static str, span: Span },

    /// `super` outside a method, or not as a message receiver.
    #[error("`super` is only valid as the receiver of a message send inside a method")]
    InvalidSuper { span: Span },
}

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::UndefinedClass { .. } => ErrorCode::E5001,
            CompileError::UndefinedProtocol { .. } => ErrorCode::E5002,
            CompileError::Redeclaration { .. } => ErrorCode::E5003,
            CompileError::UnsupportedReferenceUsage { .. } => ErrorCode::E5004,
            CompileError::InvalidSuper { .. } => ErrorCode::E5005,
        }
    }

    /// Span of the offending node.
    pub fn span(&self) -> Span {
        match self {
            CompileError::UndefinedClass { span, .. }
            | CompileError::UndefinedProtocol { span, .. }
            | CompileError::Redeclaration { span, .. }
            | CompileError::UnsupportedReferenceUsage { span, .. }
            | CompileError::InvalidSuper { span } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            CompileError::UndefinedClass { .. } => diagnostic
                .with_label(self.span(), "not declared before this point")
                .with_note("forward-declare it with `@class` if it is defined elsewhere"),
            CompileError::UndefinedProtocol { .. } => diagnostic
                .with_label(self.span(), "not declared before this point")
                .with_note("forward-declare it with `@protocol Name;` if it is defined elsewhere"),
            CompileError::Redeclaration { .. } => {
                diagnostic.with_label(self.span(), "declared again here")
            }
            CompileError::UnsupportedReferenceUsage { .. } | CompileError::InvalidSuper { .. } => {
                diagnostic.with_label(self.span(), "used here")
            }
        }
    }
}
