//! Syntax tree for the Objective-J dialect.
//!
//! # Organization
//!
//! - [`operators`]: host-language operators and their precedence
//! - [`expr`]: expressions, including message sends and references
//! - [`stmt`]: statements, including the `@`-directives
//! - [`decl`]: classes, protocols, methods, ivars and typedefs

pub mod decl;
pub mod expr;
pub mod operators;
pub mod stmt;

use crate::{Span, Spanned};

pub use decl::{
    AccessorAttribute, AccessorSemantics, ClassDeclaration, ImportDeclaration, IvarDeclaration,
    MethodDeclaration, MethodKind, MethodParam, ProtocolDeclaration, SelectorPart,
    TypedefDeclaration,
};
pub use expr::{
    Expr, ExprKind, Function, MemberProperty, MessageSend, Param, Property, PropertyKey, SendPart,
};
pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use stmt::{CatchClause, ForInTarget, ForInit, Stmt, StmtKind, SwitchCase, VarDeclarator};

/// A compilation unit.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program {
            body,
            span: Span::DUMMY,
        }
    }
}

/// A named identifier occurrence.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}
