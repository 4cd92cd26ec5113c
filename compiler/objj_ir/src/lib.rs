//! Objective-J IR - Syntax Tree Types
//!
//! This crate contains the data structures handed to the lowering core by
//! the parser collaborator:
//! - Spans for source locations (opaque to the core)
//! - The owned syntax tree (statements, expressions, dialect declarations)
//! - Construction helpers in [`build`]
//! - A read-only [`visitor::Visitor`]
//!
//! With the `serde` feature every tree type is (de)serializable, so a parser
//! written in another process can hand over a serialized tree.

pub mod ast;
pub mod build;
mod span;
pub mod visitor;

pub use ast::{
    AccessorAttribute, AccessorSemantics, AssignOp, BinaryOp, CatchClause, ClassDeclaration, Expr,
    ExprKind, ForInTarget, ForInit, Function, Ident, ImportDeclaration, IvarDeclaration,
    LogicalOp, MemberProperty, MessageSend, MethodDeclaration, MethodKind, MethodParam, Param,
    Program, Property, PropertyKey, ProtocolDeclaration, SelectorPart, SendPart, Stmt, StmtKind,
    SwitchCase, TypedefDeclaration, UnaryOp, UpdateOp, VarDeclarator,
};
pub use span::{Span, Spanned};
