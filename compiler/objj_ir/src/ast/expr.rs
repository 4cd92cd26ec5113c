//! Expression nodes.
//!
//! The tree owns its children (`Box`/`Vec`); spans are carried for
//! diagnostics only.

use std::fmt;

use crate::{Span, Spanned};

use super::operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
use super::stmt::Stmt;
use super::Ident;

/// Expression node.
#[derive(Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Identifier name, if this is a plain identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression kinds: the host-language subset plus the dialect constructs.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Ident(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal, already unescaped.
    Str(String),
    Bool(bool),
    Null,
    This,
    /// `self` inside a method.
    SelfExpr,
    /// `super`; only meaningful as a message receiver.
    Super,
    /// Array literal; `None` entries are holes.
    Array(Vec<Option<Expr>>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: MemberProperty,
    },
    Sequence(Vec<Expr>),

    /// `[receiver keyword:arg ...]`
    MessageSend(Box<MessageSend>),
    /// `@selector(a:b:)`
    Selector(String),
    /// `@protocol(Name)`
    ProtocolLiteral(String),
    /// `@ref(lvalue)`
    Ref(Box<Expr>),
    /// `@deref(reference)`
    Deref(Box<Expr>),
}

/// Member access property.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberProperty {
    /// `object.name`
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

/// Object literal entry.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyKey {
    Ident(String),
    Str(String),
    Number(String),
}

/// Function expression or declaration.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Function parameter. `by_ref` parameters receive a reference accessor.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Ident,
    pub by_ref: bool,
}

/// One `keyword:argument` pair of a message send.
///
/// A unary send (`[obj description]`) has a single part with no argument.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SendPart {
    pub keyword: String,
    pub arg: Option<Expr>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageSend {
    pub receiver: Expr,
    pub parts: Vec<SendPart>,
    /// Extra comma-separated arguments after the last keyword.
    pub varargs: Vec<Expr>,
    pub span: Span,
}

impl MessageSend {
    /// The runtime selector string (`foo`, `foo:bar:`).
    pub fn selector(&self) -> String {
        match self.parts.as_slice() {
            [part] if part.arg.is_none() => part.keyword.clone(),
            parts => parts.iter().map(|p| format!("{}:", p.keyword)).collect(),
        }
    }

    /// All actual arguments in evaluation order.
    pub fn arguments(&self) -> impl Iterator<Item = &Expr> {
        self.parts
            .iter()
            .filter_map(|p| p.arg.as_ref())
            .chain(self.varargs.iter())
    }

    pub fn arity(&self) -> usize {
        self.arguments().count()
    }
}
