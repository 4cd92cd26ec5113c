//! Precedence Engine
//!
//! Decides where the emitted expression text needs parentheses.
//!
//! Every emitted node has a [`Level`]; binary and logical nodes also carry
//! an operator sub-precedence on the [`BinaryOp::precedence`] scale.
//! Higher numbers bind less tightly.
//!
//! # Rules
//!
//! - A binary or logical operand is wrapped when its level is looser than
//!   the parent's. At the same level it is wrapped when its operator is
//!   looser, or when it is the right operand and the operators tie
//!   (`7 + (13 + 27)` keeps its grouping).
//! - A conditional test wraps conditionals, assignments and sequences.
//! - Conditional branches, assignment values and list items (arguments,
//!   array elements, property values) wrap only sequences.
//! - Member objects and callees wrap anything looser than a member access.
//! - Unary operands wrap anything looser than a unary expression.
//!
//! Precedence here is structural. Nodes whose lowered shape differs from
//! their source shape (message sends, references, ivars) get their
//! precedence from the generator.

use objj_ir::{BinaryOp, Expr, ExprKind, LogicalOp};

/// Coarse precedence level of an emitted expression.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Level {
    /// Literals, identifiers, parenthesized forms.
    Primary,
    /// Member access, calls, `new`.
    Member,
    /// Function expressions.
    Function,
    /// Prefix operators and `++`/`--`.
    Unary,
    Binary,
    Logical,
    Conditional,
    Assignment,
    Sequence,
}

/// Level plus operator sub-precedence (0 outside binary/logical).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Precedence {
    pub level: Level,
    pub op: u8,
}

impl Precedence {
    pub const PRIMARY: Precedence = Precedence::at(Level::Primary);
    pub const MEMBER: Precedence = Precedence::at(Level::Member);
    pub const FUNCTION: Precedence = Precedence::at(Level::Function);
    pub const UNARY: Precedence = Precedence::at(Level::Unary);
    pub const CONDITIONAL: Precedence = Precedence::at(Level::Conditional);
    pub const ASSIGNMENT: Precedence = Precedence::at(Level::Assignment);
    pub const SEQUENCE: Precedence = Precedence::at(Level::Sequence);

    const fn at(level: Level) -> Self {
        Precedence { level, op: 0 }
    }

    pub const fn binary(op: BinaryOp) -> Self {
        Precedence {
            level: Level::Binary,
            op: op.precedence(),
        }
    }

    pub const fn logical(op: LogicalOp) -> Self {
        Precedence {
            level: Level::Logical,
            op: op.precedence(),
        }
    }

    /// Whether this expression needs parentheses in `position`.
    pub fn wraps_in(self, position: Position) -> bool {
        match position {
            Position::Test => self.level >= Level::Conditional,
            Position::Branch | Position::ListItem => self.level == Level::Sequence,
            Position::MemberObject => self.level > Level::Member,
            Position::UnaryOperand => self.level > Level::Unary,
        }
    }
}

/// Side of a binary or logical operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operand {
    Left,
    Right,
}

/// Fixed operand positions outside binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Position {
    /// Condition of `?:`.
    Test,
    /// Consequent or alternate of `?:`.
    Branch,
    /// Call argument, array element, property value, initializer,
    /// assignment value, sequence element.
    ListItem,
    /// Object of a member access, callee of a call.
    MemberObject,
    /// Operand of a prefix or update operator.
    UnaryOperand,
}

/// Whether `child` needs parentheses as the `operand` of a binary or
/// logical `parent`.
pub fn needs_parens(parent: Precedence, child: Precedence, operand: Operand) -> bool {
    if child.level != parent.level {
        return child.level > parent.level;
    }
    match parent.level {
        Level::Binary | Level::Logical => {
            child.op > parent.op || (operand == Operand::Right && child.op == parent.op)
        }
        _ => false,
    }
}

/// Structural precedence of a host-language expression.
pub fn host_precedence(expr: &Expr) -> Precedence {
    match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::Number(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::SelfExpr
        | ExprKind::Super
        | ExprKind::Array(_)
        | ExprKind::Object(_) => Precedence::PRIMARY,
        ExprKind::Call { .. }
        | ExprKind::New { .. }
        | ExprKind::Member { .. }
        | ExprKind::MessageSend(_)
        | ExprKind::Selector(_)
        | ExprKind::ProtocolLiteral(_)
        | ExprKind::Deref(_) => Precedence::MEMBER,
        ExprKind::Function(_) | ExprKind::Ref(_) => Precedence::FUNCTION,
        ExprKind::Unary { .. } | ExprKind::Update { .. } => Precedence::UNARY,
        ExprKind::Binary { op, .. } => Precedence::binary(*op),
        ExprKind::Logical { op, .. } => Precedence::logical(*op),
        ExprKind::Conditional { .. } => Precedence::CONDITIONAL,
        ExprKind::Assign { .. } => Precedence::ASSIGNMENT,
        ExprKind::Sequence(_) => Precedence::SEQUENCE,
    }
}
