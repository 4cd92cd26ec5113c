//! Binary, logical, unary, update and assignment operators.

/// Binary (non short-circuit) operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Multiplicative
    Mul,
    Div,
    Mod,

    // Additive
    Add,
    Sub,

    // Shift
    Shl,
    Shr,
    UShr,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    InstanceOf,

    // Equality
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,

    // Bitwise
    BitAnd,
    BitXor,
    BitOr,
}

impl BinaryOp {
    /// Every binary operator, in precedence-table order.
    pub const ALL: [BinaryOp; 21] = [
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Add,
        Self::Sub,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::Lt,
        Self::LtEq,
        Self::Gt,
        Self::GtEq,
        Self::In,
        Self::InstanceOf,
        Self::Eq,
        Self::NotEq,
        Self::StrictEq,
        Self::StrictNotEq,
        Self::BitAnd,
        Self::BitXor,
        Self::BitOr,
    ];

    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
        }
    }

    /// Returns the operator sub-precedence.
    ///
    /// Higher number = lower precedence (binds less tightly).
    /// - 3: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 5: `<<` `>>` `>>>`
    /// - 6: `<` `<=` `>` `>=` `in` `instanceof`
    /// - 7: `==` `!=` `===` `!==`
    /// - 8: `&`
    /// - 9: `^`
    /// - 10: `|`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Shl | Self::Shr | Self::UShr => 5,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::In | Self::InstanceOf => 6,
            Self::Eq | Self::NotEq | Self::StrictEq | Self::StrictNotEq => 7,
            Self::BitAnd => 8,
            Self::BitXor => 9,
            Self::BitOr => 10,
        }
    }
}

/// Short-circuit operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Sub-precedence continuing the [`BinaryOp::precedence`] scale.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::And => 11,
            Self::Or => 12,
        }
    }
}

/// Prefix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::TypeOf => "typeof",
            Self::Void => "void",
            Self::Delete => "delete",
        }
    }

    /// Keyword operators need a space before their operand.
    pub const fn is_keyword(self) -> bool {
        matches!(self, Self::TypeOf | Self::Void | Self::Delete)
    }
}

/// `++` / `--`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    /// The binary operator that computes the new value.
    pub const fn step(self) -> BinaryOp {
        match self {
            Self::Increment => BinaryOp::Add,
            Self::Decrement => BinaryOp::Sub,
        }
    }

    /// The binary operator that recovers the old value from the new one.
    pub const fn undo(self) -> BinaryOp {
        match self {
            Self::Increment => BinaryOp::Sub,
            Self::Decrement => BinaryOp::Add,
        }
    }
}

/// Assignment operators. `Compound` carries the arithmetic operator of `op=`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_symbol(self) -> String {
        match self {
            Self::Assign => "=".to_string(),
            Self::Compound(op) => format!("{}=", op.as_symbol()),
        }
    }
}
