//! Error codes for all lowering diagnostics.
//!
//! Each code is a unique identifier (e.g., `E5001`). Errors abort the
//! compilation unit; warnings are collected next to the generated code.

use std::fmt;

/// Error codes for all lowering diagnostics.
///
/// Format: E#### / W####:
/// - E50xx: Declaration resolution and lowering errors
/// - W50xx: Lowering warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// Superclass or category target is not a known class
    E5001,
    /// Inherited or adopted protocol is not a known protocol
    E5002,
    /// Name declared twice where shadowing is forbidden (duplicate ivar)
    E5003,
    /// Reference used where it cannot be lowered
    E5004,
    /// `super` used outside a method or outside a message-send receiver
    E5005,

    /// Global variable created by assignment inside a function or method
    W5001,
    /// Required protocol method not implemented
    W5002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive iteration.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E5001,
        ErrorCode::E5002,
        ErrorCode::E5003,
        ErrorCode::E5004,
        ErrorCode::E5005,
        ErrorCode::W5001,
        ErrorCode::W5002,
    ];

    /// Get the code as a string (e.g., "E5001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E5005 => "E5005",
            ErrorCode::W5001 => "W5001",
            ErrorCode::W5002 => "W5002",
        }
    }

    /// Short human-readable description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "undefined class",
            ErrorCode::E5002 => "undefined protocol",
            ErrorCode::E5003 => "redeclaration",
            ErrorCode::E5004 => "unsupported reference usage",
            ErrorCode::E5005 => "invalid use of `super`",
            ErrorCode::W5001 => "implicit global created in nested scope",
            ErrorCode::W5002 => "unimplemented protocol method",
        }
    }

    /// Check if this is a fatal lowering error (E50xx range).
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E5001
                | ErrorCode::E5002
                | ErrorCode::E5003
                | ErrorCode::E5004
                | ErrorCode::E5005
        )
    }

    /// Check if this is a warning code (W50xx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W5001 | ErrorCode::W5002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E5001"` or `"w5002"` (case-insensitive).
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
