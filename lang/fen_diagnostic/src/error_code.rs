//! Stable error codes.
//!
//! Ranges:
//! - E0xxx: lexical errors
//! - E1xxx: syntax errors
//! - E2xxx: runtime errors

use std::fmt;

/// Stable, searchable error code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexical
    /// Invalid digit in a number literal.
    E0001,

    // Syntax
    /// Expected a particular token or construct.
    E1001,
    /// Unexpected token.
    E1002,
    /// Unexpected trailing input after the last binding.
    E1003,
    /// Multi-element tuples are unsupported.
    E1004,
    /// `let` is reserved at the top level.
    E1005,

    // Runtime
    /// Unresolved variable name.
    E2001,
    /// Native call argument violates its type constraint.
    E2002,
    /// Division by zero.
    E2003,
    /// Applying a value that is not a function.
    E2004,
    /// Duplicate top-level binding.
    E2005,
    /// Script has no `main` binding.
    E2006,
    /// Uncategorized runtime error.
    E2099,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2099 => "E2099",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::E2003.to_string(), "E2003");
        assert_eq!(ErrorCode::E0001.as_str(), "E0001");
    }
}
