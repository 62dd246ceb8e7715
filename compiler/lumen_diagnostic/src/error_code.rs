//! Error codes for all compiler diagnostics.
//!
//! The first digit is the phase that reports the code.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates phase:
/// - E1xxx: Semantic analysis
/// - E2xxx: Backend emission
/// - E9xxx: Internal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Semantic Errors (E1xxx)
    /// Unknown identifier
    E1001,
    /// Redeclaration in the same scope
    E1002,
    /// Type mismatch in assignment or initializer
    E1003,
    /// Condition is not `bool`
    E1004,
    /// Invalid operand types for an operator
    E1005,
    /// Invalid call (unknown function, arity or argument types)
    E1006,
    /// Return value does not match the function's return type
    E1007,
    /// Assignment to an immutable value
    E1008,
    /// Attribute not valid here
    E1009,
    /// Invalid member access or swizzle
    E1010,
    /// Invalid index expression
    E1011,
    /// Unknown diagnostic rule (warning)
    E1012,
    /// Unreachable code (rule-governed)
    E1013,
    /// Invalid entry point
    E1014,
    /// Invalid switch statement
    E1015,
    /// `break` or `continue` outside of a loop
    E1016,
    /// Missing or duplicate resource binding
    E1017,
    /// Derivative in non-uniform control flow (rule-governed)
    E1018,
    /// `let` or `const` without an initializer
    E1019,

    // Emission Errors (E2xxx)
    /// Construct not supported by the target dialect
    E2001,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E1013 => "E1013",
            ErrorCode::E1014 => "E1014",
            ErrorCode::E1015 => "E1015",
            ErrorCode::E1016 => "E1016",
            ErrorCode::E1017 => "E1017",
            ErrorCode::E1018 => "E1018",
            ErrorCode::E1019 => "E1019",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short description used by `--explain`-style tooling.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unknown identifier",
            ErrorCode::E1002 => "redeclaration",
            ErrorCode::E1003 => "type mismatch",
            ErrorCode::E1004 => "condition must be bool",
            ErrorCode::E1005 => "invalid operand types",
            ErrorCode::E1006 => "invalid call",
            ErrorCode::E1007 => "return type mismatch",
            ErrorCode::E1008 => "assignment to immutable value",
            ErrorCode::E1009 => "invalid attribute",
            ErrorCode::E1010 => "invalid member access",
            ErrorCode::E1011 => "invalid index",
            ErrorCode::E1012 => "unknown diagnostic rule",
            ErrorCode::E1013 => "unreachable code",
            ErrorCode::E1014 => "invalid entry point",
            ErrorCode::E1015 => "invalid switch",
            ErrorCode::E1016 => "loop control outside of loop",
            ErrorCode::E1017 => "invalid resource binding",
            ErrorCode::E1018 => "derivative in non-uniform control flow",
            ErrorCode::E1019 => "missing initializer",
            ErrorCode::E2001 => "unsupported by target",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    /// Check if this is a semantic analysis code.
    pub fn is_semantic(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an emission code.
    pub fn is_emission(&self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
