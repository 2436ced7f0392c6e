//! Error codes for all front-end diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2001`) with the first digit
//! indicating the compiler phase.

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Syntax errors reported by the parser collaborator
/// - E2xxx: Resolution and type errors
/// - E3xxx: Pattern errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Syntax Errors (E1xxx)
    /// Syntax error reported by the parser
    E1001,

    // Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type name
    E2002,
    /// Unknown identifier
    E2003,
    /// Wrong number of arguments
    E2004,
    /// Type argument cannot be inferred
    E2005,
    /// Symbol declared more than once
    E2006,
    /// Wrong number of type arguments
    E2007,
    /// Mutation of an immutable value or invalid `mut` annotation
    E2008,
    /// Symbol is not accessible from this module
    E2009,
    /// Value is not callable
    E2010,
    /// Unknown member or variant
    E2011,
    /// Function literal without an expected function type
    E2012,
    /// Function does not always return a value
    E2013,
    /// Piped call matches more than one function
    E2014,
    /// Piped call matches no function
    E2015,
    /// Generic instantiation nested too deeply
    E2016,
    /// Global variable depends on itself
    E2017,
    /// Operator applied to unsupported operand types
    E2018,
    /// Declaration needs an explicit type
    E2019,

    // Pattern Errors (E3xxx)
    /// Match does not handle every value
    E3001,
    /// Alternative patterns bind different names
    E3002,
    /// Name captured twice in one pattern
    E3003,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// All defined error codes.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E9001,
    ];

    /// Get the error code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Check if this is a syntax error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a type or resolution error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a pattern error (E3xxx range).
    pub fn is_pattern_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
