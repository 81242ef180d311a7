//! Error codes for all generator diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E3001`) with the first digit
//! indicating the phase that produced it.

use std::fmt;

/// Error codes for all generator diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Definition and target errors
/// - E2xxx: Module discovery errors
/// - E3xxx: Dependency resolution errors
/// - E9xxx: Internal and configuration errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Definition Errors (E1xxx)
    /// Definition interface not found
    E1001,
    /// Target method declares parameters
    E1002,
    /// Target method has an invalid result list
    E1003,
    /// Target type is not injectable
    E1004,
    /// Infallible target depends on a fallible provider
    E1005,
    /// Definition has no usable `modules` method
    E1006,
    /// Definition declares no targets
    E1007,
    /// Target name clashes with a generated item
    E1008,

    // Discovery Errors (E2xxx)
    /// Module reference is neither a struct reference nor an interface
    E2001,
    /// Provider method has an unsupported shape
    E2002,
    /// Binding method has an unsupported shape
    E2003,
    /// Value module declares nested modules
    E2004,
    /// Type registered more than once
    E2005,
    /// Module declaration not found
    E2006,

    // Resolution Errors (E3xxx)
    /// Unresolved dependency
    E3001,
    /// Cyclic dependency
    E3002,
    /// Unsupported dependency shape
    E3003,
    /// Reference/value mismatch between request and provider
    E3004,

    // Internal Errors (E9xxx)
    /// Internal generator error
    E9001,
    /// Invalid generator configuration
    E9002,
}

impl ErrorCode {
    /// All error codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the numeric code as a string (e.g., "E3001").
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
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-paragraph explanation, shown by `dihc --explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => {
                "The definition interface named on the command line does not exist in the \
                 given package, or is not an interface."
            }
            ErrorCode::E1002 => {
                "Target accessors take no parameters: every value they return is built \
                 from the component's modules."
            }
            ErrorCode::E1003 => {
                "A target returns exactly one value, optionally followed by the canonical \
                 error type."
            }
            ErrorCode::E1004 => {
                "A target must return a named type or a reference to a named type."
            }
            ErrorCode::E1005 => {
                "The target's dependency chain contains a fallible provider, but the target \
                 does not return an error. Declare the error result on the target."
            }
            ErrorCode::E1006 => {
                "The definition must declare a zero-argument `modules` method returning the \
                 modules to include."
            }
            ErrorCode::E1007 => {
                "A definition must declare at least one target accessor besides `modules`."
            }
            ErrorCode::E1008 => {
                "Targets declared directly on the definition become inherent methods of the \
                 component, which already has `new` and one `provides_*` method per provider. \
                 Rename the target or declare it on a component interface returned by `target`."
            }
            ErrorCode::E2001 => {
                "A module is either a reference to a struct (value module) or an interface \
                 (binding module)."
            }
            ErrorCode::E2002 => {
                "Provider methods return one named value (or a reference to one), optionally \
                 followed by the canonical error type."
            }
            ErrorCode::E2003 => {
                "Binding methods take one reference to a struct implementation and return \
                 the interface it is bound to."
            }
            ErrorCode::E2004 => {
                "Only binding modules may include further modules through `modules`."
            }
            ErrorCode::E2005 => {
                "Every type may be provided or bound by exactly one module method across \
                 all reachable modules."
            }
            ErrorCode::E2006 => "A module listed by `modules` has no declaration.",
            ErrorCode::E3001 => {
                "A required type has no provider, no binding, and is not an injectable \
                 struct reference."
            }
            ErrorCode::E3002 => {
                "Constructing the type requires constructing itself. Break the cycle with a \
                 provider that builds one side explicitly."
            }
            ErrorCode::E3003 => {
                "Only named types and references to named types can be injected; slices, \
                 maps, tuples, and primitives cannot."
            }
            ErrorCode::E3004 => {
                "The dependency is requested by value but provided by reference, or the \
                 other way round."
            }
            ErrorCode::E9001 => "The generator reached an inconsistent state.",
            ErrorCode::E9002 => {
                "The generator configuration is invalid, for example a component type or \
                 output module name that is not a Rust identifier."
            }
        }
    }

    /// Check if this is a definition/target error (E1xxx).
    pub fn is_definition_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a module discovery error (E2xxx).
    pub fn is_discovery_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a resolution error (E3xxx).
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E3001"`. Case-insensitive.
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
