//! Compilation error types.

/// Errors that abort a compilation run.
///
/// Every variant names the offending identifier so typos in the source
/// table can be located quickly.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A row is too short for its keyword.
    #[error("malformed {kind} row at line {line}: {detail}")]
    MalformedRow {
        line: usize,
        kind: String,
        detail: String,
    },

    /// An alias names a pin that no Pin row created.
    #[error("unknown alias target: alias '{alias}' refers to unknown pin '{pin}'")]
    UnknownAliasTarget { alias: String, pin: String },

    /// An alias is bound to two different pins (strict alias policy only).
    #[error("alias '{alias}' already bound to pin '{existing}', cannot rebind to '{pin}'")]
    AliasCollision {
        alias: String,
        existing: String,
        pin: String,
    },

    /// A Default row names a function no Pin row produced.
    #[error("unknown peripheral function '{function}'; known functions: {}", known.join(", "))]
    UnknownFunction { function: String, known: Vec<String> },

    /// A Default row names a pin that does not exist.
    #[error("unknown pin '{pin}' in default for '{function}'")]
    UnknownPin { pin: String, function: String },

    /// A Default row names a pin that cannot carry the function.
    #[error("default pin '{pin}' not among candidates for '{function}'")]
    PinNotCandidate { function: String, pin: String },

    /// PORT clock bindings disagree on the enable register.
    #[error("inconsistent PORT clock register for {instance}: '{register}' differs from '{expected}'")]
    InconsistentPortClock {
        instance: String,
        register: String,
        expected: String,
    },

    /// An analogue function is routed through a mux value other than 0.
    #[error("analogue function {function} on pin {pin} must use mux 0, found mux {mux}")]
    AnalogueMux {
        pin: String,
        function: String,
        mux: u32,
    },

    /// A pin carries more than one port-bit function.
    #[error("multiple port functions mapped to pin {pin}")]
    MultiplePortMappings { pin: String },

    /// I/O error while reading a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for compilation operations.
pub type Result<T> = std::result::Result<T, CompileError>;
