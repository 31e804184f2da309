//! pinmux-core: pin table compiler front end.
//!
//! Turns a comma-separated pin table into a resolved [`SymbolModel`]: every
//! pin, every peripheral function with its ordered candidate pins, aliases,
//! clock bindings and the selection-width classification the emitter needs.
//!
//! ## Modules
//!
//! - [`natural`]: natural-order comparison of identifiers
//! - [`table`]: table loading, row sorting and keyword classification
//! - [`family`]: the data-driven peripheral family list
//! - [`model`]: pins, functions, aliases and clock bindings
//! - [`resolve`]: the Pin, Alias, Default and ClockInfo passes
//! - [`classify`]: selectable versus collapsed functions
//! - [`rules`]: hardware rule checks and port mux usage
//! - [`compile`]: the driver running everything in order

pub mod classify;
pub mod compile;
pub mod error;
pub mod family;
pub mod model;
pub mod natural;
pub mod resolve;
pub mod rules;
pub mod table;

pub use compile::{compile, CompileOptions};
pub use error::{CompileError, Result};
pub use family::{Family, FamilyKind, FamilyTable, Signal};
pub use model::{
    Candidate, ClockBinding, FunctionMapping, PeripheralFunction, Pin, Selection, SymbolModel,
    DISABLED,
};
pub use natural::{natural_cmp, sort_natural};
pub use resolve::AliasPolicy;
pub use rules::{port_mux_usage, MuxUsage};
pub use table::{Row, RowKind, Table};
