//! pinmux-emit: C artifact generation for resolved pin models.
//!
//! Renders a compiled [`pinmux_core::SymbolModel`] into the three files a
//! device needs: the pin-mapping header with its configuration-wizard
//! metadata, and the GPIO header and source declaring runtime I/O objects.
//!
//! ## Modules
//!
//! - [`document`]: wizard, doxygen and macro text primitives
//! - [`blocks`]: per-pin mapping slots and their guards
//! - [`pin_mapping`]: `pin_mapping-<device>.h`
//! - [`gpio`]: `gpio-<device>.h` and `gpio-<device>.cpp`
//! - [`device`]: device and file naming
//! - [`artifacts`]: output layout, rendering and writing

pub mod artifacts;
pub mod blocks;
pub mod device;
pub mod document;
pub mod error;
pub mod gpio;
pub mod pin_mapping;

pub use artifacts::{build_table, remove_artifacts, Artifact, ArtifactSet, OutputLayout};
pub use device::{Device, VERSION};
pub use document::DocumentWriter;
pub use error::{EmitError, Result};
pub use gpio::{render_gpio_header, render_gpio_source};
pub use pin_mapping::render_pin_mapping;
