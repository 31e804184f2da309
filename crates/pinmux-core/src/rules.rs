//! Hardware rule checks run after classification.

use crate::error::{CompileError, Result};
use crate::family::FamilyKind;
use crate::model::SymbolModel;

/// Mux value used when a device has no port pins at all.
pub const DEFAULT_PORT_MUX: u32 = 1;

/// Whether a family uses one mux value on every pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxUsage {
    Constant(u32),
    Varying,
}

/// Reject models that cannot be wired on real silicon.
///
/// Analogue channels are only reachable through mux 0, and a pin has at
/// most one port bit.
pub fn check_hardware_rules(model: &SymbolModel) -> Result<()> {
    for pin in model.pins() {
        if let Some((mapping, function)) = model
            .mappings_of_kind(pin, FamilyKind::Analogue)
            .find(|(m, _)| m.mux != 0)
        {
            return Err(CompileError::AnalogueMux {
                pin: pin.name().to_string(),
                function: function.name().to_string(),
                mux: mapping.mux,
            });
        }
        if model.mappings_of_kind(pin, FamilyKind::Port).count() > 1 {
            return Err(CompileError::MultiplePortMappings {
                pin: pin.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Mux value of the port-bit function across all pins.
pub fn port_mux_usage(model: &SymbolModel) -> MuxUsage {
    let mut muxes = model
        .pins()
        .iter()
        .flat_map(|pin| model.mappings_of_kind(pin, FamilyKind::Port))
        .map(|(m, _)| m.mux);
    match muxes.next() {
        None => MuxUsage::Constant(DEFAULT_PORT_MUX),
        Some(first) => {
            if muxes.all(|mux| mux == first) {
                MuxUsage::Constant(first)
            } else {
                MuxUsage::Varying
            }
        }
    }
}
