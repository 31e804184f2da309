//! Selection-width classification.
//!
//! Decides per function whether the generated header offers a choice
//! (`<FUNC>_SEL` plus guarded per-pin blocks) or emits the mapping
//! unconditionally. The decision depends on the number of real candidates
//! and the family's collapse threshold.

use log::debug;

use crate::model::{Selection, SymbolModel};

/// Classify every function in the model.
///
/// Collapsed analogue and timer functions get preferred index 1, the first
/// real candidate, overriding any Default row.
pub fn classify(model: &mut SymbolModel) {
    for function in model.functions_mut() {
        let real = function.real_candidate_count();
        let kind = function.kind();
        if real > kind.collapse_threshold() {
            function.set_selection(Selection::Selectable);
            continue;
        }
        function.set_selection(Selection::Collapsed);
        if kind.forces_default_when_collapsed() && real >= 1 {
            function.set_preferred_pin_index(1);
        }
        debug!("{} collapsed ({real} candidates)", function.name());
    }
}
