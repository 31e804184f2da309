//! The four resolver passes.
//!
//! Each pass consumes the rows of one keyword and mutates the shared
//! [`SymbolModel`]. They must run in the order Pin, Alias, Default,
//! ClockInfo because later passes look up symbols created by earlier ones;
//! [`crate::compile`] enforces that order.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::family::FamilyTable;
use crate::model::{is_port_instance, ClockBinding, SymbolModel, DISABLED};
use crate::table::Row;

/// Index of the pin name in a Pin row.
pub const PIN_INDEX: usize = 1;

/// Index of the first multiplexor column in a Pin row.
pub const ALT_START_INDEX: usize = 2;

/// Separator between function tokens within one cell.
pub const TOKEN_SEPARATOR: char = '/';

/// What to do when an alias is bound to two different pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AliasPolicy {
    /// The later Alias row wins; the earlier binding is removed.
    #[default]
    LastWriteWins,
    /// Rebinding an alias is a fatal error.
    Reject,
}

/// Fields 1 and 2 of a row that requires at least three fields.
fn name_pair(row: &Row) -> Result<(&str, &str)> {
    match (row.field(1), row.field(2)) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(CompileError::MalformedRow {
            line: row.line,
            kind: row.kind.keyword().to_string(),
            detail: format!("expected at least 3 fields, found {}", row.fields.len()),
        }),
    }
}

/// Pass 1: create pins and functions from Pin rows.
///
/// Column `i >= 2` carries mux value `i - 2`. Each cell holds zero or more
/// `/`-separated tokens; unrecognized tokens are dropped.
pub fn resolve_pins<'a>(
    model: &mut SymbolModel,
    families: &FamilyTable,
    rows: impl IntoIterator<Item = &'a Row>,
) {
    for row in rows {
        let pin_name = match row.field(PIN_INDEX) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!("line {}: Pin row without a pin name discarded", row.line);
                continue;
            }
        };
        model.get_or_create_pin(pin_name);

        for (column, cell) in row.fields.iter().enumerate().skip(ALT_START_INDEX) {
            let mux = (column - ALT_START_INDEX) as u32;
            for token in cell
                .split(TOKEN_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
            {
                let Some(signal) = families.recognize(token) else {
                    debug!("line {}: dropped token '{token}' on {pin_name}", row.line);
                    continue;
                };
                let function = model.get_or_create_function(&signal).name().to_string();
                if let Some(index) = model.add_mapping(pin_name, &function, mux) {
                    debug!("{pin_name}: {function} mux {mux}, selection index {index}");
                }
            }
        }
    }
}

/// Pass 2: bind aliases to pins.
pub fn resolve_aliases<'a>(
    model: &mut SymbolModel,
    rows: impl IntoIterator<Item = &'a Row>,
    policy: AliasPolicy,
) -> Result<()> {
    for row in rows {
        let (alias, pin) = name_pair(row)?;
        if model.pin(pin).is_none() {
            return Err(CompileError::UnknownAliasTarget {
                alias: alias.to_string(),
                pin: pin.to_string(),
            });
        }
        if policy == AliasPolicy::Reject {
            if let Some(existing) = model.alias_target(alias).filter(|p| *p != pin) {
                return Err(CompileError::AliasCollision {
                    alias: alias.to_string(),
                    existing: existing.to_string(),
                    pin: pin.to_string(),
                });
            }
        }
        if let Some(previous) = model.bind_alias(alias, pin) {
            warn!("alias '{alias}' rebound from {previous} to {pin}");
        }
    }
    Ok(())
}

/// Pass 3: resolve preferred pins from Default rows.
///
/// The sentinel pin name `Disabled` selects index 0.
pub fn resolve_defaults<'a>(
    model: &mut SymbolModel,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<()> {
    for row in rows {
        let (function_name, pin_name) = name_pair(row)?;
        let function = model
            .function(function_name)
            .ok_or_else(|| CompileError::UnknownFunction {
                function: function_name.to_string(),
                known: model.function_names(),
            })?;

        let index = if pin_name == DISABLED {
            0
        } else {
            if model.pin(pin_name).is_none() {
                return Err(CompileError::UnknownPin {
                    pin: pin_name.to_string(),
                    function: function_name.to_string(),
                });
            }
            function
                .candidate_index(pin_name)
                .ok_or_else(|| CompileError::PinNotCandidate {
                    function: function_name.to_string(),
                    pin: pin_name.to_string(),
                })?
        };

        debug!("default {function_name} = {pin_name} (index {index})");
        if let Some(function) = model.function_mut(function_name) {
            function.set_preferred_pin_index(index);
        }
    }
    Ok(())
}

/// Pass 4: attach clock bindings, then check PORT clock consistency.
///
/// A missing mask is derived from the register and instance name.
pub fn resolve_clocks<'a>(
    model: &mut SymbolModel,
    rows: impl IntoIterator<Item = &'a Row>,
) -> Result<()> {
    for row in rows {
        let (instance, register) = name_pair(row)?;
        let binding = match row.field(3).filter(|m| !m.is_empty()) {
            Some(mask) => ClockBinding {
                register: register.to_string(),
                mask: mask.to_string(),
            },
            None => ClockBinding::with_derived_mask(instance, register),
        };
        debug!("clock {instance}: {} / {}", binding.register, binding.mask);
        model.set_clock(instance, binding);
    }
    check_port_clocks(model)
}

/// All `PORT<letter>` bindings must share one register expression.
pub fn check_port_clocks(model: &SymbolModel) -> Result<()> {
    let mut expected: Option<&str> = None;
    for (instance, binding) in model.clocks() {
        if !is_port_instance(instance) {
            continue;
        }
        match expected {
            None => expected = Some(binding.register.as_str()),
            Some(register) if register != binding.register => {
                return Err(CompileError::InconsistentPortClock {
                    instance: instance.to_string(),
                    register: binding.register.clone(),
                    expected: register.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
