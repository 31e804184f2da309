//! The compilation driver.
//!
//! Runs the resolver passes in their fixed order over a freshly built
//! [`SymbolModel`], then classifies functions and checks hardware rules.

use log::{debug, info, warn};

use crate::classify::classify;
use crate::error::Result;
use crate::family::FamilyTable;
use crate::model::SymbolModel;
use crate::resolve::{
    resolve_aliases, resolve_clocks, resolve_defaults, resolve_pins, AliasPolicy,
};
use crate::rules::check_hardware_rules;
use crate::table::{RowKind, Table};

/// Options for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub alias_policy: AliasPolicy,
    pub families: FamilyTable,
}

/// Compile a loaded table into a resolved, classified model.
pub fn compile(table: &Table, options: &CompileOptions) -> Result<SymbolModel> {
    let mut model = SymbolModel::new();

    let skipped = table.rows_of(RowKind::Unrecognized).count();
    if skipped > 0 {
        warn!("{skipped} rows with unrecognized keywords ignored");
    }

    resolve_pins(&mut model, &options.families, table.rows_of(RowKind::Pin));
    debug!(
        "pin pass: {} pins, {} functions",
        model.pins().len(),
        model.function_names().len()
    );
    resolve_aliases(
        &mut model,
        table.rows_of(RowKind::Alias),
        options.alias_policy,
    )?;
    resolve_defaults(&mut model, table.rows_of(RowKind::Default))?;
    resolve_clocks(&mut model, table.rows_of(RowKind::ClockInfo))?;
    classify(&mut model);
    check_hardware_rules(&model)?;

    let selectable = model.functions().iter().filter(|f| f.is_selectable()).count();
    info!(
        "compiled {} pins, {} functions ({selectable} selectable)",
        model.pins().len(),
        model.function_names().len()
    );
    Ok(model)
}
