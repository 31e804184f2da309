//! `pinmux inspect`: print the resolved model of a table.

use std::path::Path;

use anyhow::{Context, Result};
use pinmux_core::{compile, Selection, SymbolModel, Table};
use serde_json::{json, Value};

use super::compile_options;
use crate::manifest::PinmuxManifest;
use crate::{Export, View};

/// Compile a table without writing anything and print the requested view.
pub fn run(
    table_path: &Path,
    manifest: Option<&PinmuxManifest>,
    export: Export,
    view: View,
) -> Result<()> {
    let table = Table::load(table_path)
        .with_context(|| format!("reading {}", table_path.display()))?;
    let model = compile(&table, &compile_options(manifest))
        .with_context(|| format!("compiling {}", table_path.display()))?;

    match export {
        Export::Text => print!("{}", render_text(&model, view)),
        Export::Json => {
            let text = serde_json::to_string_pretty(&render_json(&model, view))
                .context("serializing model")?;
            println!("{text}");
        }
    }
    Ok(())
}

pub(crate) fn render_text(model: &SymbolModel, view: View) -> String {
    let mut text = String::new();
    if matches!(view, View::Pins | View::All) {
        write_pins(&mut text, model);
    }
    if matches!(view, View::Functions | View::All) {
        write_functions(&mut text, model);
    }
    if matches!(view, View::Clocks | View::All) {
        write_clocks(&mut text, model);
    }
    text
}

fn write_pins(text: &mut String, model: &SymbolModel) {
    text.push_str(&format!("Pins ({}):\n", model.pins().len()));
    for pin in model.pins() {
        text.push_str(&format!("  {}\n", model.pin_description(pin)));
        for mapping in pin.mappings() {
            text.push_str(&format!("      mux {}: {}\n", mapping.mux, mapping.function));
        }
    }
}

fn write_functions(text: &mut String, model: &SymbolModel) {
    let functions = model.functions();
    text.push_str(&format!("Functions ({}):\n", functions.len()));
    for function in functions {
        let selection = match function.selection() {
            Some(Selection::Selectable) => "selectable",
            Some(Selection::Collapsed) => "collapsed",
            None => "unclassified",
        };
        let candidates: Vec<&str> = function.candidates().iter().map(|c| c.name()).collect();
        text.push_str(&format!(
            "  {:<14} {:<12} default {:<8} [{}]\n",
            function.name(),
            selection,
            function.preferred_candidate().name(),
            candidates.join(", ")
        ));
    }
}

fn write_clocks(text: &mut String, model: &SymbolModel) {
    let clocks = model.clocks();
    text.push_str(&format!("Clocks ({}):\n", clocks.len()));
    for (instance, binding) in clocks {
        text.push_str(&format!(
            "  {:<8} {:<12} {}\n",
            instance, binding.register, binding.mask
        ));
    }
    if let Some(register) = model.port_clock_register() {
        text.push_str(&format!("  PORT clock register: {register}\n"));
    }
}

pub(crate) fn render_json(model: &SymbolModel, view: View) -> Value {
    let clocks = || -> Value {
        model
            .clocks()
            .into_iter()
            .map(|(instance, binding)| {
                json!({
                    "instance": instance,
                    "register": binding.register,
                    "mask": binding.mask,
                })
            })
            .collect()
    };
    match view {
        View::Pins => json!({ "pins": model.pins() }),
        View::Functions => json!({ "functions": model.functions() }),
        View::Clocks => json!({ "clocks": clocks() }),
        View::All => json!({
            "pins": model.pins(),
            "functions": model.functions(),
            "clocks": clocks(),
            "port_clock_register": model.port_clock_register(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pinmux_core::CompileOptions;

    use super::*;

    const TABLE: &str = "MK20D5\n\
                         Pin,PTC2,ADC0_SE4b,PTC2,SPI0_PCS2\n\
                         Pin,PTD5,ADC0_SE6b,PTD5,SPI0_PCS2\n\
                         Alias,D10,PTC2\n\
                         Default,SPI0_PCS2,PTD5\n\
                         ClockInfo,PORTC,SIM->SCGC5\n";

    fn model() -> SymbolModel {
        compile(&Table::parse(TABLE), &CompileOptions::default()).unwrap()
    }

    #[test]
    fn text_views_are_selectable() {
        let model = model();
        let pins = render_text(&model, View::Pins);
        assert!(pins.starts_with("Pins (2):\n"));
        assert!(pins.contains("  PTC2 = ADC0_SE4,GPIOC_2,SPI0_PCS2 (Alias: D10)\n"));
        assert!(pins.contains("      mux 2: SPI0_PCS2\n"));
        assert!(!pins.contains("Clocks"));

        let clocks = render_text(&model, View::Clocks);
        assert!(clocks.contains("  PORTC    SIM->SCGC5   SIM_SCGC5_PORTC_MASK\n"));
        assert!(clocks.contains("PORT clock register: SIM->SCGC5"));
    }

    #[test]
    fn functions_show_selection_and_candidates() {
        let text = render_text(&model(), View::Functions);
        assert!(text.contains("SPI0_PCS2      selectable   default PTD5     [Disabled, PTC2, PTD5]\n"));
        assert!(text.contains("ADC0_SE4"));
    }

    #[test]
    fn json_all_has_every_section() {
        let value = render_json(&model(), View::All);
        assert_eq!(value["pins"].as_array().unwrap().len(), 2);
        assert_eq!(value["clocks"][0]["instance"], "PORTC");
        assert_eq!(value["port_clock_register"], "SIM->SCGC5");

        let functions = value["functions"].as_array().unwrap();
        let pcs = functions
            .iter()
            .find(|f| f["name"] == "SPI0_PCS2")
            .unwrap();
        assert_eq!(pcs["selection"], "selectable");
        assert_eq!(pcs["candidates"][2], "PTD5");
    }

    #[test]
    fn json_single_view() {
        let value = render_json(&model(), View::Clocks);
        assert!(value.get("pins").is_none());
        assert_eq!(value["clocks"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn inspect_reports_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("none.csv"), None, Export::Text, View::All).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
