//! Per-pin mapping slots and the guards that wrap them.
//!
//! The mapping header and the GPIO artifacts must agree on macro names
//! and guard conditions for every (pin, function) pair. Both read them
//! from here.

use pinmux_core::{FamilyKind, FunctionMapping, PeripheralFunction, Pin, SymbolModel};

use crate::document::DocumentWriter;

/// Timer base names that produce PwmIO objects, in emission order.
pub const TIMER_BASES: [&str; 2] = ["FTM", "TPM"];

/// Suffix distinguishing the k-th mapping of one kind on a pin.
pub fn suffix(k: usize) -> String {
    if k == 0 {
        String::new()
    } else {
        format!("_{k}")
    }
}

/// One mapping on a pin together with its macro suffix.
#[derive(Debug, Clone)]
pub struct Slot<'a> {
    pub mapping: &'a FunctionMapping,
    pub function: &'a PeripheralFunction,
    pub suffix: String,
}

fn numbered<'a>(
    mappings: impl Iterator<Item = (&'a FunctionMapping, &'a PeripheralFunction)>,
) -> Vec<Slot<'a>> {
    mappings
        .enumerate()
        .map(|(k, (mapping, function))| Slot {
            mapping,
            function,
            suffix: suffix(k),
        })
        .collect()
}

/// The port-bit mapping of a pin. Hardware rules allow at most one.
pub fn port_slot<'a>(model: &'a SymbolModel, pin: &'a Pin) -> Option<Slot<'a>> {
    numbered(model.mappings_of_kind(pin, FamilyKind::Port))
        .into_iter()
        .next()
}

/// Analogue mappings of a pin, numbered in encounter order.
pub fn analogue_slots<'a>(model: &'a SymbolModel, pin: &'a Pin) -> Vec<Slot<'a>> {
    numbered(model.mappings_of_kind(pin, FamilyKind::Analogue))
}

/// Timer mappings of a pin for one timer base, numbered in encounter order.
pub fn timer_slots<'a>(model: &'a SymbolModel, pin: &'a Pin, base: &'a str) -> Vec<Slot<'a>> {
    numbered(
        model
            .mappings_of_kind(pin, FamilyKind::Timer)
            .filter(move |(_, f)| f.base_name() == base),
    )
}

/// Mappings whose macros are named after the function, in encounter order.
///
/// The macro names carry no suffix, so a function mapped in several columns
/// of one pin yields only its first mapping.
pub fn function_named_slots<'a>(model: &'a SymbolModel, pin: &'a Pin) -> Vec<Slot<'a>> {
    let mut slots: Vec<Slot<'a>> = Vec::new();
    for mapping in pin.mappings() {
        let Some(function) = model.function(&mapping.function) else {
            continue;
        };
        if !function.kind().function_named_macros()
            || slots.iter().any(|s| s.function.name() == function.name())
        {
            continue;
        }
        slots.push(Slot {
            mapping,
            function,
            suffix: String::new(),
        });
    }
    slots
}

/// Name of the choice macro for a selectable function.
pub fn selection_macro(function: &PeripheralFunction) -> String {
    format!("{}_SEL", function.name())
}

/// Conditional wrapper around a block of macros or declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Unconditional.
    None,
    /// `#if <FUNC>_SEL == <index>`
    Selected { macro_name: String, index: usize },
    /// `#ifndef <macro>`, first definition wins.
    FirstDefinition { macro_name: String },
}

impl Guard {
    /// Guard for a pin's block of a selectable function.
    pub fn for_selection(function: &PeripheralFunction, pin: &Pin) -> Guard {
        if !function.is_selectable() {
            return Guard::None;
        }
        match function.candidate_index(pin.name()) {
            Some(index) => Guard::Selected {
                macro_name: selection_macro(function),
                index,
            },
            None => Guard::None,
        }
    }

    /// Guard for a block defining `<FUNC>_FN`. A collapsed function with
    /// several candidates keeps only its first definition.
    pub fn for_function_named(function: &PeripheralFunction, pin: &Pin) -> Guard {
        match Self::for_selection(function, pin) {
            Guard::None if function.real_candidate_count() > 1 => Guard::FirstDefinition {
                macro_name: format!("{}_FN", function.name()),
            },
            guard => guard,
        }
    }

    pub fn open(&self, doc: &mut DocumentWriter) {
        match self {
            Guard::None => {}
            Guard::Selected { macro_name, index } => doc.if_equal(macro_name, *index),
            Guard::FirstDefinition { macro_name } => doc.if_not_defined(macro_name),
        }
    }

    pub fn close(&self, doc: &mut DocumentWriter) {
        if *self != Guard::None {
            doc.endif();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinmux_core::{compile, CompileOptions, Table};

    fn model(text: &str) -> SymbolModel {
        compile(&Table::parse(text), &CompileOptions::default()).unwrap()
    }

    #[test]
    fn suffixes() {
        assert_eq!(suffix(0), "");
        assert_eq!(suffix(1), "_1");
        assert_eq!(suffix(2), "_2");
    }

    #[test]
    fn analogue_slots_are_numbered() {
        let m = model("T\nPin,PTB0,ADC0_SE8/ADC1_SE8,PTB0\n");
        let pin = m.pin("PTB0").unwrap();
        let slots = analogue_slots(&m, pin);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].function.name(), "ADC0_SE8");
        assert_eq!(slots[0].suffix, "");
        assert_eq!(slots[1].suffix, "_1");
        assert_eq!(port_slot(&m, pin).unwrap().mapping.mux, 1);
    }

    #[test]
    fn timer_slots_split_by_base() {
        let m = model("T\nPin,PTA1,,PTA1,TPM1_CH0,FTM0_CH6\n");
        let pin = m.pin("PTA1").unwrap();
        assert_eq!(timer_slots(&m, pin, "FTM").len(), 1);
        assert_eq!(timer_slots(&m, pin, "TPM")[0].function.name(), "TPM1_CH0");
        assert_eq!(timer_slots(&m, pin, "TPM")[0].suffix, "");
    }

    #[test]
    fn function_named_slots_skip_pin_named_families() {
        let m = model("T\nPin,PTB2,ADC0_SE12,PTB2,I2C0_SCL,UART0_RTS_b\n");
        let pin = m.pin("PTB2").unwrap();
        let names: Vec<&str> = function_named_slots(&m, pin)
            .iter()
            .map(|s| s.function.name())
            .collect();
        assert_eq!(names, vec!["I2C0_SCL", "UART0_RTS_b"]);
    }

    #[test]
    fn repeated_function_keeps_first_column() {
        let m = model("T\nPin,PTD2,,PTD2,SPI0_SOUT,UART0_TX,SPI0_SOUT/UART0_TX\n");
        let pin = m.pin("PTD2").unwrap();
        let slots: Vec<(&str, u32)> = function_named_slots(&m, pin)
            .iter()
            .map(|s| (s.function.name(), s.mapping.mux))
            .collect();
        assert_eq!(slots, vec![("SPI0_SOUT", 2), ("UART0_TX", 3)]);
    }

    #[test]
    fn guards_follow_classification() {
        let m = model("T\nPin,PTC2,,PTC2,SPI0_PCS2\nPin,PTD5,,PTD5,SPI0_PCS2\n");
        let spi = m.function("SPI0_PCS2").unwrap();
        let pin = m.pin("PTD5").unwrap();
        assert_eq!(
            Guard::for_selection(spi, pin),
            Guard::Selected {
                macro_name: "SPI0_PCS2_SEL".to_string(),
                index: 2
            }
        );

        let m = model("T\nPin,PTA1,,,SDHC0_D0\nPin,PTB1,,,SDHC0_D0\n");
        let sdhc = m.function("SDHC0_D0").unwrap();
        let pin = m.pin("PTA1").unwrap();
        assert_eq!(Guard::for_selection(sdhc, pin), Guard::None);
        assert_eq!(
            Guard::for_function_named(sdhc, pin),
            Guard::FirstDefinition {
                macro_name: "SDHC0_D0_FN".to_string()
            }
        );

        let m = model("T\nPin,PTA1,,,SDHC0_D0\n");
        let sdhc = m.function("SDHC0_D0").unwrap();
        assert_eq!(
            Guard::for_function_named(sdhc, m.pin("PTA1").unwrap()),
            Guard::None
        );
    }

    #[test]
    fn guard_text() {
        let mut doc = DocumentWriter::new();
        let guard = Guard::Selected {
            macro_name: "FTM0_CH1_SEL".to_string(),
            index: 1,
        };
        guard.open(&mut doc);
        guard.close(&mut doc);
        Guard::None.open(&mut doc);
        Guard::None.close(&mut doc);
        assert_eq!(doc.finish(), "#if FTM0_CH1_SEL == 1\n#endif\n");
    }
}
