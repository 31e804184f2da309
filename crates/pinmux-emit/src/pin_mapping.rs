//! The pin-mapping header: wizard options, clock macros and per-pin
//! macro blocks.

use pinmux_core::{
    port_mux_usage, Candidate, FamilyKind, MuxUsage, PeripheralFunction, Pin, SymbolModel,
};

use crate::blocks::{
    analogue_slots, function_named_slots, port_slot, selection_macro, timer_slots, Guard, Slot,
    TIMER_BASES,
};
use crate::device::{Device, PIN_MAPPING_BASE, VERSION};
use crate::document::DocumentWriter;

/// PORT clock register assumed when the table binds none.
pub const DEFAULT_PORT_CLOCK_REG: &str = "SIM->SCGC5";

/// Mux value of every analogue mapping. Other values are rejected before
/// emission.
pub const ADC_FN: u32 = 0;

/// Clock-source field of a timer status register.
struct TimerClock {
    base: &'static str,
    source_field: &'static str,
    sources: [&'static str; 4],
}

const TIMER_CLOCKS: [TimerClock; 2] = [
    TimerClock {
        base: "FTM",
        source_field: "CLKS",
        sources: [
            "Disabled",
            "System clock",
            "Fixed frequency clock",
            "External clock",
        ],
    },
    TimerClock {
        base: "TPM",
        source_field: "CMOD",
        sources: ["Disabled", "Internal clock", "External clock", "Reserved"],
    },
];

const PRESCALER_STEPS: u32 = 8;

/// Render `pin_mapping-<device>.h`.
pub fn render_pin_mapping(device: &Device, model: &SymbolModel) -> String {
    let file_name = format!("{PIN_MAPPING_BASE}.h");
    let mut doc = DocumentWriter::new();
    doc.header_preamble(
        &file_name,
        Some(&device.pin_mapping_header()),
        VERSION,
        &device.brief(),
    );
    doc.include("derivative.h");
    doc.blank_line();

    doc.wizard_start();
    write_timer_wizard(&mut doc, model);
    write_clock_macros(&mut doc, model);
    doc.section_open("Pin Peripheral mapping");
    for function in model.functions() {
        if function.is_selectable() {
            write_selection(&mut doc, model, function);
        }
    }
    doc.section_close();
    doc.wizard_end();

    for pin in model.pins() {
        write_pin_block(&mut doc, model, pin);
    }
    write_mux_defaults(&mut doc, model);
    doc.header_postamble(&file_name);
    doc.finish()
}

fn write_timer_wizard(doc: &mut DocumentWriter, model: &SymbolModel) {
    for clock in &TIMER_CLOCKS {
        let base = clock.base;
        let field = clock.source_field;
        for instance in model.instances_of_kind(base, FamilyKind::Timer) {
            let timer = format!("{base}{instance}");
            doc.section_open(&format!("Clock settings for {timer}"));

            doc.option_preamble(
                Some(&format!("{timer}_SC.{field} ================================\n//")),
                0,
                &format!("{timer}_SC.{field} Clock source"),
                &format!("Selects the clock source for the {timer} module. [{timer}_SC.{field}]"),
            );
            for (value, source) in clock.sources.iter().enumerate() {
                doc.option_entry(value, source);
            }
            doc.option_default(1);

            doc.option_preamble(
                Some(&format!("{timer}_SC.PS ================================\n//")),
                1,
                &format!("{timer}_SC.PS Clock prescaler"),
                &format!("Selects the prescaler for the {timer} module. [{timer}_SC.PS]"),
            );
            for value in 0..PRESCALER_STEPS {
                doc.option_entry(value, &format!("Divide by {}", 1u32 << value));
            }
            doc.option_default(0);

            doc.macro_definition(
                &format!("{timer}_SC"),
                &format!("({base}_SC_{field}(0x1)|{base}_SC_PS(0x0))"),
            );
            doc.blank_line();
            doc.section_close();
        }
    }
}

fn write_clock_macros(doc: &mut DocumentWriter, model: &SymbolModel) {
    for (instance, binding) in model.clocks() {
        doc.macro_definition(&format!("{instance}_CLOCK_REG"), &binding.register);
        doc.macro_definition(&format!("{instance}_CLOCK_MASK"), &binding.mask);
    }
    doc.macro_definition(
        "PORT_CLOCK_REG",
        model.port_clock_register().unwrap_or(DEFAULT_PORT_CLOCK_REG),
    );
    doc.blank_line();
}

/// Candidate name with its aliases, as shown in option entries.
fn candidate_label(model: &SymbolModel, candidate: &Candidate) -> String {
    match candidate.pin().and_then(|pin| model.alias_list(pin)) {
        Some(aliases) => format!("{} (Alias: {aliases})", candidate.name()),
        None => candidate.name().to_string(),
    }
}

fn write_selection(doc: &mut DocumentWriter, model: &SymbolModel, function: &PeripheralFunction) {
    let name = function.name();
    let choices: Vec<String> = function
        .candidates()
        .iter()
        .filter_map(Candidate::pin)
        .map(|pin| match model.alias_list(pin) {
            Some(aliases) => format!("{pin}({aliases})"),
            None => pin.to_string(),
        })
        .collect();

    doc.option_preamble(
        Some(&format!("{name} Pin Mapping")),
        0,
        &format!("{name} Pin Selection [{}]", choices.join(", ")),
        &format!("Selects which pin is used for {name}"),
    );
    for (index, candidate) in function.candidates().iter().enumerate() {
        doc.option_entry(index, &candidate_label(model, candidate));
    }
    let preferred = function.preferred_pin_index();
    doc.option_default(preferred);
    doc.macro_definition(&selection_macro(function), &preferred.to_string());
    doc.blank_line();
}

fn define_value(doc: &mut DocumentWriter, name: &str, value: &str, comment: &str) {
    doc.raw(&format!("#define {name:<18}         {value:<3}   //!< {comment}\n"));
}

/// Number, channel and mux macros for a pin-named mapping.
fn write_numbered(doc: &mut DocumentWriter, pin: &Pin, slot: &Slot<'_>, tag: &str) {
    let pin_name = pin.name();
    let base = slot.function.base_name();
    let prefix = format!("{pin_name}_{tag}");
    let guard = Guard::for_selection(slot.function, pin);
    guard.open(doc);
    define_value(
        doc,
        &format!("{prefix}_NUM{}", slot.suffix),
        slot.function.instance(),
        &format!("{pin_name} {base} number"),
    );
    define_value(
        doc,
        &format!("{prefix}_CH{}", slot.suffix),
        slot.function.channel(),
        &format!("{pin_name} {base} channel"),
    );
    define_value(
        doc,
        &format!("{prefix}_FN{}", slot.suffix),
        &slot.mapping.mux.to_string(),
        &format!("{pin_name} Pin multiplexor for {base}"),
    );
    guard.close(doc);
}

fn write_pin_block(doc: &mut DocumentWriter, model: &SymbolModel, pin: &Pin) {
    let pin_name = pin.name();
    doc.raw(&format!("// {}\n", model.pin_description(pin)));

    if let Some(slot) = port_slot(model, pin) {
        let base = slot.function.base_name();
        let guard = Guard::for_selection(slot.function, pin);
        guard.open(doc);
        define_value(
            doc,
            &format!("{pin_name}_{base}_NAME"),
            slot.function.instance(),
            &format!("{pin_name} {base} name"),
        );
        define_value(
            doc,
            &format!("{pin_name}_{base}_BIT"),
            slot.function.channel(),
            &format!("{pin_name} {base} bit number"),
        );
        define_value(
            doc,
            &format!("{pin_name}_{base}_FN"),
            &slot.mapping.mux.to_string(),
            &format!("{pin_name} Pin multiplexor for {base}"),
        );
        guard.close(doc);
    }

    for slot in analogue_slots(model, pin) {
        write_numbered(doc, pin, &slot, "ADC");
    }
    for base in TIMER_BASES {
        for slot in timer_slots(model, pin, base) {
            write_numbered(doc, pin, &slot, base);
        }
    }

    for slot in function_named_slots(model, pin) {
        let function = slot.function;
        let base = function.base_name();
        let guard = Guard::for_function_named(function, pin);
        guard.open(doc);
        define_value(
            doc,
            &format!("{}_FN", function.name()),
            &slot.mapping.mux.to_string(),
            &format!("{pin_name} Pin multiplexor for {base}"),
        );
        doc.raw(&format!(
            "#define {:<18}         digitalIO_{pin_name:<3}   //!< {pin_name} {base} GPIO\n",
            format!("{}_GPIO", function.name()),
        ));
        guard.close(doc);
    }
    doc.blank_line();
}

fn write_mux_defaults(doc: &mut DocumentWriter, model: &SymbolModel) {
    doc.raw(&format!(
        "#define DEFAULT_ADC_FN   {ADC_FN} //!< Fixed ADC Multiplexing value for pins\n"
    ));
    match port_mux_usage(model) {
        MuxUsage::Constant(mux) => doc.raw(&format!(
            "#define DEFAULT_GPIO_FN  {mux} //!< Fixed GPIO Multiplexing value for pins\n"
        )),
        MuxUsage::Varying => {
            doc.raw("#define GPIO_FN_CHANGES     //!< Indicates GPIO Multiplexing varies with pin\n")
        }
    }
    doc.raw(&format!(
        "#define DEFAULT_PORT_CLOCK_REG  {} //!< Fixed PORT Clock register for all ports\n",
        model.port_clock_register().unwrap_or(DEFAULT_PORT_CLOCK_REG)
    ));
}
