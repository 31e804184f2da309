//! The GPIO header and source: `DigitalIO`, `AnalogueIO` and `PwmIO`
//! objects for every pin mapping, under the same guards as the mapping
//! header.

use pinmux_core::{FamilyKind, Pin, SymbolModel};

use crate::blocks::{analogue_slots, port_slot, timer_slots, Guard, Slot, TIMER_BASES};
use crate::device::{Device, GPIO_BASE, VERSION};
use crate::document::DocumentWriter;

/// Clock register reported for instances without a ClockInfo row.
pub const DEFAULT_CLOCK_REG: &str = "SIM->SCGC6";

/// Which slots of a pin an I/O class declares objects for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IoKind {
    Digital,
    Analogue,
    Pwm(&'static str),
}

/// A doxygen group of runtime I/O objects.
struct IoClass {
    kind: IoKind,
    group: &'static str,
    title: &'static str,
    brief: &'static str,
    prefix: &'static str,
    /// Type name padded as it appears in declarations.
    declared_type: &'static str,
    class: &'static str,
}

const DIGITAL: IoClass = IoClass {
    kind: IoKind::Digital,
    group: "DigitalIO_Group",
    title: "Digital Input/Output",
    brief: "Allows use of port pins as simple digital inputs or outputs",
    prefix: "digitalIO_",
    declared_type: "DigitalIO",
    class: "DigitalIO",
};

const ANALOGUE: IoClass = IoClass {
    kind: IoKind::Analogue,
    group: "AnalogueIO_Group",
    title: "Analogue Input",
    brief: "Allows use of port pins as analogue inputs",
    prefix: "analogueIO_",
    declared_type: "AnalogueIO",
    class: "AnalogueIO",
};

const fn pwm(base: &'static str) -> IoClass {
    IoClass {
        kind: IoKind::Pwm(base),
        group: "PwmIO_Group",
        title: "PWM, Input capture, Output compare",
        brief: "Allows use of port pins as PWM outputs",
        prefix: "pwmIO_",
        declared_type: "PwmIO ",
        class: "PwmIO",
    }
}

/// I/O classes emitted for a device, in order.
fn io_classes(device: &Device) -> Vec<IoClass> {
    if device.is_mke() {
        vec![DIGITAL]
    } else {
        let mut classes = vec![DIGITAL, ANALOGUE];
        classes.extend(TIMER_BASES.map(pwm));
        classes
    }
}

fn slots_for<'a>(model: &'a SymbolModel, pin: &'a Pin, kind: IoKind) -> Vec<Slot<'a>> {
    match kind {
        IoKind::Digital => port_slot(model, pin).into_iter().collect(),
        IoKind::Analogue => analogue_slots(model, pin),
        IoKind::Pwm(base) => timer_slots(model, pin, base),
    }
}

/// Render `gpio-<device>.h`.
pub fn render_gpio_header(device: &Device, model: &SymbolModel) -> String {
    let file_name = format!("{GPIO_BASE}.h");
    let mut doc = DocumentWriter::new();
    doc.header_preamble(&file_name, Some(&device.gpio_header()), VERSION, &device.brief());
    doc.include("derivative.h");
    doc.include("pin_mapping.h");
    doc.include("gpio_defs.h");
    doc.blank_line();

    for io in io_classes(device) {
        let mut group_open = false;
        for pin in model.pins() {
            for slot in slots_for(model, pin, io.kind) {
                if !group_open {
                    doc.group_start(io.group, io.title, io.brief);
                    group_open = true;
                }
                write_declaration(&mut doc, model, pin, &slot, &io);
            }
        }
        if group_open {
            doc.group_close();
        }
    }

    write_summary(&mut doc, model);
    doc.header_postamble(&file_name);
    doc.finish()
}

fn write_declaration(
    doc: &mut DocumentWriter,
    model: &SymbolModel,
    pin: &Pin,
    slot: &Slot<'_>,
    io: &IoClass,
) {
    let pin_name = pin.name();
    let object = format!("{}{pin_name}{}", io.prefix, slot.suffix);
    let guard = Guard::for_selection(slot.function, pin);
    guard.open(doc);
    doc.raw(&format!(
        "extern const {} {:<24} //!< {} on {pin_name}\n",
        io.declared_type,
        format!("{object};"),
        io.class,
    ));
    for alias in model.aliases_of(pin_name) {
        doc.raw(&format!(
            "#define {:<25} {:<20} //!< alias {alias}=>{pin_name}\n",
            format!("{}{alias}{}", io.prefix, slot.suffix),
            object,
        ));
    }
    guard.close(doc);
}

/// Trailing comment listing every mapped function and instance clock.
fn write_summary(doc: &mut DocumentWriter, model: &SymbolModel) {
    doc.raw("/*\n");
    for function in model.functions() {
        if function.base_name() == "GPIO" || function.real_candidate_count() == 0 {
            continue;
        }
        let candidates: Vec<&str> = function.candidates().iter().map(|c| c.name()).collect();
        doc.raw(&format!(
            "{},{},[,{},]\n",
            function.name(),
            function.preferred_candidate().name(),
            candidates.join(", ")
        ));
    }
    doc.blank_line();

    for instance in model.peripheral_instances() {
        if instance.starts_with("GPIO") {
            continue;
        }
        match model.clock(&instance) {
            Some(binding) => doc.raw(&format!(
                "{instance},{},{}\n",
                binding.register, binding.mask
            )),
            None => doc.raw(&format!(
                "{instance},{DEFAULT_CLOCK_REG},SIM_SCGC6_{instance}_MASK=default\n"
            )),
        }
    }
    doc.raw("*/\n");
}

/// Render `gpio-<device>.cpp`.
pub fn render_gpio_source(device: &Device, model: &SymbolModel) -> String {
    let mut doc = DocumentWriter::new();
    doc.cpp_preamble(
        &format!("{GPIO_BASE}.cpp"),
        Some(&device.gpio_source()),
        &device.brief(),
    );
    doc.include("utilities.h");
    doc.include("gpio.h");
    doc.include("pin_mapping.h");
    doc.blank_line();

    write_clock_helpers(&mut doc, model);
    doc.macro_definition("ADC(num)", "CONCAT2_(ADC,num)");
    doc.macro_definition("FTM(num)", "CONCAT2_(FTM,num)");
    doc.macro_definition("TPM(num)", "CONCAT2_(TPM,num)");
    doc.blank_line();

    for io in io_classes(device) {
        for pin in model.pins() {
            for slot in slots_for(model, pin, io.kind) {
                let guard = Guard::for_selection(slot.function, pin);
                guard.open(&mut doc);
                match io.kind {
                    IoKind::Digital => write_digital(&mut doc, device, pin),
                    IoKind::Analogue => write_analogue(&mut doc, model, pin, &slot),
                    IoKind::Pwm(base) => write_pwm(&mut doc, model, pin, &slot, base),
                }
                guard.close(&mut doc);
            }
        }
    }
    doc.finish()
}

fn write_clock_helpers(doc: &mut DocumentWriter, model: &SymbolModel) {
    for (base, what, kind) in [
        ("FTM", "Timer", FamilyKind::Timer),
        ("TPM", "Timer", FamilyKind::Timer),
        ("ADC", "ADC", FamilyKind::Analogue),
    ] {
        if model.instances_of_kind(base, kind).is_empty() {
            continue;
        }
        doc.documented_macro(
            &format!("Create {what} Clock register name from {what} number"),
            &format!("number {what} number e.g. 1 = {base}1_CLOCK_REG"),
            &format!("{base}_CLOCK_REG(number)"),
            &format!("CONCAT3_({base},number,_CLOCK_REG)"),
        );
        doc.documented_macro(
            &format!("Create {what} Clock register mask from {what} number"),
            &format!("number {what} number e.g. 1 = {base}1_CLOCK_MASK"),
            &format!("{base}_CLOCK_MASK(number)"),
            &format!("CONCAT3_({base},number,_CLOCK_MASK)"),
        );
    }
}

fn write_digital(doc: &mut DocumentWriter, device: &Device, pin: &Pin) {
    let p = pin.name();
    let object = format!("digitalIO_{p}");
    let bit_mask = format!("(1UL<<{p}_GPIO_BIT)");
    if device.is_mke() {
        doc.raw(&format!(
            "const DigitalIO {object:<18} = {{{:<18}{bit_mask}}};\n",
            format!("(volatile GPIO_Type*)GPIO({p}_GPIO_NAME),"),
        ));
    } else {
        doc.raw(&format!(
            "const DigitalIO {object:<18} = {{{:<30}{:<18}{:<29}{bit_mask}}};\n",
            format!("&PCR({p}_GPIO_NAME,{p}_GPIO_BIT),"),
            format!("GPIO({p}_GPIO_NAME),"),
            format!("PORT_CLOCK_MASK({p}_GPIO_NAME),"),
        ));
    }
}

/// Reference to the pin's DigitalIO, or a null PCR for analogue-only pins.
fn digital_ref(model: &SymbolModel, pin: &Pin) -> String {
    if port_slot(model, pin).is_some() {
        format!("&digitalIO_{},", pin.name())
    } else {
        "0,".to_string()
    }
}

fn write_analogue(doc: &mut DocumentWriter, model: &SymbolModel, pin: &Pin, slot: &Slot<'_>) {
    let p = pin.name();
    let s = &slot.suffix;
    doc.raw(&format!(
        "const AnalogueIO {:<28} = {{{:<18}{:<20}{:<31}{:<31}{p}_ADC_CH{s}}};\n",
        format!("analogueIO_{p}{s}"),
        digital_ref(model, pin),
        format!("ADC({p}_ADC_NUM{s}),"),
        format!("&ADC_CLOCK_REG({p}_ADC_NUM{s}),"),
        format!("ADC_CLOCK_MASK({p}_ADC_NUM{s}),"),
    ));
}

fn write_pwm(doc: &mut DocumentWriter, model: &SymbolModel, pin: &Pin, slot: &Slot<'_>, base: &str) {
    let p = pin.name();
    let s = &slot.suffix;
    doc.raw(&format!(
        "const PwmIO  {:<15} = {{{:<19}{:<40}{:<15}{:<28}{:<31}{} {}}};\n",
        format!("pwmIO_{p}{s}"),
        digital_ref(model, pin),
        format!("(volatile {base}_Type*){base}({p}_{base}_NUM{s}),"),
        format!("{p}_{base}_CH{s},"),
        format!("PORT_PCR_MUX({p}_{base}_FN{s}),"),
        format!("&{base}_CLOCK_REG({p}_{base}_NUM{s}),"),
        format!("{base}_CLOCK_MASK({p}_{base}_NUM{s}),"),
        format!("{}_SC", slot.function.instance_name()),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinmux_core::{compile, CompileOptions, Table};

    const BOARD: &str = "MK20D5\n\
                         Pin,PTC2,ADC0_SE4b,PTC2,SPI0_PCS2,FTM0_CH1\n\
                         Pin,PTD5,ADC0_SE6b,PTD5,SPI0_PCS2,FTM0_CH5\n\
                         Pin,PTE16,ADC0_SE4a\n\
                         Alias,D10,PTC2\n\
                         ClockInfo,ADC0,SIM->SCGC6\n";

    fn model(text: &str) -> SymbolModel {
        compile(&Table::parse(text), &CompileOptions::default()).unwrap()
    }

    #[test]
    fn header_groups_and_aliases() {
        let out = render_gpio_header(&Device::new("MK20D5"), &model(BOARD));
        assert!(out.starts_with("/**\n * @file      gpio.h (derived from gpio-MK20D5.h)\n"));
        assert!(out.contains(
            "#include \"derivative.h\"\n#include \"pin_mapping.h\"\n#include \"gpio_defs.h\"\n\n"
        ));
        assert!(out.contains("* @addtogroup DigitalIO_Group Digital Input/Output\n"));
        assert!(out.contains(
            "extern const DigitalIO digitalIO_PTC2;          //!< DigitalIO on PTC2\n"
        ));
        assert!(out.contains(
            "#define digitalIO_D10             digitalIO_PTC2       //!< alias D10=>PTC2\n"
        ));
        assert!(out.contains(
            "extern const AnalogueIO analogueIO_PTE16;        //!< AnalogueIO on PTE16\n"
        ));
        assert!(out.contains("extern const PwmIO  pwmIO_PTD5;              //!< PwmIO on PTD5\n"));
        assert!(!out.contains("TPM"));
        assert!(out.ends_with("*/\n\n#endif /* GPIO_H_ */\n"));
    }

    #[test]
    fn header_guards_selectable_functions() {
        let text = "T\n\
                    Pin,PTA1,,,FTM0_CH1\n\
                    Pin,PTB1,,,,FTM0_CH1\n\
                    Pin,PTC1,,PTC1\n";
        let out = render_gpio_header(&Device::new("MK20D5"), &model(text));
        assert!(out.contains(
            "#if FTM0_CH1_SEL == 2\nextern const PwmIO  pwmIO_PTB1;"
        ));
    }

    #[test]
    fn header_summary_block() {
        let out = render_gpio_header(&Device::new("MK20D5"), &model(BOARD));
        assert!(out.contains("SPI0_PCS2,Disabled,[,Disabled, PTC2, PTD5,]\n"));
        assert!(out.contains("ADC0_SE4,PTC2,[,Disabled, PTC2, PTE16,]\n"));
        assert!(!out.contains("GPIOC_2,"));
        assert!(out.contains("ADC0,SIM->SCGC6,SIM_SCGC6_ADC0_MASK\n"));
        assert!(out.contains("FTM0,SIM->SCGC6,SIM_SCGC6_FTM0_MASK=default\n"));
        assert!(!out.contains("GPIOC,"));
    }

    #[test]
    fn mke_header_has_only_digital_group() {
        let out = render_gpio_header(&Device::new("MKE02Z2"), &model(BOARD));
        assert!(out.contains("DigitalIO_Group"));
        assert!(!out.contains("AnalogueIO_Group"));
        assert!(!out.contains("PwmIO_Group"));
    }

    #[test]
    fn source_definitions() {
        let out = render_gpio_source(&Device::new("MK20D5"), &model(BOARD));
        assert!(out.starts_with(" /**\n  * @file     gpio.cpp (from gpio-MK20D5.cpp)\n"));
        assert!(out.contains("#define FTM_CLOCK_REG(number)  CONCAT3_(FTM,number,_CLOCK_REG)\n"));
        assert!(out.contains(" * @param number ADC number e.g. 1 = ADC1_CLOCK_MASK\n"));
        assert!(!out.contains("TPM_CLOCK_REG(number)"));
        assert!(out.contains("#define TPM(num)             CONCAT2_(TPM,num)   \n"));
        assert!(out.contains(
            "const DigitalIO digitalIO_PTC2     = {&PCR(PTC2_GPIO_NAME,PTC2_GPIO_BIT),GPIO(PTC2_GPIO_NAME),PORT_CLOCK_MASK(PTC2_GPIO_NAME),(1UL<<PTC2_GPIO_BIT)};\n"
        ));
        assert!(out.contains(
            "const AnalogueIO analogueIO_PTE16             = {0,                ADC(PTE16_ADC_NUM), &ADC_CLOCK_REG(PTE16_ADC_NUM), ADC_CLOCK_MASK(PTE16_ADC_NUM), PTE16_ADC_CH};\n"
        ));
        assert!(out.contains(
            "const PwmIO  pwmIO_PTC2      = {&digitalIO_PTC2,   (volatile FTM_Type*)FTM(PTC2_FTM_NUM),  PTC2_FTM_CH,   PORT_PCR_MUX(PTC2_FTM_FN),  &FTM_CLOCK_REG(PTC2_FTM_NUM),  FTM_CLOCK_MASK(PTC2_FTM_NUM), FTM0_SC};\n"
        ));
    }

    #[test]
    fn mke_source_uses_compact_digital() {
        let out = render_gpio_source(&Device::new("MKE02Z2"), &model(BOARD));
        assert!(out.contains(
            "const DigitalIO digitalIO_PTC2     = {(volatile GPIO_Type*)GPIO(PTC2_GPIO_NAME),(1UL<<PTC2_GPIO_BIT)};\n"
        ));
        assert!(!out.contains("const AnalogueIO"));
    }
}
