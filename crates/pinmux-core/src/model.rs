//! The symbol model: pins, peripheral functions, aliases and clock bindings.
//!
//! A [`SymbolModel`] is built fresh for every input table and threaded
//! through the resolver passes by `&mut`. Pins and functions are owned here
//! and referenced by name everywhere else.
//!
//! The candidate list of a [`PeripheralFunction`] is append-only. A pin's
//! position in that list is its selection index, the literal value used in
//! generated `#if <FUNC>_SEL == <index>` guards, so the list is never sorted
//! or reordered once built.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Serialize, Serializer};

use crate::family::{FamilyKind, Signal};
use crate::natural::{natural_cmp, sort_natural};

/// Sentinel candidate name at selection index 0.
pub const DISABLED: &str = "Disabled";

static DISABLED_CANDIDATE: Candidate = Candidate::Disabled;

/// A (function, mux value) pair held in a pin's mapping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionMapping {
    pub function: String,
    pub mux: u32,
}

/// A physical pin.
#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    name: String,
    mappings: Vec<FunctionMapping>,
}

impl Pin {
    fn new(name: &str) -> Self {
        Pin {
            name: name.to_string(),
            mappings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Function mappings in encounter order.
    pub fn mappings(&self) -> &[FunctionMapping] {
        &self.mappings
    }

    /// Description derived from the mapped functions, e.g.
    /// `PTB2 = ADC0_SE12,GPIOB_2,I2C0_SCL`.
    pub fn description(&self) -> String {
        if self.mappings.is_empty() {
            return self.name.clone();
        }
        let functions: Vec<&str> = self.mappings.iter().map(|m| m.function.as_str()).collect();
        format!("{} = {}", self.name, functions.join(","))
    }
}

/// An entry in a function's candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Index 0: the function is not routed to any pin.
    Disabled,
    Pin(String),
}

impl Candidate {
    pub fn name(&self) -> &str {
        match self {
            Candidate::Disabled => DISABLED,
            Candidate::Pin(name) => name,
        }
    }

    pub fn pin(&self) -> Option<&str> {
        match self {
            Candidate::Disabled => None,
            Candidate::Pin(name) => Some(name),
        }
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Result of the selection-width classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    /// Emits a `<FUNC>_SEL` choice macro and guarded per-pin blocks.
    Selectable,
    /// Emitted unconditionally, no choice offered.
    Collapsed,
}

/// A specific signal of a specific peripheral instance.
#[derive(Debug, Clone, Serialize)]
pub struct PeripheralFunction {
    name: String,
    kind: FamilyKind,
    base_name: String,
    instance: String,
    signal: String,
    candidates: Vec<Candidate>,
    preferred_pin_index: usize,
    selection: Option<Selection>,
}

impl PeripheralFunction {
    fn new(signal: &Signal) -> Self {
        PeripheralFunction {
            name: signal.canonical_name(),
            kind: signal.kind,
            base_name: signal.base_name.clone(),
            instance: signal.instance.clone(),
            signal: signal.signal.clone(),
            candidates: vec![Candidate::Disabled],
            preferred_pin_index: 0,
            selection: None,
        }
    }

    /// Canonical name, e.g. `FTM0_CH6`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FamilyKind {
        self.kind
    }

    /// Peripheral family tag, e.g. `FTM`.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Instance designator, e.g. `0` or `A`.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Signal tag, e.g. `CH6`.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Peripheral instance name, e.g. `FTM0`.
    pub fn instance_name(&self) -> String {
        format!("{}{}", self.base_name, self.instance)
    }

    /// Channel number: the trailing digit run of the signal.
    pub fn channel(&self) -> &str {
        let start = self
            .signal
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |i| i + 1);
        &self.signal[start..]
    }

    /// Candidate list, `Disabled` first.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of candidates that are real pins.
    pub fn real_candidate_count(&self) -> usize {
        self.candidates.len() - 1
    }

    /// Selection index of a pin, if it is a candidate.
    pub fn candidate_index(&self, pin: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c.pin() == Some(pin))
    }

    pub fn preferred_pin_index(&self) -> usize {
        self.preferred_pin_index
    }

    /// The candidate at the preferred index.
    pub fn preferred_candidate(&self) -> &Candidate {
        self.candidates
            .get(self.preferred_pin_index)
            .unwrap_or(&DISABLED_CANDIDATE)
    }

    /// Classification, once the classifier has run.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_selectable(&self) -> bool {
        self.selection == Some(Selection::Selectable)
    }

    /// Append a pin unless already present; returns its selection index.
    fn add_candidate(&mut self, pin: &str) -> usize {
        match self.candidate_index(pin) {
            Some(index) => index,
            None => {
                self.candidates.push(Candidate::Pin(pin.to_string()));
                self.candidates.len() - 1
            }
        }
    }

    pub(crate) fn set_preferred_pin_index(&mut self, index: usize) {
        self.preferred_pin_index = index;
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }
}

/// Clock enable register and mask for a peripheral instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockBinding {
    /// Register expression, e.g. `SIM->SCGC6`.
    pub register: String,
    /// Mask expression, e.g. `SIM_SCGC6_ADC0_MASK`.
    pub mask: String,
}

impl ClockBinding {
    /// Binding with the conventional mask derived from register and name:
    /// `SIM->SCGC6` and `ADC0` give `SIM_SCGC6_ADC0_MASK`.
    pub fn with_derived_mask(instance: &str, register: &str) -> Self {
        ClockBinding {
            register: register.to_string(),
            mask: format!("{}_{}_MASK", register.replace("->", "_"), instance),
        }
    }
}

/// Whether an instance name has the form `PORT<letter>`.
pub fn is_port_instance(name: &str) -> bool {
    name.strip_prefix("PORT").is_some_and(|rest| {
        let mut chars = rest.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
    })
}

/// All symbols of one compilation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolModel {
    pins: Vec<Pin>,
    #[serde(skip)]
    pin_index: HashMap<String, usize>,
    functions: BTreeMap<String, PeripheralFunction>,
    aliases: BTreeMap<String, String>,
    pin_aliases: BTreeMap<String, Vec<String>>,
    clocks: BTreeMap<String, ClockBinding>,
    instances: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolModel {
    pub fn new() -> Self {
        Self::default()
    }

    // --- pins ---

    /// Fetch a pin, creating it on first reference.
    pub fn get_or_create_pin(&mut self, name: &str) -> &Pin {
        let index = match self.pin_index.get(name) {
            Some(&index) => index,
            None => {
                self.pins.push(Pin::new(name));
                let index = self.pins.len() - 1;
                self.pin_index.insert(name.to_string(), index);
                index
            }
        };
        &self.pins[index]
    }

    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pin_index.get(name).map(|&i| &self.pins[i])
    }

    /// Pins in creation order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    // --- functions ---

    /// Fetch a function, creating it on first reference.
    pub fn get_or_create_function(&mut self, signal: &Signal) -> &PeripheralFunction {
        let name = signal.canonical_name();
        if !self.functions.contains_key(&name) {
            self.instances
                .entry(signal.base_name.clone())
                .or_default()
                .insert(signal.instance.clone());
        }
        self.functions
            .entry(name)
            .or_insert_with(|| PeripheralFunction::new(signal))
    }

    pub fn function(&self, name: &str) -> Option<&PeripheralFunction> {
        self.functions.get(name)
    }

    pub(crate) fn function_mut(&mut self, name: &str) -> Option<&mut PeripheralFunction> {
        self.functions.get_mut(name)
    }

    /// All functions in natural name order.
    pub fn functions(&self) -> Vec<&PeripheralFunction> {
        let mut functions: Vec<&PeripheralFunction> = self.functions.values().collect();
        functions.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        functions
    }

    /// All function names in natural order.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        sort_natural(&mut names);
        names
    }

    pub(crate) fn functions_mut(&mut self) -> impl Iterator<Item = &mut PeripheralFunction> {
        self.functions.values_mut()
    }

    /// Record that `pin` can carry `function` at `mux`.
    ///
    /// Appends to the pin's mapping list and, if the pin is new to the
    /// function, to the function's candidate list. Both must already exist.
    pub fn add_mapping(&mut self, pin: &str, function: &str, mux: u32) -> Option<usize> {
        let pin_slot = *self.pin_index.get(pin)?;
        let index = self.functions.get_mut(function)?.add_candidate(pin);
        self.pins[pin_slot].mappings.push(FunctionMapping {
            function: function.to_string(),
            mux,
        });
        Some(index)
    }

    /// Mappings on `pin` whose function belongs to `kind`, in encounter order.
    pub fn mappings_of_kind<'a>(
        &'a self,
        pin: &'a Pin,
        kind: FamilyKind,
    ) -> impl Iterator<Item = (&'a FunctionMapping, &'a PeripheralFunction)> + 'a {
        pin.mappings.iter().filter_map(move |m| {
            self.functions
                .get(&m.function)
                .filter(|f| f.kind == kind)
                .map(|f| (m, f))
        })
    }

    /// Mappings on `pin` whose function has the given base name.
    pub fn mappings_of_base<'a>(
        &'a self,
        pin: &'a Pin,
        base_name: &'a str,
    ) -> impl Iterator<Item = (&'a FunctionMapping, &'a PeripheralFunction)> + 'a {
        pin.mappings.iter().filter_map(move |m| {
            self.functions
                .get(&m.function)
                .filter(|f| f.base_name == base_name)
                .map(|f| (m, f))
        })
    }

    /// Instances of a base name owning at least one function of `kind`, in
    /// natural order. `FTM0_FLT2` alone does not make `FTM0` a timer.
    pub fn instances_of_kind(&self, base_name: &str, kind: FamilyKind) -> Vec<String> {
        let owned: BTreeSet<&str> = self
            .functions
            .values()
            .filter(|f| f.base_name == base_name && f.kind == kind)
            .map(|f| f.instance.as_str())
            .collect();
        let mut instances: Vec<String> = owned.into_iter().map(str::to_string).collect();
        sort_natural(&mut instances);
        instances
    }

    /// Every peripheral instance name (`FTM0`, `GPIOA`, ...), natural order.
    pub fn peripheral_instances(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .instances
            .iter()
            .flat_map(|(base, set)| set.iter().map(move |i| format!("{base}{i}")))
            .collect();
        sort_natural(&mut names);
        names
    }

    // --- aliases ---

    /// Bind `alias` to `pin`. Returns the pin it was previously bound to,
    /// if it was bound to a different one; that binding is removed.
    pub fn bind_alias(&mut self, alias: &str, pin: &str) -> Option<String> {
        let previous = self.aliases.insert(alias.to_string(), pin.to_string());
        let displaced = previous.filter(|p| p != pin);
        if let Some(old_pin) = &displaced {
            if let Some(list) = self.pin_aliases.get_mut(old_pin) {
                list.retain(|a| a != alias);
            }
        }
        let list = self.pin_aliases.entry(pin.to_string()).or_default();
        if !list.iter().any(|a| a == alias) {
            list.push(alias.to_string());
        }
        displaced
    }

    /// The pin an alias is bound to.
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Aliases of a pin, in binding order.
    pub fn aliases_of(&self, pin: &str) -> &[String] {
        self.pin_aliases.get(pin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Comma-separated alias list, or `None` if the pin has no aliases.
    pub fn alias_list(&self, pin: &str) -> Option<String> {
        let aliases = self.aliases_of(pin);
        if aliases.is_empty() {
            None
        } else {
            Some(aliases.join(","))
        }
    }

    /// Pin description including aliases, e.g.
    /// `PTC2 = GPIOC_2,SPI0_PCS2 (Alias: D10,A3)`.
    pub fn pin_description(&self, pin: &Pin) -> String {
        let mut description = pin.description();
        if let Some(aliases) = self.alias_list(&pin.name) {
            description.push_str(&format!(" (Alias: {aliases})"));
        }
        description
    }

    // --- clocks ---

    pub fn set_clock(&mut self, instance: &str, binding: ClockBinding) {
        self.clocks.insert(instance.to_string(), binding);
    }

    pub fn clock(&self, instance: &str) -> Option<&ClockBinding> {
        self.clocks.get(instance)
    }

    /// The register shared by all `PORT<letter>` clock bindings, taken from
    /// the first such binding in natural order.
    pub fn port_clock_register(&self) -> Option<&str> {
        self.clocks()
            .into_iter()
            .find(|(instance, _)| is_port_instance(instance))
            .map(|(_, binding)| binding.register.as_str())
    }

    /// Clock bindings in natural order of instance name.
    pub fn clocks(&self) -> Vec<(&str, &ClockBinding)> {
        let mut clocks: Vec<(&str, &ClockBinding)> =
            self.clocks.iter().map(|(k, v)| (k.as_str(), v)).collect();
        clocks.sort_by(|a, b| natural_cmp(a.0, b.0));
        clocks
    }
}
