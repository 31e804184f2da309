//! Peripheral family recognition.
//!
//! Each cell token in a Pin row is matched against an ordered list of
//! family patterns. The first pattern that matches decides the family and
//! extracts `(base name, instance, signal)`. Adding a family means adding
//! an entry here; the resolver passes never inspect token text themselves.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// How a family's functions are rendered and classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilyKind {
    /// Port bit, rendered as `_GPIO_NAME`/`_GPIO_BIT`/`_GPIO_FN`.
    Port,
    /// ADC channel, rendered as `_ADC_NUM`/`_ADC_CH`/`_ADC_FN`.
    Analogue,
    /// Timer channel, rendered as `_<BASE>_NUM`/`_<BASE>_CH`/`_<BASE>_FN`.
    Timer,
    /// Storage interface signal.
    Storage,
    /// Serial bus signal (SPI, I2C).
    Serial,
    /// Anything else of the form `<BASE><n>_<SIGNAL>`.
    Generic,
}

impl FamilyKind {
    /// Real-candidate count at or below which a function is collapsed.
    pub fn collapse_threshold(&self) -> usize {
        match self {
            FamilyKind::Port | FamilyKind::Analogue | FamilyKind::Storage => 2,
            FamilyKind::Timer | FamilyKind::Serial | FamilyKind::Generic => 1,
        }
    }

    /// Whether a collapsed function has its preferred pin forced to the
    /// sole real candidate.
    pub fn forces_default_when_collapsed(&self) -> bool {
        matches!(self, FamilyKind::Analogue | FamilyKind::Timer)
    }

    /// Whether per-pin blocks define macros named after the function
    /// (`<FUNC>_FN`) rather than after the pin.
    pub fn function_named_macros(&self) -> bool {
        matches!(
            self,
            FamilyKind::Storage | FamilyKind::Serial | FamilyKind::Generic
        )
    }
}

/// The parts extracted from a matched token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub kind: FamilyKind,
    pub base_name: String,
    pub instance: String,
    pub signal: String,
}

impl Signal {
    /// Canonical function name, e.g. `FTM0_CH6` or `GPIOA_3`.
    pub fn canonical_name(&self) -> String {
        format!("{}{}_{}", self.base_name, self.instance, self.signal)
    }
}

/// One family entry: a pattern whose captures are `(instance, signal)`.
#[derive(Debug, Clone)]
pub struct Family {
    pub kind: FamilyKind,
    /// Fixed base name, or `None` to take it from the first capture.
    base_name: Option<&'static str>,
    pattern: Regex,
}

impl Family {
    /// Create a family entry.
    ///
    /// With a fixed `base_name` the pattern captures `(instance, signal)`,
    /// otherwise it captures `(base, instance, signal)`.
    pub fn new(
        kind: FamilyKind,
        base_name: Option<&'static str>,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Family {
            kind,
            base_name,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Match a trimmed token against this family.
    pub fn recognize(&self, token: &str) -> Option<Signal> {
        let caps = self.pattern.captures(token)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
        let (base_name, instance, signal) = match self.base_name {
            Some(base) => (base.to_string(), group(1), group(2)),
            None => (group(1), group(2), group(3)),
        };
        Some(Signal {
            kind: self.kind,
            base_name,
            instance,
            signal,
        })
    }
}

/// `(kind, fixed base name, pattern)` of the standard families, in match order.
pub const STANDARD_FAMILIES: [(FamilyKind, Option<&str>, &str); 9] = [
    (FamilyKind::Port, Some("GPIO"), r"^PT([A-Z])(\d+)$"),
    (FamilyKind::Port, Some("GPIO"), r"^GPIO([A-Z])_(\d+)$"),
    (
        FamilyKind::Analogue,
        Some("ADC"),
        r"^ADC(\d*)_((?:SE|DM|DP)\d+)[ab]?$",
    ),
    (FamilyKind::Timer, Some("FTM"), r"^FTM(\d*)_(CH\d+)$"),
    (FamilyKind::Timer, Some("TPM"), r"^TPM(\d*)_(CH\d+)$"),
    (
        FamilyKind::Storage,
        Some("SDHC"),
        r"^SDHC(\d*)_(CLKIN|D\d|CMD|DCLK)$",
    ),
    (
        FamilyKind::Serial,
        Some("SPI"),
        r"^SPI(\d*)_(SOUT|SIN|SCK|PCS\d*|MOSI|MISO|SS_B)$",
    ),
    (FamilyKind::Serial, Some("I2C"), r"^I2C(\d*)_(SDA|SCL)$"),
    (FamilyKind::Generic, None, r"^([A-Z][A-Z0-9]*?[A-Z])(\d*)_(\w+)$"),
];

// The patterns are constants; `standard_patterns_compile` keeps them valid.
static STANDARD: LazyLock<FamilyTable> = LazyLock::new(|| {
    FamilyTable::try_standard().expect("standard family patterns are valid regexes")
});

/// Ordered family list, evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct FamilyTable {
    families: Vec<Family>,
}

impl FamilyTable {
    /// The standard Kinetis-style family list, compiled once per process.
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Compile [`STANDARD_FAMILIES`] into a table.
    pub fn try_standard() -> Result<Self, regex::Error> {
        let families = STANDARD_FAMILIES
            .iter()
            .map(|&(kind, base_name, pattern)| Family::new(kind, base_name, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FamilyTable { families })
    }

    /// Build a table from explicit entries.
    pub fn with_families(families: Vec<Family>) -> Self {
        FamilyTable { families }
    }

    /// Recognize a token, first match wins.
    pub fn recognize(&self, token: &str) -> Option<Signal> {
        self.families.iter().find_map(|f| f.recognize(token))
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }
}

impl Default for FamilyTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(token: &str) -> Option<Signal> {
        FamilyTable::standard().recognize(token)
    }

    #[test]
    fn port_bit_tokens() {
        let s = recognize("PTA3").unwrap();
        assert_eq!(s.kind, FamilyKind::Port);
        assert_eq!(s.canonical_name(), "GPIOA_3");
        assert_eq!(recognize("GPIOB_12").unwrap().canonical_name(), "GPIOB_12");
    }

    #[test]
    fn analogue_tokens() {
        let s = recognize("ADC0_SE12").unwrap();
        assert_eq!(s.kind, FamilyKind::Analogue);
        assert_eq!(s.instance, "0");
        assert_eq!(s.signal, "SE12");
        assert_eq!(s.canonical_name(), "ADC0_SE12");
        assert_eq!(recognize("ADC1_SE4b").unwrap().canonical_name(), "ADC1_SE4");
        assert_eq!(recognize("ADC0_DP0").unwrap().canonical_name(), "ADC0_DP0");
    }

    #[test]
    fn timer_tokens() {
        let s = recognize("FTM0_CH6").unwrap();
        assert_eq!(s.kind, FamilyKind::Timer);
        assert_eq!(s.base_name, "FTM");
        assert_eq!(s.canonical_name(), "FTM0_CH6");
        let t = recognize("TPM2_CH1").unwrap();
        assert_eq!(t.base_name, "TPM");
        assert_eq!(t.kind, FamilyKind::Timer);
    }

    #[test]
    fn serial_and_storage_tokens() {
        assert_eq!(recognize("SPI0_PCS2").unwrap().kind, FamilyKind::Serial);
        assert_eq!(recognize("I2C1_SCL").unwrap().canonical_name(), "I2C1_SCL");
        let sd = recognize("SDHC0_D3").unwrap();
        assert_eq!(sd.kind, FamilyKind::Storage);
        assert_eq!(sd.canonical_name(), "SDHC0_D3");
    }

    #[test]
    fn generic_catch_all() {
        let s = recognize("UART0_TX").unwrap();
        assert_eq!(s.kind, FamilyKind::Generic);
        assert_eq!(s.base_name, "UART");
        assert_eq!(s.instance, "0");
        assert_eq!(s.signal, "TX");
        let j = recognize("JTAG_TCLK").unwrap();
        assert_eq!(j.base_name, "JTAG");
        assert_eq!(j.instance, "");
        assert_eq!(j.canonical_name(), "JTAG_TCLK");
        assert_eq!(recognize("I2S0_TX_BCLK").unwrap().signal, "TX_BCLK");
    }

    #[test]
    fn first_match_wins() {
        // FTM fault inputs are not channels and fall through to generic.
        let s = recognize("FTM0_FLT2").unwrap();
        assert_eq!(s.kind, FamilyKind::Generic);
        assert_eq!(s.canonical_name(), "FTM0_FLT2");
    }

    #[test]
    fn annotation_text_is_unmatched() {
        assert!(recognize("EXTAL0").is_none());
        assert!(recognize("Reserved").is_none());
        assert!(recognize("see note 3").is_none());
        assert!(recognize("").is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(Family::new(FamilyKind::Generic, None, r"^(unclosed$").is_err());
    }

    #[test]
    fn standard_patterns_compile() {
        let table = FamilyTable::try_standard().unwrap();
        assert_eq!(table.families().len(), STANDARD_FAMILIES.len());
        assert_eq!(FamilyTable::standard().families().len(), STANDARD_FAMILIES.len());
    }

    #[test]
    fn thresholds_by_kind() {
        assert_eq!(FamilyKind::Port.collapse_threshold(), 2);
        assert_eq!(FamilyKind::Analogue.collapse_threshold(), 2);
        assert_eq!(FamilyKind::Storage.collapse_threshold(), 2);
        assert_eq!(FamilyKind::Timer.collapse_threshold(), 1);
        assert_eq!(FamilyKind::Serial.collapse_threshold(), 1);
        assert!(FamilyKind::Timer.forces_default_when_collapsed());
        assert!(!FamilyKind::Serial.forces_default_when_collapsed());
    }

    #[test]
    fn custom_family_table() {
        let can = Family::new(FamilyKind::Serial, Some("CAN"), r"^CAN(\d*)_(TX|RX)$").unwrap();
        let table = FamilyTable::with_families(vec![can]);
        assert_eq!(table.recognize("CAN0_TX").unwrap().canonical_name(), "CAN0_TX");
        assert!(table.recognize("UART0_TX").is_none());
        assert_eq!(table.families().len(), 1);
    }
}
