//! Device naming: artifact file names derived from the table name.

use std::path::Path;

use crate::error::{EmitError, Result};

/// Version stamped into every generated header.
pub const VERSION: &str = "1.0.0";

/// Base name of the mapping header.
pub const PIN_MAPPING_BASE: &str = "pin_mapping";

/// Base name of the GPIO header and source.
pub const GPIO_BASE: &str = "gpio";

/// The device a table describes, e.g. `MK20D5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Device { name: name.into() }
    }

    /// Device named after the table's file stem.
    pub fn from_table_path(path: &Path) -> Result<Self> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(Device::new)
            .ok_or_else(|| EmitError::MissingDeviceName {
                path: path.display().to_string(),
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// MKE parts have no port control register.
    pub fn is_mke(&self) -> bool {
        self.name.starts_with("MKE")
    }

    pub fn brief(&self) -> String {
        format!("Pin declarations for {}", self.name)
    }

    /// `pin_mapping-<device>.h`
    pub fn pin_mapping_header(&self) -> String {
        format!("{PIN_MAPPING_BASE}-{}.h", self.name)
    }

    /// `gpio-<device>.h`
    pub fn gpio_header(&self) -> String {
        format!("{GPIO_BASE}-{}.h", self.name)
    }

    /// `gpio-<device>.cpp`
    pub fn gpio_source(&self) -> String {
        format!("{GPIO_BASE}-{}.cpp", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_from_table_path() {
        let device = Device::from_table_path(Path::new("boards/MK20D5.csv")).unwrap();
        assert_eq!(device.name(), "MK20D5");
        assert_eq!(device.pin_mapping_header(), "pin_mapping-MK20D5.h");
        assert_eq!(device.gpio_header(), "gpio-MK20D5.h");
        assert_eq!(device.gpio_source(), "gpio-MK20D5.cpp");
        assert_eq!(device.brief(), "Pin declarations for MK20D5");
        assert!(!device.is_mke());
    }

    #[test]
    fn mke_detection() {
        assert!(Device::new("MKE02Z2").is_mke());
        assert!(!Device::new("MKL25Z4").is_mke());
    }

    #[test]
    fn path_without_stem_is_rejected() {
        assert!(matches!(
            Device::from_table_path(Path::new("/")),
            Err(EmitError::MissingDeviceName { .. })
        ));
    }
}
