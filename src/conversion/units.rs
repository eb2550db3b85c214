//! Length unit types and conversion constants
//!
//! Every factor is expressed in meters per unit, meters being the base unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversion error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Invalid unit '{0}': expected one of cm, m, ft, mm")]
    InvalidUnit(String),
}

// ============================================================================
// Length Conversion Constants (to meters)
// ============================================================================

/// Meters per centimeter
pub const M_PER_CM: f64 = 0.01;
/// Meters per meter
pub const M_PER_M: f64 = 1.0;
/// Meters per foot (international foot)
pub const M_PER_FT: f64 = 0.3048;
/// Meters per millimeter
pub const M_PER_MM: f64 = 0.001;

/// A selectable length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    #[default]
    M,
    Ft,
    Mm,
}

impl LengthUnit {
    /// All units in selector order
    pub const ALL: [LengthUnit; 4] = [LengthUnit::Cm, LengthUnit::M, LengthUnit::Ft, LengthUnit::Mm];

    /// Meters per one unit of this kind
    pub fn factor(&self) -> f64 {
        match self {
            LengthUnit::Cm => M_PER_CM,
            LengthUnit::M => M_PER_M,
            LengthUnit::Ft => M_PER_FT,
            LengthUnit::Mm => M_PER_MM,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::Ft => "ft",
            LengthUnit::Mm => "mm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "Centimeter",
            LengthUnit::M => "Meter",
            LengthUnit::Ft => "Foot",
            LengthUnit::Mm => "Millimeter",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ConversionError;

    /// Identifiers are matched exactly; selectors only ever offer these four.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            "ft" => Ok(LengthUnit::Ft),
            "mm" => Ok(LengthUnit::Mm),
            _ => Err(ConversionError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed, ordered set of selectable units
pub fn available_units() -> &'static [LengthUnit] {
    &LengthUnit::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert_eq!(LengthUnit::Cm.factor(), 0.01);
        assert_eq!(LengthUnit::M.factor(), 1.0);
        assert_eq!(LengthUnit::Ft.factor(), 0.3048);
        assert_eq!(LengthUnit::Mm.factor(), 0.001);
    }

    #[test]
    fn test_available_units_order() {
        let ids: Vec<&str> = available_units().iter().map(|u| u.as_str()).collect();
        assert_eq!(ids, vec!["cm", "m", "ft", "mm"]);
    }

    #[test]
    fn test_parse_valid_ids() {
        for unit in available_units() {
            assert_eq!(unit.as_str().parse::<LengthUnit>(), Ok(*unit));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_ids() {
        assert_eq!(
            "xyz".parse::<LengthUnit>(),
            Err(ConversionError::InvalidUnit("xyz".to_string()))
        );
        // No aliases, no case folding, no trimming
        assert!("M".parse::<LengthUnit>().is_err());
        assert!("meter".parse::<LengthUnit>().is_err());
        assert!(" m".parse::<LengthUnit>().is_err());
        assert!("".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_default_is_meters() {
        assert_eq!(LengthUnit::default(), LengthUnit::M);
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(serde_json::to_string(&LengthUnit::Ft).unwrap(), "\"ft\"");
        let unit: LengthUnit = serde_json::from_str("\"mm\"").unwrap();
        assert_eq!(unit, LengthUnit::Mm);
    }
}
