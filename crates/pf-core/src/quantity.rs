//! Unit-of-measure strings for the build/query contract.
//!
//! Callers express pressures, temperatures, flows and powers as a numeric
//! value plus a unit string ("bara", "C", "kg/hr", "MSm3/day"). Internally
//! everything is SI (Pa, K, mol/s, kg/s, W). An unrecognized unit string is
//! an error, never a silent no-op.

use crate::units::constants::standard_molar_volume;
use std::fmt;
use thiserror::Error;

/// Dimension family a unit string must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Temperature (canonical: K)
    Temperature,
    /// Absolute pressure (canonical: Pa)
    Pressure,
    /// Molar flow (canonical: mol/s); includes standard-volume gas rates
    MolarFlow,
    /// Mass flow (canonical: kg/s)
    MassFlow,
    /// Power (canonical: W)
    Power,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Absolute Pressure"),
            Self::MolarFlow => write!(f, "Molar Flow"),
            Self::MassFlow => write!(f, "Mass Flow"),
            Self::Power => write!(f, "Power"),
        }
    }
}

/// Error in unit validation or conversion.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: Quantity },

    #[error("Non-finite value {value} for unit '{unit}'")]
    NonFinite { value: f64, unit: String },
}

// Pressure gauge units reference one standard atmosphere.
const ATM_PA: f64 = 101_325.0;

/// Convert a value with a unit string into canonical SI for the quantity.
pub fn to_si(value: f64, unit: &str, quantity: Quantity) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite {
            value,
            unit: unit.to_string(),
        });
    }
    let si = match quantity {
        Quantity::Temperature => match unit {
            "K" => value,
            "C" => value + 273.15,
            "F" => (value - 32.0) / 1.8 + 273.15,
            _ => return unknown(unit, quantity),
        },
        Quantity::Pressure => match unit {
            "Pa" => value,
            "kPa" => value * 1.0e3,
            "bar" | "bara" => value * 1.0e5,
            "barg" => value * 1.0e5 + ATM_PA,
            "atm" => value * ATM_PA,
            _ => return unknown(unit, quantity),
        },
        Quantity::MolarFlow => match unit {
            "mol/s" => value,
            "kmol/hr" => value * 1.0e3 / 3600.0,
            "Sm3/day" => value / standard_molar_volume() / 86_400.0,
            "MSm3/day" => value * 1.0e6 / standard_molar_volume() / 86_400.0,
            _ => return unknown(unit, quantity),
        },
        Quantity::MassFlow => match unit {
            "kg/s" => value,
            "kg/hr" => value / 3600.0,
            "kg/day" => value / 86_400.0,
            "t/hr" => value * 1.0e3 / 3600.0,
            _ => return unknown(unit, quantity),
        },
        Quantity::Power => match unit {
            "W" => value,
            "kW" => value * 1.0e3,
            "MW" => value * 1.0e6,
            _ => return unknown(unit, quantity),
        },
    };
    Ok(si)
}

/// Convert a canonical SI value into the requested unit for the quantity.
pub fn from_si(si_value: f64, unit: &str, quantity: Quantity) -> Result<f64, UnitError> {
    let out = match quantity {
        Quantity::Temperature => match unit {
            "K" => si_value,
            "C" => si_value - 273.15,
            "F" => (si_value - 273.15) * 1.8 + 32.0,
            _ => return unknown(unit, quantity),
        },
        Quantity::Pressure => match unit {
            "Pa" => si_value,
            "kPa" => si_value / 1.0e3,
            "bar" | "bara" => si_value / 1.0e5,
            "barg" => (si_value - ATM_PA) / 1.0e5,
            "atm" => si_value / ATM_PA,
            _ => return unknown(unit, quantity),
        },
        Quantity::MolarFlow => match unit {
            "mol/s" => si_value,
            "kmol/hr" => si_value * 3600.0 / 1.0e3,
            "Sm3/day" => si_value * standard_molar_volume() * 86_400.0,
            "MSm3/day" => si_value * standard_molar_volume() * 86_400.0 / 1.0e6,
            _ => return unknown(unit, quantity),
        },
        Quantity::MassFlow => match unit {
            "kg/s" => si_value,
            "kg/hr" => si_value * 3600.0,
            "kg/day" => si_value * 86_400.0,
            "t/hr" => si_value * 3600.0 / 1.0e3,
            _ => return unknown(unit, quantity),
        },
        Quantity::Power => match unit {
            "W" => si_value,
            "kW" => si_value / 1.0e3,
            "MW" => si_value / 1.0e6,
            _ => return unknown(unit, quantity),
        },
    };
    Ok(out)
}

fn unknown<T>(unit: &str, quantity: Quantity) -> Result<T, UnitError> {
    Err(UnitError::UnknownUnit {
        unit: unit.to_string(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_round_trip() {
        let si = to_si(75.0, "bara", Quantity::Pressure).unwrap();
        assert!((si - 7.5e6).abs() < 1e-6);
        let back = from_si(si, "bara", Quantity::Pressure).unwrap();
        assert!((back - 75.0).abs() < 1e-9);
    }

    #[test]
    fn temperature_celsius() {
        let si = to_si(75.9, "C", Quantity::Temperature).unwrap();
        assert!((si - 349.05).abs() < 1e-9);
        let back = from_si(si, "C", Quantity::Temperature).unwrap();
        assert!((back - 75.9).abs() < 1e-9);
    }

    #[test]
    fn standard_gas_rate() {
        // 10 MSm3/day of ideal gas at 15 C / 1 atm is roughly 4895 mol/s.
        let si = to_si(10.0, "MSm3/day", Quantity::MolarFlow).unwrap();
        assert!((si - 4894.0).abs() < 10.0);
    }

    #[test]
    fn mass_flow_per_hour() {
        let si = to_si(3600.0, "kg/hr", Quantity::MassFlow).unwrap();
        assert!((si - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let err = to_si(1.0, "furlong", Quantity::Pressure).unwrap_err();
        assert!(matches!(err, UnitError::UnknownUnit { .. }));
        let err = from_si(1.0, "hp", Quantity::Power).unwrap_err();
        assert!(matches!(err, UnitError::UnknownUnit { .. }));
    }

    #[test]
    fn non_finite_rejected() {
        assert!(to_si(f64::NAN, "bara", Quantity::Pressure).is_err());
    }
}
