// pf-core/src/units.rs

use uom::si::f64::{
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

/// Absolute pressure from bara.
#[inline]
pub fn bara(v: f64) -> Pressure {
    pa(v * 1.0e5)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Temperature from degrees Celsius.
#[inline]
pub fn celsius(v: f64) -> Temperature {
    k(v + 273.15)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn watt(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

pub mod constants {
    /// Universal gas constant [J/(mol·K)].
    pub const R_GAS: f64 = 8.314_462_618;

    /// Standard reference conditions for Sm³ gas volumes (15 °C, 1 atm).
    pub const STANDARD_T_K: f64 = 288.15;
    pub const STANDARD_P_PA: f64 = 101_325.0;

    /// Molar volume of an ideal gas at standard conditions [m³/mol].
    pub fn standard_molar_volume() -> f64 {
        R_GAS * STANDARD_T_K / STANDARD_P_PA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _w = watt(1000.0);
        let _dt = s(0.1);
    }

    #[test]
    fn bara_and_celsius_offsets() {
        assert!((bara(1.0).value - 1.0e5).abs() < 1e-9);
        assert!((celsius(20.0).value - 293.15).abs() < 1e-12);
    }

    #[test]
    fn standard_molar_volume_is_near_23_6_liters() {
        let v = constants::standard_molar_volume();
        assert!((v - 0.023645).abs() < 1e-4);
    }
}
