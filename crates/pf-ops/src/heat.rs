//! Heaters and coolers: bring a stream to a target temperature and/or
//! pressure, recording the duty.

use pf_thermo::PropertyProvider;

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

/// Outcome of a heat-exchange solve: the outlet plus the duty [W].
#[derive(Debug, Clone)]
pub struct Heated {
    pub outlet: StreamState,
    /// Heat added to the fluid, negative when removing [W].
    pub duty: f64,
}

/// Targets shared by `Heater` and `Cooler`. A `None` target keeps the inlet
/// value.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatSpec {
    /// Outlet temperature [K].
    pub t_out: Option<f64>,
    /// Outlet pressure [Pa].
    pub p_out: Option<f64>,
}

impl HeatSpec {
    fn validate(&self) -> OpResult<()> {
        if let Some(t) = self.t_out {
            if !(t.is_finite() && t > 0.0) {
                return Err(OpError::InvalidSpec {
                    what: "heat target temperature must be positive",
                });
            }
        }
        if let Some(p) = self.p_out {
            if !(p.is_finite() && p > 0.0) {
                return Err(OpError::InvalidSpec {
                    what: "heat target pressure must be positive",
                });
            }
        }
        Ok(())
    }

    fn solve(&self, provider: &dyn PropertyProvider, inlet: &StreamState) -> OpResult<Heated> {
        self.validate()?;
        let t = self.t_out.unwrap_or(inlet.temperature);
        let p = self.p_out.unwrap_or(inlet.pressure);
        let h_in = inlet.molar_enthalpy()?;
        let outlet = StreamState::flashed(
            provider,
            inlet.composition.clone(),
            p,
            t,
            inlet.molar_flow,
        )?;
        let duty = inlet.molar_flow * (outlet.molar_enthalpy()? - h_in);
        Ok(Heated { outlet, duty })
    }
}

/// Heater: raises (or at a degenerate target, holds) the stream condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heater {
    pub spec: HeatSpec,
}

impl Heater {
    pub fn to_temperature(t_out: f64) -> Self {
        Self {
            spec: HeatSpec {
                t_out: Some(t_out),
                p_out: None,
            },
        }
    }

    pub fn to_conditions(t_out: f64, p_out: f64) -> Self {
        Self {
            spec: HeatSpec {
                t_out: Some(t_out),
                p_out: Some(p_out),
            },
        }
    }

    pub fn solve(&self, provider: &dyn PropertyProvider, inlet: &StreamState) -> OpResult<Heated> {
        self.spec.solve(provider, inlet)
    }
}

/// Cooler: same balance as the heater, duty comes out negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooler {
    pub spec: HeatSpec,
}

impl Cooler {
    pub fn to_temperature(t_out: f64) -> Self {
        Self {
            spec: HeatSpec {
                t_out: Some(t_out),
                p_out: None,
            },
        }
    }

    pub fn solve(&self, provider: &dyn PropertyProvider, inlet: &StreamState) -> OpResult<Heated> {
        self.spec.solve(provider, inlet)
    }
}
