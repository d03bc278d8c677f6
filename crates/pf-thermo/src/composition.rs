//! Fluid composition: normalized mole fractions aligned with a `ComponentSet`.

use crate::error::{ThermoError, ThermoResult};
use crate::species::ComponentSet;
use pf_core::{nearly_equal, Tolerances};

/// Mole-fraction vector, index-aligned with a `ComponentSet`.
///
/// Always normalized (fractions sum to 1). Zero entries are kept so every
/// composition in a flowsheet shares the same index basis; streams gain and
/// lose components (water saturation, phase splits) without re-indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    fractions: Vec<f64>,
}

impl Composition {
    /// Create a composition from mole fractions (any positive scale).
    ///
    /// Validates that all entries are finite and non-negative with a positive
    /// sum, then normalizes.
    pub fn new(fractions: Vec<f64>) -> ThermoResult<Self> {
        if fractions.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "empty composition",
            });
        }
        let mut sum = 0.0;
        for f in &fractions {
            if !f.is_finite() {
                return Err(ThermoError::NonPhysical {
                    what: "non-finite mole fraction",
                });
            }
            if *f < 0.0 {
                return Err(ThermoError::NonPhysical {
                    what: "negative mole fraction",
                });
            }
            sum += f;
        }
        if sum <= 0.0 || !sum.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions sum to zero or non-finite",
            });
        }
        Ok(Self {
            fractions: fractions.into_iter().map(|f| f / sum).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    pub fn fraction(&self, i: usize) -> f64 {
        self.fractions[i]
    }

    /// Mixture molar mass [kg/mol] for a given component set.
    pub fn molar_mass(&self, set: &ComponentSet) -> f64 {
        self.fractions
            .iter()
            .zip(set.iter())
            .map(|(x, c)| x * c.molar_mass)
            .sum()
    }

    /// Maximum absolute per-component difference to another composition.
    pub fn max_abs_diff(&self, other: &Composition) -> f64 {
        self.fractions
            .iter()
            .zip(other.fractions.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// True when the fractions sum to one within tolerance (always holds for
    /// values produced by `new`, useful as a debug check on arithmetic).
    pub fn is_normalized(&self) -> bool {
        let sum: f64 = self.fractions.iter().sum();
        nearly_equal(
            sum,
            1.0,
            Tolerances {
                abs: 1e-9,
                rel: 1e-9,
            },
        )
    }
}
