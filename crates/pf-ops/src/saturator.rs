//! Water saturator: tops a stream up with water to its saturation content.

use pf_thermo::{Composition, PropertyProvider};

use crate::error::{OpError, OpResult};
use crate::state::StreamState;

/// Adds water moles until the water mole fraction reaches the saturation
/// value at the inlet (P, T); total molar flow grows accordingly. A feed
/// already at or above saturation passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Saturator;

impl Saturator {
    pub fn solve(
        &self,
        provider: &dyn PropertyProvider,
        inlet: &StreamState,
    ) -> OpResult<StreamState> {
        let iw = provider
            .components()
            .water_index()
            .ok_or(OpError::InvalidSpec {
                what: "saturator requires water in the component set",
            })?;

        if inlet.is_zero_flow() {
            return Ok(inlet.clone());
        }

        let y_sat = provider.water_saturation_y(inlet.pressure, inlet.temperature);
        let x_w = inlet.composition.fraction(iw);
        if x_w >= y_sat || y_sat >= 1.0 {
            return Ok(inlet.clone());
        }

        // (w + d) / (n + d) = y_sat, solved for the added water moles d.
        let n = inlet.molar_flow;
        let w = n * x_w;
        let added = (y_sat * n - w) / (1.0 - y_sat);

        let mut flows = inlet.component_flows();
        flows[iw] += added;
        StreamState::flashed(
            provider,
            Composition::new(flows)?,
            inlet.pressure,
            inlet.temperature,
            n + added,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::{ComponentData, ComponentSet, PengRobinsonProvider};

    fn provider() -> PengRobinsonProvider {
        PengRobinsonProvider::new(
            ComponentSet::new(vec![
                ComponentData::library("methane").unwrap(),
                ComponentData::library("water").unwrap(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn dry_gas_gains_water_and_flow() {
        let pr = provider();
        let dry = StreamState::flashed(
            &pr,
            Composition::new(vec![1.0, 0.0]).unwrap(),
            50.0e5,
            300.0,
            100.0,
        )
        .unwrap();
        let wet = Saturator.solve(&pr, &dry).unwrap();
        assert!(wet.molar_flow > 100.0);
        let y_sat = pr.water_saturation_y(50.0e5, 300.0);
        assert!((wet.composition.fraction(1) - y_sat).abs() < 1e-12);
        // Methane moles are untouched.
        assert!((wet.component_flows()[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn already_saturated_feed_passes_through() {
        let pr = provider();
        let y_sat = pr.water_saturation_y(50.0e5, 300.0);
        let wet = StreamState::flashed(
            &pr,
            Composition::new(vec![1.0 - 2.0 * y_sat, 2.0 * y_sat]).unwrap(),
            50.0e5,
            300.0,
            100.0,
        )
        .unwrap();
        let out = Saturator.solve(&pr, &wet).unwrap();
        assert_eq!(out.molar_flow, 100.0);
    }

    #[test]
    fn missing_water_component_rejected() {
        let pr = PengRobinsonProvider::new(
            ComponentSet::new(vec![ComponentData::library("methane").unwrap()]).unwrap(),
        );
        let s = StreamState::flashed(
            &pr,
            Composition::new(vec![1.0]).unwrap(),
            50.0e5,
            300.0,
            1.0,
        )
        .unwrap();
        assert!(matches!(
            Saturator.solve(&pr, &s),
            Err(OpError::InvalidSpec { .. })
        ));
    }
}
