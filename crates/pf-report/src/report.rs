//! Read-only property report over a converged solution.

use pf_core::quantity::{from_si, to_si, Quantity};
use pf_graph::{Flowsheet, Stream, Unit};
use pf_ops::StreamState;
use pf_solver::Solution;
use pf_thermo::PropertyProvider;
use serde::Serialize;
use tracing::debug;

use crate::error::{QueryError, QueryResult};

/// Answers metric queries against a converged flowsheet solution.
///
/// Construction fails when the solve did not converge, so a report can
/// never serve numbers from a half-iterated recycle loop. All queries are
/// `&self` and idempotent.
pub struct Report<'a> {
    flowsheet: &'a Flowsheet,
    solution: &'a Solution,
    provider: &'a dyn PropertyProvider,
}

/// Serializable per-stream summary row.
#[derive(Debug, Clone, Serialize)]
pub struct StreamRow {
    pub name: String,
    pub pressure_bara: f64,
    pub temperature_c: f64,
    pub molar_flow_mol_s: f64,
    pub mass_flow_kg_hr: f64,
}

/// Serializable solve + stream overview.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub converged: bool,
    pub iterations: usize,
    pub streams: Vec<StreamRow>,
}

impl<'a> Report<'a> {
    pub fn new(
        flowsheet: &'a Flowsheet,
        solution: &'a Solution,
        provider: &'a dyn PropertyProvider,
    ) -> QueryResult<Self> {
        let report = solution.report();
        if !report.converged {
            return Err(QueryError::NotConverged {
                iterations: report.iterations,
                worst_delta: report.worst_delta,
            });
        }
        debug!(iterations = report.iterations, "report opened");
        Ok(Self {
            flowsheet,
            solution,
            provider,
        })
    }

    fn stream(&self, name: &str) -> QueryResult<&Stream> {
        self.flowsheet
            .stream_by_name(name)
            .ok_or_else(|| QueryError::UnknownStream(name.to_string()))
    }

    fn unit(&self, name: &str) -> QueryResult<&Unit> {
        self.flowsheet
            .unit_by_name(name)
            .ok_or_else(|| QueryError::UnknownUnit(name.to_string()))
    }

    fn state(&self, name: &str) -> QueryResult<&StreamState> {
        let stream = self.stream(name)?;
        self.solution
            .stream_state(stream.id)
            .ok_or_else(|| QueryError::UnsolvedStream(name.to_string()))
    }

    /// True vapor pressure: bubble-point pressure of the stream's
    /// composition at a reference temperature.
    pub fn tvp(&self, stream: &str, t_ref: f64, t_unit: &str, p_unit: &str) -> QueryResult<f64> {
        let state = self.state(stream)?;
        let t = to_si(t_ref, t_unit, Quantity::Temperature)?;
        let p = self.provider.bubble_pressure(&state.composition, t)?;
        Ok(from_si(p, p_unit, Quantity::Pressure)?)
    }

    /// Cricondenbar of the stream's composition.
    pub fn cricondenbar(&self, stream: &str, p_unit: &str) -> QueryResult<f64> {
        let state = self.state(stream)?;
        let p = self.provider.cricondenbar(&state.composition)?;
        Ok(from_si(p, p_unit, Quantity::Pressure)?)
    }

    /// Stream flow in a mass-flow or molar-flow unit ("kg/hr", "MSm3/day",
    /// ...). The unit string decides which basis is used.
    pub fn flow(&self, stream: &str, unit: &str) -> QueryResult<f64> {
        let state = self.state(stream)?;
        match from_si(state.mass_flow(self.provider), unit, Quantity::MassFlow) {
            Ok(v) => Ok(v),
            Err(pf_core::UnitError::UnknownUnit { .. }) => {
                Ok(from_si(state.molar_flow, unit, Quantity::MolarFlow)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Shaft power of a pump or compressor.
    pub fn power(&self, unit_name: &str, unit: &str) -> QueryResult<f64> {
        let u = self.unit(unit_name)?;
        let w = self
            .solution
            .power(u.id)
            .ok_or_else(|| QueryError::NoMetric {
                unit: unit_name.to_string(),
                metric: "shaft power",
            })?;
        Ok(from_si(w, unit, Quantity::Power)?)
    }

    /// Heat duty of a heater or cooler.
    pub fn duty(&self, unit_name: &str, unit: &str) -> QueryResult<f64> {
        let u = self.unit(unit_name)?;
        let q = self
            .solution
            .duty(u.id)
            .ok_or_else(|| QueryError::NoMetric {
                unit: unit_name.to_string(),
                metric: "heat duty",
            })?;
        Ok(from_si(q, unit, Quantity::Power)?)
    }

    /// Stream-by-stream overview, for serialization.
    pub fn summary(&self) -> QueryResult<Summary> {
        let report = self.solution.report();
        let mut streams = Vec::with_capacity(self.flowsheet.streams().len());
        for s in self.flowsheet.streams() {
            let state = self
                .solution
                .stream_state(s.id)
                .ok_or_else(|| QueryError::UnsolvedStream(s.name.clone()))?;
            streams.push(StreamRow {
                name: s.name.clone(),
                pressure_bara: from_si(state.pressure, "bara", Quantity::Pressure)?,
                temperature_c: from_si(state.temperature, "C", Quantity::Temperature)?,
                molar_flow_mol_s: state.molar_flow,
                mass_flow_kg_hr: from_si(
                    state.mass_flow(self.provider),
                    "kg/hr",
                    Quantity::MassFlow,
                )?,
            });
        }
        Ok(Summary {
            converged: report.converged,
            iterations: report.iterations,
            streams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_graph::FlowsheetBuilder;
    use pf_ops::{Heater, Separator, Source, UnitKind};
    use pf_solver::{solve, CancelToken, SolveOptions};
    use pf_thermo::{ComponentData, ComponentSet, Composition, PengRobinsonProvider};

    fn provider() -> PengRobinsonProvider {
        PengRobinsonProvider::new(
            ComponentSet::new(vec![
                ComponentData::library("methane").unwrap(),
                ComponentData::library("n-pentane").unwrap(),
            ])
            .unwrap(),
        )
    }

    fn sheet() -> Flowsheet {
        let mut b = FlowsheetBuilder::new();
        let feed = b.add_stream("feed");
        let hot = b.add_stream("hot");
        let gas = b.add_stream("gas");
        let oil = b.add_stream("oil");
        b.add_unit(
            "well",
            UnitKind::Source(
                Source::new(
                    Composition::new(vec![0.4, 0.6]).unwrap(),
                    20.0e5,
                    310.0,
                    50.0,
                )
                .unwrap(),
            ),
            &[],
            &[feed],
        )
        .unwrap();
        b.add_unit(
            "heater",
            UnitKind::Heater(Heater::to_temperature(340.0)),
            &[feed],
            &[hot],
        )
        .unwrap();
        b.add_unit("sep", UnitKind::Separator(Separator), &[hot], &[gas, oil])
            .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn queries_answer_in_requested_units() {
        let pr = provider();
        let fs = sheet();
        let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
        let rep = Report::new(&fs, &sol, &pr).unwrap();

        let q_kw = rep.duty("heater", "kW").unwrap();
        let q_w = rep.duty("heater", "W").unwrap();
        assert!((q_w - q_kw * 1.0e3).abs() < 1e-6);
        assert!(q_kw > 0.0);

        let tvp = rep.tvp("oil", 20.0, "C", "bara").unwrap();
        assert!(tvp > 0.0 && tvp < 100.0, "tvp = {tvp}");

        let m = rep.flow("feed", "kg/hr").unwrap();
        assert!(m > 0.0);
        let n = rep.flow("feed", "mol/s").unwrap();
        assert!((n - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_names_and_metrics_are_errors() {
        let pr = provider();
        let fs = sheet();
        let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
        let rep = Report::new(&fs, &sol, &pr).unwrap();

        assert!(matches!(
            rep.flow("nope", "kg/hr"),
            Err(QueryError::UnknownStream(_))
        ));
        assert!(matches!(
            rep.power("nope", "kW"),
            Err(QueryError::UnknownUnit(_))
        ));
        // A separator records neither power nor duty.
        assert!(matches!(
            rep.power("sep", "kW"),
            Err(QueryError::NoMetric { .. })
        ));
        // A bad unit string is an error, not a silent pass-through.
        assert!(matches!(
            rep.flow("feed", "stone/fortnight"),
            Err(QueryError::Unit(_))
        ));
    }

    #[test]
    fn queries_are_idempotent() {
        let pr = provider();
        let fs = sheet();
        let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
        let rep = Report::new(&fs, &sol, &pr).unwrap();
        let a = rep.tvp("oil", 20.0, "C", "bara").unwrap();
        let b = rep.tvp("oil", 20.0, "C", "bara").unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn summary_serializes() {
        let pr = provider();
        let fs = sheet();
        let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
        let rep = Report::new(&fs, &sol, &pr).unwrap();
        let summary = rep.summary().unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"converged\":true"));
        assert!(json.contains("feed"));
    }
}
