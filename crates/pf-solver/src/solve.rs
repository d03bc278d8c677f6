//! Sequential-modular sweep solver with tear-stream iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use pf_core::{StreamId, UnitId};
use pf_graph::Flowsheet;
use pf_ops::{StreamState, UnitKind};
use pf_thermo::PropertyProvider;
use tracing::{debug, info, warn};

use crate::error::{SolveError, SolveResult};

/// Tuning knobs for the sweep loop.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Sweep cap for tear iteration.
    pub max_iterations: usize,
    /// Every tear delta must fall strictly below this to converge.
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1.0e-6,
        }
    }
}

/// Cooperative cancellation flag, checked between sweeps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Convergence summary of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub converged: bool,
    /// Sweeps performed.
    pub iterations: usize,
    /// Largest tear delta seen in the final sweep (0 for acyclic sheets).
    pub worst_delta: f64,
}

/// Converged (or capped-out) stream states and unit metrics, indexed by the
/// flowsheet's ids.
#[derive(Debug, Clone)]
pub struct Solution {
    streams: Vec<Option<StreamState>>,
    power: Vec<Option<f64>>,
    duty: Vec<Option<f64>>,
    report: SolveReport,
}

impl Solution {
    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    pub fn stream_state(&self, id: StreamId) -> Option<&StreamState> {
        self.streams[id.index() as usize].as_ref()
    }

    /// Shaft power [W] for pumps and compressors.
    pub fn power(&self, id: UnitId) -> Option<f64> {
        self.power[id.index() as usize]
    }

    /// Heat duty [W] for heaters and coolers.
    pub fn duty(&self, id: UnitId) -> Option<f64> {
        self.duty[id.index() as usize]
    }
}

/// Run the sweep loop until every tear delta is below tolerance or the
/// iteration cap is hit.
///
/// An acyclic flowsheet has no tears and converges in exactly one sweep.
/// Unit failures abort immediately with the unit's name; exhausting the cap
/// returns a solution flagged `converged: false`.
pub fn solve(
    flowsheet: &Flowsheet,
    provider: &dyn PropertyProvider,
    options: &SolveOptions,
    cancel: &CancelToken,
) -> SolveResult<Solution> {
    let n_streams = flowsheet.streams().len();
    let n_units = flowsheet.units().len();
    let mut streams: Vec<Option<StreamState>> = vec![None; n_streams];
    let mut power: Vec<Option<f64>> = vec![None; n_units];
    let mut duty: Vec<Option<f64>> = vec![None; n_units];

    // Seed tear streams from their caller-provided guesses.
    for &tid in flowsheet.tears() {
        let stream = flowsheet.stream(tid);
        let guess = stream.guess.as_ref().ok_or_else(|| SolveError::TearSeed {
            stream: stream.name.clone(),
            source: pf_ops::OpError::InvalidSpec {
                what: "tear stream without guess",
            },
        })?;
        let state = StreamState::flashed(
            provider,
            guess.composition.clone(),
            guess.pressure,
            guess.temperature,
            guess.molar_flow,
        )
        .map_err(|source| SolveError::TearSeed {
            stream: stream.name.clone(),
            source,
        })?;
        streams[tid.index() as usize] = Some(state);
    }

    let mut worst_delta = 0.0_f64;
    for iteration in 1..=options.max_iterations {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }

        worst_delta = 0.0;
        for &uid in flowsheet.evaluation_order() {
            let unit = flowsheet.unit(uid);
            let mut inlets: Vec<&StreamState> = Vec::with_capacity(unit.inlets.len());
            for &sid in &unit.inlets {
                // Ordering guarantees every non-tear inlet was produced
                // earlier in this sweep; tears were seeded above.
                match streams[sid.index() as usize].as_ref() {
                    Some(s) => inlets.push(s),
                    None => {
                        return Err(SolveError::UnitFailed {
                            unit: unit.name.clone(),
                            source: pf_ops::OpError::UnflashedInlet,
                        })
                    }
                }
            }
            let tear = if matches!(unit.kind, UnitKind::Recycle(_)) {
                streams[unit.outlets[0].index() as usize].as_ref()
            } else {
                None
            };

            let solved =
                unit.kind
                    .solve(provider, &inlets, tear)
                    .map_err(|source| SolveError::UnitFailed {
                        unit: unit.name.clone(),
                        source,
                    })?;

            for (&sid, state) in unit.outlets.iter().zip(solved.outlets.into_iter()) {
                streams[sid.index() as usize] = Some(state);
            }
            power[uid.index() as usize] = solved.power;
            duty[uid.index() as usize] = solved.duty;
            if let Some(d) = solved.delta {
                worst_delta = worst_delta.max(d);
            }
        }

        let converged = flowsheet.tears().is_empty() || worst_delta < options.tolerance;
        debug!(iteration, worst_delta, converged, "sweep done");
        if converged {
            info!(iterations = iteration, "flowsheet converged");
            return Ok(Solution {
                streams,
                power,
                duty,
                report: SolveReport {
                    converged: true,
                    iterations: iteration,
                    worst_delta,
                },
            });
        }
    }

    warn!(
        iterations = options.max_iterations,
        worst_delta, "iteration cap reached without convergence"
    );
    Ok(Solution {
        streams,
        power,
        duty,
        report: SolveReport {
            converged: false,
            iterations: options.max_iterations,
            worst_delta,
        },
    })
}

/// Run `solve` on a worker thread and give up at the deadline.
///
/// On timeout the worker is cancelled and its partial state is discarded;
/// the caller sees only `SolveError::Timeout`.
pub fn solve_with_deadline(
    flowsheet: &Flowsheet,
    provider: &dyn PropertyProvider,
    options: &SolveOptions,
    deadline: Duration,
) -> SolveResult<Solution> {
    let cancel = CancelToken::new();
    std::thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        let worker_cancel = cancel.clone();
        scope.spawn(move || {
            let _ = tx.send(solve(flowsheet, provider, options, &worker_cancel));
        });
        match rx.recv_timeout(deadline) {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                warn!(?deadline, "solve deadline exceeded");
                Err(SolveError::Timeout)
            }
        }
    })
}
