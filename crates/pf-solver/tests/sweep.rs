//! End-to-end solver behavior on small flowsheets.

use std::time::Duration;

use pf_graph::{FlowsheetBuilder, TearGuess};
use pf_ops::{Cooler, Mixer, Recycle, Separator, Source, UnitKind, Valve};
use pf_solver::{solve, solve_with_deadline, CancelToken, SolveError, SolveOptions};
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

fn feed_kind() -> UnitKind {
    UnitKind::Source(
        Source::new(
            Composition::new(vec![0.6, 0.4]).unwrap(),
            30.0e5,
            320.0,
            100.0,
        )
        .unwrap(),
    )
}

/// source -> valve -> separator, no recycle.
fn acyclic_sheet() -> pf_graph::Flowsheet {
    let mut b = FlowsheetBuilder::new();
    let feed = b.add_stream("feed");
    let flashed = b.add_stream("flashed");
    let gas = b.add_stream("gas");
    let liq = b.add_stream("liquid");
    b.add_unit("well", feed_kind(), &[], &[feed]).unwrap();
    b.add_unit(
        "choke",
        UnitKind::Valve(Valve::new(10.0e5).unwrap()),
        &[feed],
        &[flashed],
    )
    .unwrap();
    b.add_unit(
        "hp sep",
        UnitKind::Separator(Separator),
        &[flashed],
        &[gas, liq],
    )
    .unwrap();
    b.build().unwrap()
}

/// source -> mixer(feed, tear) -> separator. The separator liquid leaves as
/// product; the gas is chilled and scrubbed, and only the scrubber
/// condensate recycles to the mixer, so the loop has a finite fixed point.
fn recycle_sheet(damping: f64) -> pf_graph::Flowsheet {
    let mut b = FlowsheetBuilder::new();
    let feed = b.add_stream("feed");
    let tear = b.add_tear_stream(
        "tear",
        TearGuess {
            composition: Composition::new(vec![0.5, 0.5]).unwrap(),
            pressure: 30.0e5,
            temperature: 250.0,
            molar_flow: 0.0,
        },
    );
    let mixed = b.add_stream("mixed");
    let gas = b.add_stream("gas");
    let liq = b.add_stream("liquid");
    let cold_gas = b.add_stream("chilled gas");
    let dry_gas = b.add_stream("dry gas");
    let condensate = b.add_stream("condensate");
    b.add_unit("well", feed_kind(), &[], &[feed]).unwrap();
    b.add_unit(
        "mix",
        UnitKind::Mixer(Mixer::default()),
        &[feed, tear],
        &[mixed],
    )
    .unwrap();
    b.add_unit(
        "sep",
        UnitKind::Separator(Separator),
        &[mixed],
        &[gas, liq],
    )
    .unwrap();
    b.add_unit(
        "gas chiller",
        UnitKind::Cooler(Cooler::to_temperature(250.0)),
        &[gas],
        &[cold_gas],
    )
    .unwrap();
    b.add_unit(
        "scrubber",
        UnitKind::Separator(Separator),
        &[cold_gas],
        &[dry_gas, condensate],
    )
    .unwrap();
    b.add_unit(
        "loop",
        UnitKind::Recycle(Recycle::new(damping).unwrap()),
        &[condensate],
        &[tear],
    )
    .unwrap();
    b.build().unwrap()
}

#[test]
fn acyclic_sheet_converges_in_one_sweep() {
    let pr = provider();
    let fs = acyclic_sheet();
    let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
    assert!(sol.report().converged);
    assert_eq!(sol.report().iterations, 1);
}

#[test]
fn mass_is_conserved_across_the_separator() {
    let pr = provider();
    let fs = acyclic_sheet();
    let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
    let feed = sol.stream_state(fs.stream_by_name("feed").unwrap().id).unwrap();
    let gas = sol.stream_state(fs.stream_by_name("gas").unwrap().id).unwrap();
    let liq = sol
        .stream_state(fs.stream_by_name("liquid").unwrap().id)
        .unwrap();
    let ff = feed.component_flows();
    let fg = gas.component_flows();
    let fl = liq.component_flows();
    for i in 0..2 {
        assert!((fg[i] + fl[i] - ff[i]).abs() < 1.0e-6, "component {i}");
    }
}

#[test]
fn recycle_sheet_converges_to_a_fixed_point() {
    let pr = provider();
    let fs = recycle_sheet(1.0);
    let sol = solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()).unwrap();
    assert!(sol.report().converged, "report: {:?}", sol.report());
    assert!(sol.report().iterations > 1);

    let feed = sol.stream_state(fs.stream_by_name("feed").unwrap().id).unwrap();
    let tear = sol.stream_state(fs.stream_by_name("tear").unwrap().id).unwrap();
    let mixed = sol
        .stream_state(fs.stream_by_name("mixed").unwrap().id)
        .unwrap();
    let liq = sol
        .stream_state(fs.stream_by_name("liquid").unwrap().id)
        .unwrap();
    let dry = sol
        .stream_state(fs.stream_by_name("dry gas").unwrap().id)
        .unwrap();

    // The loop carries material at the fixed point.
    assert!(tear.molar_flow > 0.0);
    // Mixer balance closes against the live tear.
    assert!(
        (feed.molar_flow + tear.molar_flow - mixed.molar_flow).abs()
            < 1.0e-3 * mixed.molar_flow,
        "mixer: {} + {} vs {}",
        feed.molar_flow,
        tear.molar_flow,
        mixed.molar_flow
    );
    // With the recycle closed, everything that enters leaves as product.
    let out_flow = dry.molar_flow + liq.molar_flow;
    assert!(
        (feed.molar_flow - out_flow).abs() < 1.0e-3 * feed.molar_flow,
        "in {} vs out {out_flow}",
        feed.molar_flow
    );
}

#[test]
fn solve_is_deterministic() {
    let pr = provider();
    let fs = recycle_sheet(0.8);
    let opts = SolveOptions::default();
    let a = solve(&fs, &pr, &opts, &CancelToken::new()).unwrap();
    let b = solve(&fs, &pr, &opts, &CancelToken::new()).unwrap();
    assert_eq!(a.report(), b.report());
    for s in fs.streams() {
        let sa = a.stream_state(s.id).unwrap();
        let sb = b.stream_state(s.id).unwrap();
        assert_eq!(sa.molar_flow.to_bits(), sb.molar_flow.to_bits());
        assert_eq!(sa.temperature.to_bits(), sb.temperature.to_bits());
        for (xa, xb) in sa
            .composition
            .fractions()
            .iter()
            .zip(sb.composition.fractions())
        {
            assert_eq!(xa.to_bits(), xb.to_bits());
        }
    }
}

#[test]
fn zero_tolerance_hits_the_iteration_cap() {
    let pr = provider();
    let fs = recycle_sheet(0.5);
    let opts = SolveOptions {
        max_iterations: 7,
        tolerance: 0.0,
    };
    let sol = solve(&fs, &pr, &opts, &CancelToken::new()).unwrap();
    assert!(!sol.report().converged);
    assert_eq!(sol.report().iterations, 7);
}

#[test]
fn cancelled_token_aborts_the_solve() {
    let pr = provider();
    let fs = recycle_sheet(0.5);
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = solve(&fs, &pr, &SolveOptions::default(), &cancel).unwrap_err();
    assert_eq!(err, SolveError::Cancelled);
}

#[test]
fn deadline_timeout_discards_partial_state() {
    let pr = provider();
    let fs = recycle_sheet(0.5);
    // Zero tolerance keeps the loop busy until the deadline fires.
    let opts = SolveOptions {
        max_iterations: usize::MAX,
        tolerance: 0.0,
    };
    let err = solve_with_deadline(&fs, &pr, &opts, Duration::from_millis(10)).unwrap_err();
    assert_eq!(err, SolveError::Timeout);
}

#[test]
fn failing_unit_is_named() {
    let pr = provider();
    let mut b = FlowsheetBuilder::new();
    let feed = b.add_stream("feed");
    let out = b.add_stream("out");
    b.add_unit("well", feed_kind(), &[], &[feed]).unwrap();
    // Valve at a higher pressure than the feed fails at solve time.
    b.add_unit(
        "bad valve",
        UnitKind::Valve(Valve::new(100.0e5).unwrap()),
        &[feed],
        &[out],
    )
    .unwrap();
    let fs = b.build().unwrap();
    match solve(&fs, &pr, &SolveOptions::default(), &CancelToken::new()) {
        Err(SolveError::UnitFailed { unit, .. }) => assert_eq!(unit, "bad valve"),
        other => panic!("expected unit failure, got {other:?}"),
    }
}
