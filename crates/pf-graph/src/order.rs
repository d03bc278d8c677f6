//! Evaluation order of the tear-reduced unit graph.

use std::collections::BTreeSet;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};
use pf_core::UnitId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Stream, Unit};

/// Kahn topological sort over producer→consumer edges, skipping tear
/// streams. Ties are broken by unit declaration index so the order (and
/// therefore the whole solve) is deterministic.
pub(crate) fn evaluation_order(units: &[Unit], streams: &[Stream]) -> GraphResult<Vec<UnitId>> {
    let mut g: DiGraph<(), ()> = DiGraph::with_capacity(units.len(), streams.len());
    let idx: Vec<NodeIndex> = units.iter().map(|_| g.add_node(())).collect();
    for u in units {
        for &sid in &u.inlets {
            let s = &streams[sid.index() as usize];
            if s.is_tear {
                continue;
            }
            if let Some(p) = s.producer {
                g.add_edge(idx[p.index() as usize], idx[u.id.index() as usize], ());
            }
        }
    }

    let mut indeg: Vec<usize> = idx
        .iter()
        .map(|&n| g.neighbors_directed(n, Incoming).count())
        .collect();
    let mut ready: BTreeSet<usize> = indeg
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(units.len());
    let mut placed = vec![false; units.len()];
    while let Some(&i) = ready.iter().next() {
        ready.remove(&i);
        placed[i] = true;
        order.push(units[i].id);
        for nb in g.neighbors_directed(idx[i], Outgoing) {
            let j = nb.index();
            indeg[j] -= 1;
            if indeg[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() < units.len() {
        let members = units
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed[*i])
            .map(|(_, u)| u.name.clone())
            .collect();
        return Err(GraphError::CyclicAfterTearRemoval { units: members });
    }
    Ok(order)
}
