use super::BlockState;
use crate::algo::rounds::{run_rounds, Convergence, Direction, RoundProgram};
use crate::graph::{ArcGraph, ArcLabels, Label};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use sux::bits::AtomicBitVec;

/// Minimum-label flooding along the arcs between unclaimed nodes, in both
/// directions.
struct MinLabel<'a> {
    state: &'a BlockState,
    component: Box<[AtomicUsize]>,
    /// Whether an arc joins two distinct unclaimed nodes.
    propagate: AtomicBitVec,
    labels: ArcLabels,
}

impl MinLabel<'_> {
    fn stamp(&self, graph: &ArcGraph, node: usize, component: usize) {
        for arc in graph.incident_arcs(node) {
            if self.propagate.get(arc, Ordering::Relaxed) {
                self.labels
                    .get(arc)
                    .set_mine(node, graph.other_endpoint(arc, node), component);
            }
        }
    }
}

impl RoundProgram for MinLabel<'_> {
    type Update = usize;

    fn name(&self) -> &'static str {
        "residual components"
    }

    fn direction(&self) -> Direction {
        Direction::Both
    }

    fn gather(&self, graph: &ArcGraph, node: usize) -> Option<usize> {
        if self.state.label(node) != Label::Unclaimed {
            return None;
        }
        let min = graph
            .incident_arcs(node)
            .filter(|&arc| self.propagate.get(arc, Ordering::Relaxed))
            .map(|arc| {
                self.labels
                    .get(arc)
                    .neighbor(node, graph.other_endpoint(arc, node))
            })
            .min()?;
        (min < self.component[node].load(Ordering::Relaxed)).then_some(min)
    }

    fn apply(&self, graph: &ArcGraph, node: usize, component: usize) {
        self.component[node].store(component, Ordering::Relaxed);
        self.stamp(graph, node, component);
    }
}

/// Assigns the nodes left unclaimed by [`sampled_bfs`](super::sampled_bfs)
/// to the weakly connected components they induce.
///
/// Each component becomes a block whose label is its smallest node. If the
/// round budget is exhausted some components may be split into several
/// blocks; the blocks are still disjoint.
///
/// Returns [`None`] if no node was unclaimed.
pub fn residual_components(
    graph: &ArcGraph,
    state: &BlockState,
    max_iterations: usize,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Option<Convergence> {
    let unclaimed = state.unclaimed(thread_pool);
    if unclaimed.is_empty() {
        return None;
    }

    let program = MinLabel {
        state,
        component: (0..graph.num_nodes()).map(AtomicUsize::new).collect(),
        propagate: AtomicBitVec::new(graph.num_arcs()),
        labels: ArcLabels::new(graph.num_arcs()),
    };

    pl.item_name("node");
    pl.expected_updates(None);
    pl.start(format!(
        "Computing the components of {} unclaimed nodes...",
        unclaimed.len()
    ));

    thread_pool.install(|| {
        (0..graph.num_arcs()).into_par_iter().for_each(|arc| {
            if !graph.is_loop(arc)
                && state.label(graph.source(arc)) == Label::Unclaimed
                && state.label(graph.target(arc)) == Label::Unclaimed
            {
                program.propagate.set(arc, true, Ordering::Relaxed);
            }
        });
        unclaimed
            .par_iter()
            .for_each(|&node| program.stamp(graph, node, node));
    });

    let convergence = run_rounds(
        graph,
        &program,
        unclaimed.clone(),
        max_iterations,
        thread_pool,
        pl,
    );
    pl.done();

    thread_pool.install(|| {
        unclaimed.par_iter().for_each(|&node| {
            state.claim(node, program.component[node].load(Ordering::Relaxed))
        })
    });

    match convergence {
        Convergence::Fixpoint { rounds } => pl.info(format_args!(
            "Residual components: fixpoint after {} rounds",
            rounds
        )),
        Convergence::BudgetExhausted { rounds } => pl.warn(format_args!(
            "Residual components: iteration budget exhausted after {} rounds; some components may be split",
            rounds
        )),
    }
    Some(convergence)
}
