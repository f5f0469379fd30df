/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Forward and backward reachability from a pivot by label propagation.
//!
//! The forward pass marks as *confirmed* the nodes reachable from the pivot:
//! a confirmed node writes the pivot id in its slot of each outgoing arc, and
//! an unconfirmed node becomes confirmed as soon as one of its incoming arcs
//! carries the pivot id in the slot of the other endpoint. The backward pass
//! does the same against the direction of arcs, restricted to confirmed
//! nodes, and marks as *reconfirmed* the nodes that reach the pivot.
//!
//! The two passes write disjoint slots (the source slot of an arc in the
//! forward pass, the target slot in the backward pass), so they share a
//! single set of [`ArcLabels`].
//!
//! Loops are ignored: a node never confirms itself through its own loop.

use super::rounds::{run_rounds, Convergence, Direction, RoundProgram};
use crate::graph::{ArcGraph, ArcLabels};
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::ThreadPool;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

/// The outcome of the forward and backward passes.
pub struct Reachability {
    pivot: usize,
    confirmed: AtomicBitVec,
    reconfirmed: AtomicBitVec,
    /// How the forward pass ended.
    pub forward: Convergence,
    /// How the backward pass ended.
    pub backward: Convergence,
}

impl Reachability {
    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// Returns whether `node` is reachable from the pivot.
    #[inline(always)]
    pub fn is_confirmed(&self, node: usize) -> bool {
        self.confirmed.get(node, Ordering::Relaxed)
    }

    /// Returns whether `node` is reachable from the pivot and reaches it.
    #[inline(always)]
    pub fn is_reconfirmed(&self, node: usize) -> bool {
        self.reconfirmed.get(node, Ordering::Relaxed)
    }

    /// Returns the pivot if `node` is confirmed.
    pub fn color(&self, node: usize) -> Option<usize> {
        self.is_confirmed(node).then_some(self.pivot)
    }
}

struct Forward<'a> {
    pivot: usize,
    labels: &'a ArcLabels,
    confirmed: &'a AtomicBitVec,
}

impl RoundProgram for Forward<'_> {
    type Update = ();

    fn name(&self) -> &'static str {
        "forward"
    }

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn gather(&self, graph: &ArcGraph, node: usize) -> Option<()> {
        if self.confirmed.get(node, Ordering::Relaxed) {
            return None;
        }
        graph
            .in_arcs(node)
            .iter()
            .any(|&arc| {
                let src = graph.source(arc);
                src != node && self.labels.get(arc).neighbor(node, src) == self.pivot
            })
            .then_some(())
    }

    fn apply(&self, graph: &ArcGraph, node: usize, _update: ()) {
        self.confirmed.set(node, true, Ordering::Relaxed);
        stamp_out_arcs(graph, self.labels, node, self.pivot);
    }
}

struct Backward<'a> {
    pivot: usize,
    labels: &'a ArcLabels,
    confirmed: &'a AtomicBitVec,
    reconfirmed: &'a AtomicBitVec,
}

impl RoundProgram for Backward<'_> {
    type Update = ();

    fn name(&self) -> &'static str {
        "backward"
    }

    fn direction(&self) -> Direction {
        Direction::Backward
    }

    fn gather(&self, graph: &ArcGraph, node: usize) -> Option<()> {
        if !self.confirmed.get(node, Ordering::Relaxed)
            || self.reconfirmed.get(node, Ordering::Relaxed)
        {
            return None;
        }
        graph
            .out_arcs(node)
            .any(|arc| {
                let dst = graph.target(arc);
                dst != node && self.labels.get(arc).neighbor(node, dst) == self.pivot
            })
            .then_some(())
    }

    fn apply(&self, graph: &ArcGraph, node: usize, _update: ()) {
        self.reconfirmed.set(node, true, Ordering::Relaxed);
        stamp_in_arcs(graph, self.labels, node, self.pivot);
    }
}

fn stamp_out_arcs(graph: &ArcGraph, labels: &ArcLabels, node: usize, value: usize) {
    for arc in graph.out_arcs(node) {
        let dst = graph.target(arc);
        if dst != node {
            labels.get(arc).set_mine(node, dst, value);
        }
    }
}

fn stamp_in_arcs(graph: &ArcGraph, labels: &ArcLabels, node: usize, value: usize) {
    for &arc in graph.in_arcs(node) {
        let src = graph.source(arc);
        if src != node {
            labels.get(arc).set_mine(node, src, value);
        }
    }
}

fn log_convergence(name: &str, convergence: Convergence, pl: &mut impl ProgressLog) {
    match convergence {
        Convergence::Fixpoint { rounds } => {
            pl.info(format_args!("{} pass: fixpoint after {} rounds", name, rounds))
        }
        Convergence::BudgetExhausted { rounds } => pl.warn(format_args!(
            "{} pass: iteration budget exhausted after {} rounds; reachability may be partial",
            name, rounds
        )),
    }
}

/// Runs the forward pass and then the backward pass from `pivot`.
///
/// Each pass runs for at most `max_iterations` rounds; exhausting the budget
/// is logged as a warning and leaves a partial (but consistent) result.
pub fn forward_backward(
    graph: &ArcGraph,
    pivot: usize,
    max_iterations: usize,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<Reachability> {
    let num_nodes = graph.num_nodes();
    if pivot >= num_nodes {
        return Err(Error::degenerate(
            "scc",
            format!("pivot {} is not a node of a graph with {} nodes", pivot, num_nodes),
        ));
    }

    let labels = ArcLabels::new(graph.num_arcs());
    let confirmed = AtomicBitVec::new(num_nodes);
    let reconfirmed = AtomicBitVec::new(num_nodes);

    let forward = Forward {
        pivot,
        labels: &labels,
        confirmed: &confirmed,
    };
    pl.item_name("node");
    pl.expected_updates(None);
    pl.start(format!("Forward pass from pivot {}...", pivot));
    forward.apply(graph, pivot, ());
    let frontier = graph
        .successors(pivot)
        .iter()
        .copied()
        .filter(|&succ| succ != pivot)
        .collect();
    let forward_convergence =
        run_rounds(graph, &forward, frontier, max_iterations, thread_pool, pl);
    pl.done();
    log_convergence(forward.name(), forward_convergence, pl);

    let backward = Backward {
        pivot,
        labels: &labels,
        confirmed: &confirmed,
        reconfirmed: &reconfirmed,
    };
    pl.start(format!("Backward pass to pivot {}...", pivot));
    backward.apply(graph, pivot, ());
    let frontier = graph.predecessors(pivot).filter(|&pred| pred != pivot).collect();
    let backward_convergence =
        run_rounds(graph, &backward, frontier, max_iterations, thread_pool, pl);
    pl.done();
    log_convergence(backward.name(), backward_convergence, pl);

    Ok(Reachability {
        pivot,
        confirmed,
        reconfirmed,
        forward: forward_convergence,
        backward: backward_convergence,
    })
}
