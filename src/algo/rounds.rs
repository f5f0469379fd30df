/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Synchronous label-propagation rounds over an active frontier.
//!
//! A round has two phases. In the gather phase every node of the frontier
//! reads the arc payloads around it, in parallel, and decides whether it
//! changes. In the apply phase every changed node writes its new state and
//! the slots it owns on its arcs. Since no payload is written during the
//! gather phase, every node sees the state of the previous round.
//!
//! The next frontier contains the neighbors of the changed nodes in the
//! direction of propagation. The run stops at the first round that changes
//! nothing, or when the round budget is exhausted.

use crate::graph::ArcGraph;
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

/// The neighbors that must be reconsidered after a node changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Successors: the change travels along arcs.
    Forward,
    /// Predecessors: the change travels against arcs.
    Backward,
    /// Successors and predecessors.
    Both,
}

/// The per-node logic of a label-propagation pass.
pub trait RoundProgram: Sync {
    /// What [`gather`](RoundProgram::gather) hands to
    /// [`apply`](RoundProgram::apply).
    type Update: Send;

    /// A name for the pass, used in logs.
    fn name(&self) -> &'static str;

    /// Where to schedule the neighbors of a changed node.
    fn direction(&self) -> Direction;

    /// Inspects `node` and its arcs; returns the new state of the node if it
    /// changes in this round.
    ///
    /// Implementations must not write any shared state.
    fn gather(&self, graph: &ArcGraph, node: usize) -> Option<Self::Update>;

    /// Writes the new state of `node` and the slots it owns.
    fn apply(&self, graph: &ArcGraph, node: usize, update: Self::Update);
}

/// How a run of [`run_rounds`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// A round changed nothing (or the frontier became empty).
    Fixpoint { rounds: usize },
    /// The round budget was exhausted while the frontier was not empty.
    BudgetExhausted { rounds: usize },
}

impl Convergence {
    /// The number of rounds that changed at least one node.
    pub fn rounds(&self) -> usize {
        match *self {
            Convergence::Fixpoint { rounds } | Convergence::BudgetExhausted { rounds } => rounds,
        }
    }

    pub fn is_fixpoint(&self) -> bool {
        matches!(self, Convergence::Fixpoint { .. })
    }
}

/// Runs `program` starting from `frontier` for at most `max_rounds` rounds.
///
/// The caller is responsible for starting and stopping `pl`; every round
/// updates it with the number of changed nodes.
pub fn run_rounds<P: RoundProgram>(
    graph: &ArcGraph,
    program: &P,
    frontier: Vec<usize>,
    max_rounds: usize,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Convergence {
    let scheduled = AtomicBitVec::new(graph.num_nodes());
    let direction = program.direction();
    let mut frontier = frontier;
    thread_pool.install(|| frontier.par_sort_unstable());
    frontier.dedup();
    let mut rounds = 0;

    while !frontier.is_empty() {
        if rounds == max_rounds {
            return Convergence::BudgetExhausted { rounds };
        }

        let changed: Vec<(usize, P::Update)> = thread_pool.install(|| {
            frontier
                .par_iter()
                .filter_map(|&node| program.gather(graph, node).map(|update| (node, update)))
                .collect()
        });

        if changed.is_empty() {
            break;
        }
        rounds += 1;
        pl.update_with_count(changed.len());

        frontier = thread_pool.install(|| {
            changed
                .into_par_iter()
                .flat_map_iter(|(node, update)| {
                    program.apply(graph, node, update);
                    let mut next = Vec::new();
                    let mut schedule = |succ: usize| {
                        if !scheduled.swap(succ, true, Ordering::Relaxed) {
                            next.push(succ);
                        }
                    };
                    if direction != Direction::Backward {
                        graph.successors(node).iter().for_each(|&succ| schedule(succ));
                    }
                    if direction != Direction::Forward {
                        graph.predecessors(node).for_each(&mut schedule);
                    }
                    next
                })
                .collect()
        });

        thread_pool.install(|| {
            frontier
                .par_iter()
                .for_each(|&node| scheduled.set(node, false, Ordering::Relaxed))
        });
    }

    Convergence::Fixpoint { rounds }
}
