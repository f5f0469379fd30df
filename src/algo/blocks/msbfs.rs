use super::{BlockState, GrowthParams};
use crate::algo::rounds::{run_rounds, Convergence, Direction, RoundProgram};
use crate::graph::{ArcGraph, ArcLabels, Label, UNSET};
use crate::utils::{count_labels, top_k_by_degree};
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicU32, Ordering};
use sux::bits::AtomicBitVec;

/// Level of an arc whose source has not been reached by any BFS.
const UNREACHED: u32 = u32::MAX;

/// Statistics of a sampling round of [`sampled_bfs`].
#[derive(Debug, Clone, PartialEq)]
pub struct BfsRound {
    /// The seeds of the round, by decreasing indegree; each one labels the
    /// block it started.
    pub seeds: Vec<usize>,
    /// Nodes claimed in the round, seeds included.
    pub claimed: usize,
    pub unclaimed_before: usize,
    pub unclaimed_after: usize,
    /// How the level-synchronous expansion ended; running out of budget
    /// means that the level cap was reached.
    pub levels: Convergence,
}

/// Level-synchronous expansion of the blocks whose seeds are active.
///
/// A node claimed at level `l` writes `l` in the level of each of its
/// outgoing arcs and the id of its block in its slot. An unclaimed node
/// joins the block of the incoming arc with minimum level, among those
/// whose source belongs to an active block; ties are broken by choosing the
/// smallest block id.
struct Expansion<'a> {
    state: &'a BlockState,
    labels: ArcLabels,
    levels: Box<[AtomicU32]>,
    /// The seeds of the current round.
    active: AtomicBitVec,
}

impl Expansion<'_> {
    fn stamp_out_arcs(&self, graph: &ArcGraph, node: usize, level: u32, block: usize) {
        for arc in graph.out_arcs(node) {
            let dst = graph.target(arc);
            if dst != node {
                self.levels[arc].store(level, Ordering::Relaxed);
                self.labels.get(arc).set_mine(node, dst, block);
            }
        }
    }
}

impl RoundProgram for Expansion<'_> {
    type Update = (u32, usize);

    fn name(&self) -> &'static str {
        "sampled BFS"
    }

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn gather(&self, graph: &ArcGraph, node: usize) -> Option<(u32, usize)> {
        if self.state.label(node) != Label::Unclaimed {
            return None;
        }
        let mut best: Option<(u32, usize)> = None;
        for &arc in graph.in_arcs(node) {
            let src = graph.source(arc);
            if src == node {
                continue;
            }
            let level = self.levels[arc].load(Ordering::Relaxed);
            if level == UNREACHED {
                continue;
            }
            let block = self.labels.get(arc).neighbor(node, src);
            if block == UNSET || !self.active.get(block, Ordering::Relaxed) {
                continue;
            }
            if best.map_or(true, |best| (level, block) < best) {
                best = Some((level, block));
            }
        }
        best.map(|(level, block)| (level + 1, block))
    }

    fn apply(&self, graph: &ArcGraph, node: usize, (level, block): (u32, usize)) {
        self.state.claim(node, block);
        self.stamp_out_arcs(graph, node, level, block);
    }
}

/// Grows blocks by rounds of multi-source BFS.
///
/// At each round the `num_roots` unclaimed nodes with largest indegree
/// (ties broken by node id) become seeds: each one starts a block with its
/// own id as label, and the blocks are expanded for at most `max_level`
/// levels. Rounds go on while the fraction of unclaimed nodes is at least
/// `stop_ratio`.
pub fn sampled_bfs(
    graph: &ArcGraph,
    state: &BlockState,
    params: GrowthParams,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<Vec<BfsRound>> {
    if params.num_roots == 0 {
        return Err(Error::degenerate("sampled BFS", "the number of seeds per round is zero"));
    }
    if !(params.stop_ratio > 0.0 && params.stop_ratio <= 1.0) {
        return Err(Error::degenerate(
            "sampled BFS",
            format!("the stop ratio {} is not in (0..1]", params.stop_ratio),
        ));
    }

    let num_nodes = graph.num_nodes();
    let num_members = state.num_members();
    let expansion = Expansion {
        state,
        labels: ArcLabels::new(graph.num_arcs()),
        levels: (0..graph.num_arcs())
            .map(|_| AtomicU32::new(UNREACHED))
            .collect(),
        active: AtomicBitVec::new(num_nodes),
    };
    let max_level = params.max_level;

    pl.item_name("node");
    pl.expected_updates(Some(num_members));
    pl.start(format!(
        "Growing blocks from {} seeds per round, at most {} levels deep...",
        params.num_roots, max_level
    ));

    let mut rounds = Vec::new();
    let mut unclaimed = state.unclaimed(thread_pool);
    while !unclaimed.is_empty()
        && (unclaimed.len() as f64 / num_members as f64) >= params.stop_ratio
    {
        let unclaimed_before = unclaimed.len();
        let seeds = top_k_by_degree(unclaimed, |node| graph.indegree(node), params.num_roots);
        for &seed in &seeds {
            expansion.active.set(seed, true, Ordering::Relaxed);
            expansion.apply(graph, seed, (0, seed));
        }
        pl.update_with_count(seeds.len());

        let frontier = seeds
            .iter()
            .flat_map(|&seed| graph.successors(seed).iter().copied())
            .collect();
        let levels = run_rounds(graph, &expansion, frontier, max_level, thread_pool, pl);

        let round_blocks = thread_pool.install(|| {
            count_labels((0..num_nodes).into_par_iter().filter_map(|node| {
                state
                    .label(node)
                    .block()
                    .filter(|&block| expansion.active.get(block, Ordering::Relaxed))
            }))
        });
        for &seed in &seeds {
            expansion.active.set(seed, false, Ordering::Relaxed);
        }

        unclaimed = state.unclaimed(thread_pool);
        let round = BfsRound {
            seeds,
            claimed: unclaimed_before - unclaimed.len(),
            unclaimed_before,
            unclaimed_after: unclaimed.len(),
            levels,
        };
        pl.info(format_args!(
            "BFS round {}: {} seeds claimed {} nodes in {} levels; unclaimed {} -> {} ({:.2}%); largest blocks {:?}",
            rounds.len(),
            round.seeds.len(),
            round.claimed,
            round.levels.rounds(),
            round.unclaimed_before,
            round.unclaimed_after,
            100.0 * round.unclaimed_after as f64 / num_members as f64,
            &round_blocks[..round_blocks.len().min(5)]
        ));
        rounds.push(round);
    }

    pl.done();
    Ok(rounds)
}
