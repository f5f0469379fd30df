/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Decomposition of the giant component into blocks.
//!
//! Blocks are first grown by [sampled multi-source BFS](sampled_bfs) from
//! high-indegree seeds; the nodes left unclaimed are then grouped by
//! [weak connectivity](residual_components). A block is identified by its
//! label: the seed of a BFS block, or the smallest node of a residual
//! component.

use crate::graph::{ArcGraph, Label, NodeLabels};
use crate::utils::count_labels;
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

mod msbfs;
pub use msbfs::*;

mod residual;
pub use residual::*;

mod check;
pub use check::*;

use super::rounds::Convergence;

/// The claim state of the nodes during block growth.
pub struct BlockState {
    labels: NodeLabels,
    in_bfs: AtomicBitVec,
    num_members: usize,
}

impl BlockState {
    /// Creates a state in which the nodes satisfying `is_member` are
    /// unclaimed and all other nodes are deleted.
    pub fn new(
        num_nodes: usize,
        is_member: impl Fn(usize) -> bool + Sync,
        thread_pool: &ThreadPool,
    ) -> Self {
        let labels = NodeLabels::new(num_nodes, Label::Unclaimed);
        let num_members = thread_pool.install(|| {
            (0..num_nodes)
                .into_par_iter()
                .filter(|&node| !is_member(node))
                .for_each(|node| labels.set(node, Label::Deleted));
            (0..num_nodes)
                .into_par_iter()
                .filter(|&node| labels.get(node) == Label::Unclaimed)
                .count()
        });
        Self {
            labels,
            in_bfs: AtomicBitVec::new(num_nodes),
            num_members,
        }
    }

    #[inline(always)]
    pub fn label(&self, node: usize) -> Label {
        self.labels.get(node)
    }

    /// Returns whether `node` has been claimed by a block.
    #[inline(always)]
    pub fn in_bfs(&self, node: usize) -> bool {
        self.in_bfs.get(node, Ordering::Relaxed)
    }

    /// Assigns `node` to `block`.
    #[inline(always)]
    pub(crate) fn claim(&self, node: usize, block: usize) {
        self.labels.set(node, Label::Claimed(block));
        self.in_bfs.set(node, true, Ordering::Relaxed);
    }

    /// The number of nodes that are not deleted.
    pub fn num_members(&self) -> usize {
        self.num_members
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the unclaimed nodes, in increasing order.
    pub fn unclaimed(&self, thread_pool: &ThreadPool) -> Vec<usize> {
        thread_pool.install(|| {
            (0..self.num_nodes())
                .into_par_iter()
                .filter(|&node| self.label(node) == Label::Unclaimed)
                .collect()
        })
    }
}

/// A block and its number of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub label: usize,
    pub size: usize,
}

/// The final assignment of nodes to blocks.
///
/// Blocks are indexed by decreasing size; ties are broken by increasing
/// label.
#[derive(Debug, Clone)]
pub struct Blocks {
    labels: Box<[Label]>,
    list: Vec<Block>,
    index: HashMap<usize, usize>,
}

impl Blocks {
    pub fn from_labels(labels: Vec<Label>, thread_pool: &ThreadPool) -> Self {
        let list: Vec<Block> = thread_pool
            .install(|| count_labels(labels.par_iter().filter_map(|label| label.block())))
            .into_iter()
            .map(|(label, size)| Block { label, size })
            .collect();
        let index = list
            .iter()
            .enumerate()
            .map(|(i, block)| (block.label, i))
            .collect();
        Self {
            labels: labels.into_boxed_slice(),
            list,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn list(&self) -> &[Block] {
        &self.list
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.list.iter().map(|block| block.size).collect()
    }

    /// The label of each node.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the index of the block with label `label`.
    pub fn index_of(&self, label: usize) -> Result<usize> {
        self.index
            .get(&label)
            .copied()
            .ok_or_else(|| Error::invariant("blocks", format!("no block has label {}", label)))
    }

    /// Returns the index of the block of `node`, or an error if `node` is
    /// not claimed.
    pub fn block_of(&self, node: usize) -> Result<usize> {
        match self.labels[node] {
            Label::Claimed(label) => self.index_of(label),
            label => Err(Error::invariant(
                "blocks",
                format!("node {} is in no block ({:?})", node, label),
            )),
        }
    }
}

/// Parameters of block growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    /// Seeds sampled at each BFS round.
    pub num_roots: usize,
    /// Maximum depth of a BFS block.
    pub max_level: usize,
    /// BFS rounds stop when the fraction of unclaimed nodes is below this
    /// value.
    pub stop_ratio: f64,
    /// Round budget of the residual component computation.
    pub max_iterations: usize,
}

/// The outcome of [`grow_blocks`].
#[derive(Debug, Clone)]
pub struct BlockGrowth {
    pub blocks: Blocks,
    pub bfs_rounds: Vec<BfsRound>,
    /// How the residual component computation ended, if any node was left
    /// unclaimed by the BFS rounds.
    pub residual: Option<Convergence>,
}

/// Splits the nodes of `graph` satisfying `is_member` into blocks.
pub fn grow_blocks(
    graph: &ArcGraph,
    is_member: impl Fn(usize) -> bool + Sync,
    params: GrowthParams,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<BlockGrowth> {
    let state = BlockState::new(graph.num_nodes(), is_member, thread_pool);
    let bfs_rounds = sampled_bfs(graph, &state, params, thread_pool, pl)?;
    let residual = residual_components(graph, &state, params.max_iterations, thread_pool, pl);
    check_claims(&state, thread_pool)?;

    let blocks = Blocks::from_labels(state.labels.to_vec(), thread_pool);
    pl.info(format_args!(
        "{} blocks ({} from BFS rounds), largest {:?}",
        blocks.len(),
        bfs_rounds.iter().map(|round| round.seeds.len()).sum::<usize>(),
        blocks.list().iter().take(5).collect::<Vec<_>>()
    ));
    Ok(BlockGrowth {
        blocks,
        bfs_rounds,
        residual,
    })
}
