use super::BlockAdjacency;
use crate::utils::math::{argmin, filtered_argmax};
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use std::collections::BTreeSet;

/// A group of blocks that will receive a contiguous range of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Block indices, in merge order.
    pub blocks: Vec<usize>,
    /// The number of nodes in the blocks.
    pub size: usize,
}

struct Greedy<'a> {
    adjacency: &'a BlockAdjacency,
    block_sizes: &'a [usize],
    merged: Vec<bool>,
    partitions: Vec<Partition>,
    /// `affinity[p][b]` is the number of arcs between partition `p` and
    /// block `b`, in either direction.
    affinity: Vec<Vec<usize>>,
    /// Blocks adjacent to each partition; may contain blocks merged
    /// elsewhere, which are skipped.
    frontier: Vec<BTreeSet<usize>>,
}

impl Greedy<'_> {
    fn merge(&mut self, p: usize, b: usize) {
        self.merged[b] = true;
        self.partitions[p].blocks.push(b);
        self.partitions[p].size += self.block_sizes[b];
        self.frontier[p].remove(&b);
        for k in self.adjacency.neighbors(b) {
            self.affinity[p][k] += self.adjacency.affinity(b, k);
            if !self.merged[k] {
                self.frontier[p].insert(k);
            }
        }
    }

    /// Returns the block of the frontier of `p` maximizing the ratio
    /// between its arcs toward `p` and its cut edges, if any.
    fn highest_block(&mut self, p: usize) -> Option<usize> {
        let merged = &self.merged;
        self.frontier[p].retain(|&b| !merged[b]);

        let mut best: Option<(usize, f64)> = None;
        for &b in &self.frontier[p] {
            let score = self.affinity[p][b] as f64 / self.adjacency.cut_edges(b) as f64;
            if best.map_or(true, |(_, max)| score > max) {
                best = Some((b, score));
            }
        }
        best.map(|(b, _)| b)
    }

    fn largest_block(&self) -> Option<usize> {
        filtered_argmax(self.block_sizes, |b, _| !self.merged[b])
    }
}

/// Chooses the blocks starting each partition.
///
/// Blocks are taken by decreasing size. Among blocks of the same size, the
/// first one with no arc toward the blocks already chosen is preferred; if
/// there is none, the first one is taken.
fn seed_blocks(
    adjacency: &BlockAdjacency,
    block_sizes: &[usize],
    num_partitions: usize,
) -> Vec<usize> {
    let mut seeds: Vec<usize> = Vec::with_capacity(num_partitions);
    let mut chosen = vec![false; block_sizes.len()];
    let mut next = 0;
    while seeds.len() < num_partitions {
        while chosen[next] {
            next += 1;
        }
        let size = block_sizes[next];
        let seed = (next..block_sizes.len())
            .take_while(|&b| block_sizes[b] == size)
            .find(|&b| !chosen[b] && seeds.iter().all(|&s| adjacency.affinity(s, b) == 0))
            .unwrap_or(next);
        chosen[seed] = true;
        seeds.push(seed);
    }
    seeds
}

/// Merges blocks into `num_partitions` partitions.
///
/// The blocks must be indexed by decreasing size. Each partition starts
/// from one of the largest blocks, chosen so that blocks of equal size
/// joined by arcs do not start different partitions. Then, repeatedly, the
/// least loaded partition (ties broken by index) absorbs the unmerged block
/// of its frontier with highest score, where the score of a block is the
/// number of its arcs toward the partition divided by the number of its cut
/// edges. A partition with an empty frontier absorbs the largest unmerged
/// block instead. Score ties are broken by choosing the smallest block index.
pub fn greedy_partition(
    adjacency: &BlockAdjacency,
    block_sizes: &[usize],
    num_partitions: usize,
    pl: &mut impl ProgressLog,
) -> Result<Vec<Partition>> {
    let num_blocks = block_sizes.len();
    if num_partitions == 0 {
        return Err(Error::degenerate(
            "partition",
            "no partition is left for the giant component",
        ));
    }
    if num_blocks < num_partitions {
        return Err(Error::degenerate(
            "partition",
            format!(
                "{} blocks cannot fill {} partitions",
                num_blocks, num_partitions
            ),
        ));
    }

    pl.item_name("block");
    pl.expected_updates(Some(num_blocks));
    pl.start(format!(
        "Merging {} blocks into {} partitions...",
        num_blocks, num_partitions
    ));

    let mut greedy = Greedy {
        adjacency,
        block_sizes,
        merged: vec![false; num_blocks],
        partitions: vec![
            Partition {
                blocks: Vec::new(),
                size: 0,
            };
            num_partitions
        ],
        affinity: vec![vec![0; num_blocks]; num_partitions],
        frontier: vec![BTreeSet::new(); num_partitions],
    };

    for (p, b) in seed_blocks(adjacency, block_sizes, num_partitions)
        .into_iter()
        .enumerate()
    {
        greedy.merge(p, b);
        pl.light_update();
    }

    for _ in num_partitions..num_blocks {
        let sizes: Vec<usize> = greedy.partitions.iter().map(|p| p.size).collect();
        let Some(p) = argmin(&sizes) else {
            break;
        };
        let b = match greedy.highest_block(p) {
            Some(b) => b,
            None => greedy.largest_block().ok_or_else(|| {
                Error::invariant("partition", "no unmerged block is left")
            })?,
        };
        greedy.merge(p, b);
        pl.light_update();
    }

    pl.done();
    for (p, partition) in greedy.partitions.iter().enumerate() {
        pl.info(format_args!(
            "Partition {}: {} nodes in {} blocks",
            p,
            partition.size,
            partition.blocks.len()
        ));
    }
    Ok(greedy.partitions)
}
