/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The whole decomposition, phase after phase.

use crate::algo::blocks::{grow_blocks, BfsRound, Block, GrowthParams};
use crate::algo::fwbw::forward_backward;
use crate::algo::partition::{final_remap, greedy_partition, BlockAdjacency, Partition};
use crate::algo::rounds::Convergence;
use crate::algo::zone_remap::{self, remap_zones};
use crate::algo::zones::{self, Contraction, Zone, ZoneRanges, ZoneSizes};
use crate::graph::io::{self, Artifacts, Interval, VertexMap};
use crate::graph::{ArcGraph, ArcLabels};
use crate::utils::{max_degree_product_node, Threads};
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};

/// The parameters of a [`Pipeline`].
///
/// ```
/// # use webgraph_dagpart::prelude::*;
/// let config = PipelineConfig::new("/tmp/graph")
///     .with_pivot(Some(0))
///     .with_num_partitions(3)
///     .with_stop_ratio(0.05);
/// assert_eq!(config.num_roots, 1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Artifacts are written to `basename` plus an extension.
    pub basename: PathBuf,
    /// The node whose component is extracted; by default, the node
    /// maximizing the product of indegree and outdegree.
    pub pivot: Option<usize>,
    /// Round budget of each label-propagation pass.
    pub max_iterations: usize,
    /// Total number of partitions, including the nonempty zones preceding
    /// and following the giant component.
    pub num_partitions: usize,
    /// BFS seeds sampled per round.
    pub num_roots: usize,
    /// Maximum depth of a BFS block.
    pub max_level: usize,
    /// BFS rounds stop when the fraction of unclaimed nodes of the giant
    /// component drops below this value.
    pub stop_ratio: f64,
    /// Whether to write the arcs renumbered with the final ids.
    pub emit_remapped_arcs: bool,
    pub threads: Threads,
}

impl PipelineConfig {
    pub fn new(basename: impl Into<PathBuf>) -> Self {
        Self {
            basename: basename.into(),
            pivot: None,
            max_iterations: 1000,
            num_partitions: 5,
            num_roots: 1000,
            max_level: 10,
            stop_ratio: 0.1,
            emit_remapped_arcs: false,
            threads: Threads::Default,
        }
    }

    pub fn with_pivot(mut self, pivot: Option<usize>) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_num_partitions(mut self, num_partitions: usize) -> Self {
        self.num_partitions = num_partitions;
        self
    }

    pub fn with_num_roots(mut self, num_roots: usize) -> Self {
        self.num_roots = num_roots;
        self
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_stop_ratio(mut self, stop_ratio: f64) -> Self {
        self.stop_ratio = stop_ratio;
        self
    }

    pub fn with_remapped_arcs(mut self, emit_remapped_arcs: bool) -> Self {
        self.emit_remapped_arcs = emit_remapped_arcs;
        self
    }

    pub fn with_threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    /// Checks the parameters and builds the thread pool.
    pub fn build(self) -> Result<Pipeline> {
        if self.num_partitions == 0 {
            return Err(Error::degenerate("config", "the number of partitions is zero"));
        }
        if self.num_roots == 0 {
            return Err(Error::degenerate("config", "the number of seeds per round is zero"));
        }
        if !(self.stop_ratio > 0.0 && self.stop_ratio <= 1.0) {
            return Err(Error::degenerate(
                "config",
                format!("the stop ratio {} is not in (0..1]", self.stop_ratio),
            ));
        }
        let thread_pool = self.threads.build().map_err(|e| {
            Error::degenerate("config", format!("cannot build the thread pool: {}", e))
        })?;
        Ok(Pipeline {
            config: self,
            thread_pool,
        })
    }
}

/// A summary of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub pivot: usize,
    pub zone_sizes: ZoneSizes,
    pub forward: Convergence,
    pub backward: Convergence,
    pub contraction: Contraction,
    pub bfs_rounds: Vec<BfsRound>,
    pub residual: Option<Convergence>,
    /// Blocks by decreasing size.
    pub blocks: Vec<Block>,
    /// Partitions of the giant component, in id order.
    pub partitions: Vec<Partition>,
    /// The intervals written to the interval table.
    pub intervals: Vec<Interval>,
    /// The vertex map, sorted by old id.
    pub vertex_map: VertexMap,
}

/// The state of a decomposition run.
pub struct Pipeline {
    config: PipelineConfig,
    thread_pool: ThreadPool,
}

impl Pipeline {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn basename(&self) -> &Path {
        &self.config.basename
    }

    /// Runs all phases on `graph`, writing the artifacts next to the
    /// basename.
    pub fn run(&self, graph: &ArcGraph, pl: &mut impl ProgressLog) -> Result<PipelineOutput> {
        let config = &self.config;
        let thread_pool = &self.thread_pool;

        let Artifacts {
            mut bigscc,
            mut smallscc,
            mut vmap,
            mut interval,
            remapped_arcs,
        } = Artifacts::create(&config.basename, config.emit_remapped_arcs)?;

        let pivot = match config.pivot {
            Some(pivot) => pivot,
            None => max_degree_product_node(graph)
                .ok_or_else(|| Error::degenerate("scc", "the graph has no nodes"))?,
        };
        if pivot < graph.num_nodes() {
            pl.info(format_args!(
                "Pivot {}: indegree {}, outdegree {}",
                pivot,
                graph.indegree(pivot),
                graph.outdegree(pivot)
            ));
        }

        let reach = forward_backward(graph, pivot, config.max_iterations, thread_pool, pl)?;
        let zones = zones::classify(graph, &reach, thread_pool);
        let zone_sizes = zones::count(&zones, thread_pool, pl)?;
        let ranges = ZoneRanges::from(zone_sizes);

        let num_giant_partitions = config
            .num_partitions
            .checked_sub(zone_sizes.num_fringe_zones())
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                Error::degenerate(
                    "partition",
                    format!(
                        "{} partitions leave none for the giant component ({} fringe zones)",
                        config.num_partitions,
                        zone_sizes.num_fringe_zones()
                    ),
                )
            })?;

        let contraction = zones::contract(graph, &zones, &mut bigscc, &mut smallscc, pl)?;
        let bigscc_path = bigscc.finish()?;
        smallscc.finish()?;

        let arc_labels = ArcLabels::new(graph.num_arcs());
        let fringe = remap_zones(graph, &zones, &ranges, &arc_labels, thread_pool, pl)?;
        let mut vertex_map = VertexMap::new();
        vertex_map.extend(fringe.fringe_rows);

        let giant_graph = ArcGraph::from_arcs(graph.num_nodes(), io::read_pairs(&bigscc_path)?);
        if giant_graph.num_arcs() != contraction.giant_arcs {
            return Err(Error::invariant(
                "contraction",
                format!(
                    "{} contains {} arcs instead of {}",
                    bigscc_path.display(),
                    giant_graph.num_arcs(),
                    contraction.giant_arcs
                ),
            ));
        }

        let growth = grow_blocks(
            &giant_graph,
            |node| zones[node] == Some(Zone::GiantScc),
            GrowthParams {
                num_roots: config.num_roots,
                max_level: config.max_level,
                stop_ratio: config.stop_ratio,
                max_iterations: config.max_iterations,
            },
            thread_pool,
            pl,
        )?;

        let adjacency = BlockAdjacency::build(&giant_graph, &growth.blocks, thread_pool, pl)?;
        let partitions = greedy_partition(
            &adjacency,
            &growth.blocks.sizes(),
            num_giant_partitions,
            pl,
        )?;
        let giant_remap = final_remap(
            &growth.blocks,
            &partitions,
            ranges.giant.clone(),
            thread_pool,
            pl,
        )?;

        let mut intervals = Vec::with_capacity(partitions.len() + 2);
        intervals.extend(Interval::with_len(ranges.pre.start, ranges.pre.len()));
        intervals.extend(giant_remap.intervals.iter().copied());
        intervals.extend(Interval::with_len(ranges.post.start, ranges.post.len()));
        io::check_tiling(&intervals, zone_sizes.total())?;

        if let Some(mut writer) = remapped_arcs {
            thread_pool.install(|| {
                giant_remap
                    .rows
                    .par_iter()
                    .for_each(|&(node, id)| zone_remap::stamp(graph, &arc_labels, node, id))
            });
            writer.write_line(format_args!("# new_src\tnew_dst"))?;
            for (arc, (src, dst)) in graph.arcs().enumerate() {
                let label = arc_labels.get(arc);
                writer.write_pair(label.mine(src, dst), label.neighbor(src, dst))?;
            }
            writer.finish()?;
        }

        vertex_map.extend(giant_remap.rows);
        if vertex_map.len() != zone_sizes.total() {
            return Err(Error::invariant(
                "final remap",
                format!(
                    "the vertex map has {} rows for {} nodes",
                    vertex_map.len(),
                    zone_sizes.total()
                ),
            ));
        }
        vertex_map.write(&mut vmap)?;
        vmap.finish()?;
        io::write_intervals(&mut interval, &intervals)?;
        interval.finish()?;

        pl.info(format_args!(
            "Wrote {} intervals and {} vertex map rows",
            intervals.len(),
            vertex_map.len()
        ));

        Ok(PipelineOutput {
            pivot,
            zone_sizes,
            forward: reach.forward,
            backward: reach.backward,
            contraction,
            bfs_rounds: growth.bfs_rounds,
            residual: growth.residual,
            blocks: growth.blocks.list().to_vec(),
            partitions,
            intervals,
            vertex_map,
        })
    }
}
