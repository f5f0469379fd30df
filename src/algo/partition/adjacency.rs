use crate::algo::blocks::Blocks;
use crate::graph::ArcGraph;
use crate::Result;
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The number of arcs between each ordered pair of distinct blocks.
#[derive(Debug)]
pub struct BlockAdjacency {
    size: usize,
    cells: Box<[AtomicUsize]>,
    cut_edges: Box<[usize]>,
}

impl BlockAdjacency {
    /// Builds a matrix from explicit `(source block, target block, count)`
    /// entries; entries on the diagonal are ignored.
    pub fn from_counts(
        size: usize,
        counts: impl IntoIterator<Item = (usize, usize, usize)>,
    ) -> Self {
        let cells: Box<[AtomicUsize]> = (0..size * size).map(|_| AtomicUsize::new(0)).collect();
        for (i, j, count) in counts {
            if i != j {
                cells[i * size + j].fetch_add(count, Ordering::Relaxed);
            }
        }
        Self::with_cells(size, cells)
    }

    fn with_cells(size: usize, cells: Box<[AtomicUsize]>) -> Self {
        let get = |i: usize, j: usize| cells[i * size + j].load(Ordering::Relaxed);
        let cut_edges = (0..size)
            .map(|b| (0..size).map(|k| get(b, k) + get(k, b)).sum())
            .collect();
        Self {
            size,
            cells,
            cut_edges,
        }
    }

    /// Counts the arcs of `graph` crossing blocks.
    ///
    /// Every arc must join two claimed nodes.
    pub fn build(
        graph: &ArcGraph,
        blocks: &Blocks,
        thread_pool: &ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Result<Self> {
        let size = blocks.len();
        pl.item_name("arc");
        pl.expected_updates(Some(graph.num_arcs()));
        pl.start(format!("Counting arcs between {} blocks...", size));

        let cells: Box<[AtomicUsize]> = (0..size * size).map(|_| AtomicUsize::new(0)).collect();
        thread_pool.install(|| {
            (0..graph.num_arcs()).into_par_iter().try_for_each(|arc| {
                let i = blocks.block_of(graph.source(arc))?;
                let j = blocks.block_of(graph.target(arc))?;
                if i != j {
                    cells[i * size + j].fetch_add(1, Ordering::Relaxed);
                }
                Ok(())
            })
        })?;
        pl.update_with_count(graph.num_arcs());
        pl.done();

        let adjacency = Self::with_cells(size, cells);
        pl.info(format_args!(
            "{} arcs cross blocks",
            adjacency.cut_edges.iter().sum::<usize>() / 2
        ));
        Ok(adjacency)
    }

    /// The number of blocks.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of arcs from block `i` to block `j`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.size + j].load(Ordering::Relaxed)
    }

    /// The number of arcs between `i` and `j`, in either direction.
    #[inline(always)]
    pub fn affinity(&self, i: usize, j: usize) -> usize {
        self.get(i, j) + self.get(j, i)
    }

    /// The number of arcs with exactly one endpoint in block `b`.
    #[inline(always)]
    pub fn cut_edges(&self, b: usize) -> usize {
        self.cut_edges[b]
    }

    /// The blocks joined to `b` by at least one arc.
    pub fn neighbors(&self, b: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&k| k != b && self.affinity(b, k) > 0)
    }
}
