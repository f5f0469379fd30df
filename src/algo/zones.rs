/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Classification of nodes into the zones preceding, containing and
//! following the giant component.

use super::fwbw::Reachability;
use crate::graph::io::ArtifactWriter;
use crate::graph::ArcGraph;
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The position of a node with respect to the giant component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Not reachable from the pivot.
    PreScc,
    /// Reachable from the pivot and reaching it.
    GiantScc,
    /// Reachable from the pivot but not reaching it.
    PostScc,
}

impl Zone {
    /// The zones, in the order of their id ranges.
    pub const ALL: [Zone; 3] = [Zone::PreScc, Zone::GiantScc, Zone::PostScc];

    pub fn classify(confirmed: bool, reconfirmed: bool) -> Self {
        match (confirmed, reconfirmed) {
            (false, _) => Zone::PreScc,
            (true, true) => Zone::GiantScc,
            (true, false) => Zone::PostScc,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Zone::PreScc => 0,
            Zone::GiantScc => 1,
            Zone::PostScc => 2,
        }
    }
}

/// The zone of each node, or [`None`] for isolated nodes.
pub type Zones = Box<[Option<Zone>]>;

/// Returns the zone of each node.
pub fn classify(graph: &ArcGraph, reach: &Reachability, thread_pool: &ThreadPool) -> Zones {
    thread_pool.install(|| {
        (0..graph.num_nodes())
            .into_par_iter()
            .map(|node| {
                (!graph.is_isolated(node)).then(|| {
                    Zone::classify(reach.is_confirmed(node), reach.is_reconfirmed(node))
                })
            })
            .collect::<Vec<_>>()
            .into_boxed_slice()
    })
}

/// The number of nodes in each zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneSizes {
    pub pre: usize,
    pub giant: usize,
    pub post: usize,
}

impl ZoneSizes {
    pub fn get(&self, zone: Zone) -> usize {
        match zone {
            Zone::PreScc => self.pre,
            Zone::GiantScc => self.giant,
            Zone::PostScc => self.post,
        }
    }

    pub fn total(&self) -> usize {
        self.pre + self.giant + self.post
    }

    /// Returns the number of zones other than the giant one that contain at
    /// least a node.
    pub fn num_fringe_zones(&self) -> usize {
        (self.pre > 0) as usize + (self.post > 0) as usize
    }
}

/// Counts the nodes in each zone.
///
/// Every chunk of nodes is counted locally and then added to three shared
/// counters. Returns an error if all nodes are isolated.
pub fn count(
    zones: &[Option<Zone>],
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<ZoneSizes> {
    let counters = [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)];

    thread_pool.install(|| {
        zones.par_chunks(1 << 16).for_each(|chunk| {
            let mut local = [0; 3];
            for zone in chunk.iter().flatten() {
                local[zone.index()] += 1;
            }
            for (counter, count) in counters.iter().zip(local) {
                counter.fetch_add(count, Ordering::Relaxed);
            }
        })
    });

    let [pre, giant, post] = counters.map(AtomicUsize::into_inner);
    let sizes = ZoneSizes { pre, giant, post };
    let total = sizes.total();
    if total == 0 {
        return Err(Error::degenerate("zones", "the graph has no arcs"));
    }
    if giant == 0 {
        return Err(Error::degenerate(
            "zones",
            "the giant component is empty (the pivot is isolated)",
        ));
    }
    pl.info(format_args!(
        "Zone sizes: pre {} ({:.2}%), giant {} ({:.2}%), post {} ({:.2}%)",
        pre,
        100.0 * pre as f64 / total as f64,
        giant,
        100.0 * giant as f64 / total as f64,
        post,
        100.0 * post as f64 / total as f64,
    ));
    if pre == 0 {
        pl.warn(format_args!("No node precedes the giant component"));
    }
    if post == 0 {
        pl.warn(format_args!("No node follows the giant component"));
    }
    Ok(sizes)
}

/// The global id ranges of the zones, laid out consecutively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRanges {
    pub pre: Range<usize>,
    pub giant: Range<usize>,
    pub post: Range<usize>,
}

impl ZoneRanges {
    pub fn get(&self, zone: Zone) -> Range<usize> {
        match zone {
            Zone::PreScc => self.pre.clone(),
            Zone::GiantScc => self.giant.clone(),
            Zone::PostScc => self.post.clone(),
        }
    }
}

impl From<ZoneSizes> for ZoneRanges {
    fn from(sizes: ZoneSizes) -> Self {
        let giant_start = sizes.pre;
        let post_start = giant_start + sizes.giant;
        Self {
            pre: 0..giant_start,
            giant: giant_start..post_start,
            post: post_start..post_start + sizes.post,
        }
    }
}

/// Arc counts of a [`contract`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contraction {
    /// Arcs with both endpoints in the giant component.
    pub giant_arcs: usize,
    /// All other arcs.
    pub other_arcs: usize,
}

/// Splits the arcs of `graph` between the giant component and the rest.
///
/// Arcs with both endpoints in the giant component (loops included) go to
/// `giant`, after a `#src_vid\tdst_vid` header; all other arcs go to `other`.
pub fn contract(
    graph: &ArcGraph,
    zones: &[Option<Zone>],
    giant: &mut ArtifactWriter,
    other: &mut ArtifactWriter,
    pl: &mut impl ProgressLog,
) -> Result<Contraction> {
    pl.item_name("arc");
    pl.expected_updates(Some(graph.num_arcs()));
    pl.start("Writing the arcs of the giant component...");

    let mut contraction = Contraction::default();
    giant.write_line(format_args!("#src_vid\tdst_vid"))?;
    for (src, dst) in graph.arcs() {
        if zones[src] == Some(Zone::GiantScc) && zones[dst] == Some(Zone::GiantScc) {
            giant.write_pair(src, dst)?;
            contraction.giant_arcs += 1;
        } else {
            other.write_pair(src, dst)?;
            contraction.other_arcs += 1;
        }
        pl.light_update();
    }

    pl.done();
    pl.info(format_args!(
        "{} arcs in the giant component, {} outside",
        contraction.giant_arcs, contraction.other_arcs
    ));
    Ok(contraction)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Zone::classify(false, false), Zone::PreScc);
        assert_eq!(Zone::classify(true, true), Zone::GiantScc);
        assert_eq!(Zone::classify(true, false), Zone::PostScc);
    }

    #[test]
    fn test_ranges() {
        let ranges = ZoneRanges::from(ZoneSizes {
            pre: 3,
            giant: 4,
            post: 0,
        });
        assert_eq!(ranges.pre, 0..3);
        assert_eq!(ranges.giant, 3..7);
        assert!(ranges.post.is_empty());
        assert_eq!(ranges.post.start, 7);
    }
}
