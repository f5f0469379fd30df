/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Zone-local renumbering.
//!
//! Every non-isolated node draws a new id from the counter of its zone, which
//! starts at the beginning of the zone's range, and writes it in its slot of
//! every incident arc. The ids drawn in a zone are exactly the zone's range.

use super::zones::{Zone, ZoneRanges};
use crate::graph::{ArcGraph, ArcLabels};
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicUsize, Ordering};

/// New id of nodes that have none.
pub const NO_ID: usize = usize::MAX;

/// Writes `id` in the slot owned by `node` on every arc incident on `node`.
pub fn stamp(graph: &ArcGraph, labels: &ArcLabels, node: usize, id: usize) {
    for arc in graph.incident_arcs(node) {
        labels
            .get(arc)
            .set_mine(node, graph.other_endpoint(arc, node), id);
    }
}

/// The result of [`remap_zones`].
#[derive(Debug)]
pub struct ZoneRemap {
    /// The new id of each node, or [`NO_ID`] for isolated nodes.
    pub new_ids: Box<[usize]>,
    /// The `(old id, new id)` rows of the nodes outside the giant component.
    ///
    /// Rows of the giant component are produced by the final renumbering.
    pub fringe_rows: Vec<(usize, usize)>,
}

/// Renumbers each zone within its range and stamps the new ids on `labels`.
pub fn remap_zones(
    graph: &ArcGraph,
    zones: &[Option<Zone>],
    ranges: &ZoneRanges,
    labels: &ArcLabels,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<ZoneRemap> {
    pl.item_name("node");
    pl.expected_updates(Some(graph.num_nodes()));
    pl.start("Renumbering the zones...");

    let counters = Zone::ALL.map(|zone| AtomicUsize::new(ranges.get(zone).start));

    let (new_ids, fringe_rows): (Vec<usize>, Vec<Option<(usize, usize)>>) =
        thread_pool.install(|| {
            zones
                .par_iter()
                .enumerate()
                .map(|(node, zone)| match zone {
                    None => (NO_ID, None),
                    Some(zone) => {
                        let id = counters[zone.index()].fetch_add(1, Ordering::Relaxed);
                        stamp(graph, labels, node, id);
                        let row = (*zone != Zone::GiantScc).then_some((node, id));
                        (id, row)
                    }
                })
                .unzip()
        });
    pl.update_with_count(graph.num_nodes());

    for zone in Zone::ALL {
        let end = counters[zone.index()].load(Ordering::Relaxed);
        let range = ranges.get(zone);
        if end != range.end {
            return Err(Error::invariant(
                "zone remap",
                format!(
                    "{:?} drew ids up to {} but its range is {}..{}",
                    zone, end, range.start, range.end
                ),
            ));
        }
    }

    pl.done();
    Ok(ZoneRemap {
        new_ids: new_ids.into_boxed_slice(),
        fringe_rows: fringe_rows.into_iter().flatten().collect(),
    })
}
