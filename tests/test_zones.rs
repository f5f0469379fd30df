use anyhow::Result;
use dsi_progress_logger::prelude::*;
use webgraph_dagpart::algo::fwbw::forward_backward;
use webgraph_dagpart::algo::zone_remap::{remap_zones, NO_ID};
use webgraph_dagpart::graph::io::{read_pairs, ArtifactWriter};
use webgraph_dagpart::prelude::*;
use webgraph_dagpart::threads;

/// Three nodes upstream of the cycle 0 → 1 → 2 → 3 → 0, three nodes
/// downstream, and two isolated nodes.
fn upstream_cycle_downstream() -> ArcGraph {
    ArcGraph::from_arcs(
        12,
        [
            (4, 5),
            (5, 6),
            (6, 0),
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (2, 7),
            (7, 8),
            (8, 9),
        ],
    )
}

#[test]
fn test_zone_sizes() -> Result<()> {
    let graph = upstream_cycle_downstream();
    let thread_pool = threads![];
    let reach = forward_backward(&graph, 0, 1000, &thread_pool, no_logging![])?;
    let zones = zones::classify(&graph, &reach, &thread_pool);

    assert_eq!(zones[4], Some(Zone::PreScc));
    assert_eq!(zones[2], Some(Zone::GiantScc));
    assert_eq!(zones[9], Some(Zone::PostScc));
    assert_eq!(zones[10], None);
    assert_eq!(zones[11], None);

    let sizes = zones::count(&zones, &thread_pool, no_logging![])?;
    assert_eq!(
        sizes,
        ZoneSizes {
            pre: 3,
            giant: 4,
            post: 3
        }
    );
    assert_eq!(sizes.total(), graph.num_non_isolated());
    assert_eq!(sizes.get(Zone::GiantScc), 4);
    assert_eq!(sizes.num_fringe_zones(), 2);
    Ok(())
}

#[test]
fn test_no_arcs() -> Result<()> {
    let graph = ArcGraph::from_arcs(5, []);
    let thread_pool = threads![];
    let reach = forward_backward(&graph, 0, 1000, &thread_pool, no_logging![])?;
    let zones = zones::classify(&graph, &reach, &thread_pool);
    assert!(matches!(
        zones::count(&zones, &thread_pool, no_logging![]),
        Err(webgraph_dagpart::Error::DegenerateConfig { .. })
    ));
    Ok(())
}

#[test]
fn test_zone_remap() -> Result<()> {
    let graph = upstream_cycle_downstream();
    let thread_pool = threads![];
    let reach = forward_backward(&graph, 0, 1000, &thread_pool, no_logging![])?;
    let zones = zones::classify(&graph, &reach, &thread_pool);
    let sizes = zones::count(&zones, &thread_pool, no_logging![])?;
    let ranges = ZoneRanges::from(sizes);
    let labels = ArcLabels::new(graph.num_arcs());

    let remap = remap_zones(&graph, &zones, &ranges, &labels, &thread_pool, no_logging![])?;

    for zone in Zone::ALL {
        let mut ids = (0..graph.num_nodes())
            .filter(|&node| zones[node] == Some(zone))
            .map(|node| remap.new_ids[node])
            .collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, ranges.get(zone).collect::<Vec<_>>(), "{:?}", zone);
    }
    assert_eq!(remap.new_ids[10], NO_ID);

    // Only the fringe zones produce vertex map rows.
    let mut old = remap
        .fringe_rows
        .iter()
        .map(|&(old, _)| old)
        .collect::<Vec<_>>();
    old.sort_unstable();
    assert_eq!(old, vec![4, 5, 6, 7, 8, 9]);

    // Both endpoints have stamped their new id on each arc.
    for (arc, (src, dst)) in graph.arcs().enumerate() {
        assert_eq!(labels.get(arc).mine(src, dst), remap.new_ids[src]);
        assert_eq!(labels.get(arc).neighbor(src, dst), remap.new_ids[dst]);
    }
    Ok(())
}

#[test]
fn test_contraction() -> Result<()> {
    let graph = upstream_cycle_downstream();
    let thread_pool = threads![];
    let reach = forward_backward(&graph, 0, 1000, &thread_pool, no_logging![])?;
    let zones = zones::classify(&graph, &reach, &thread_pool);

    let dir = tempfile::tempdir()?;
    let mut giant = ArtifactWriter::create(dir.path().join("g.bigscc"))?;
    let mut other = ArtifactWriter::create(dir.path().join("g.smallscc"))?;
    let contraction = zones::contract(&graph, &zones, &mut giant, &mut other, no_logging![])?;
    let giant = giant.finish()?;
    let other = other.finish()?;

    assert_eq!(contraction.giant_arcs, 4);
    assert_eq!(contraction.other_arcs, 6);
    assert_eq!(
        std::fs::read_to_string(&giant)?.lines().next(),
        Some("#src_vid\tdst_vid")
    );
    assert_eq!(read_pairs(&giant)?, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    assert_eq!(read_pairs(&other)?.len(), 6);
    Ok(())
}
