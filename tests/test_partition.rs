use anyhow::Result;
use dsi_progress_logger::prelude::*;
use webgraph_dagpart::algo::blocks::Blocks;
use webgraph_dagpart::algo::partition::{final_remap, greedy_partition, BlockAdjacency, Partition};
use webgraph_dagpart::graph::io::Interval;
use webgraph_dagpart::prelude::*;
use webgraph_dagpart::threads;
use webgraph_dagpart::Error;

/// Symmetric counts between `i` and `j`.
fn both_ways(i: usize, j: usize, count: usize) -> [(usize, usize, usize); 2] {
    [(i, j, count), (j, i, count)]
}

#[test]
fn test_adjacency_from_graph() -> Result<()> {
    let thread_pool = threads![];
    let graph = ArcGraph::from_arcs(0, [(0, 1), (1, 2), (2, 0), (2, 3), (3, 2), (3, 3)]);
    let blocks = Blocks::from_labels(
        vec![
            Label::Claimed(0),
            Label::Claimed(0),
            Label::Claimed(2),
            Label::Claimed(2),
        ],
        &thread_pool,
    );
    let adjacency = BlockAdjacency::build(&graph, &blocks, &thread_pool, no_logging![])?;

    assert_eq!(adjacency.size(), 2);
    // Block 0 has label 0, block 1 has label 2.
    assert_eq!(adjacency.get(0, 1), 1);
    assert_eq!(adjacency.get(1, 0), 1);
    assert_eq!(adjacency.get(0, 0), 0);
    assert_eq!(adjacency.cut_edges(0), 2);
    assert_eq!(adjacency.neighbors(0).collect::<Vec<_>>(), vec![1]);
    Ok(())
}

#[test]
fn test_unclaimed_endpoint() {
    let thread_pool = threads![];
    let graph = ArcGraph::from_arcs(0, [(0, 1)]);
    let blocks = Blocks::from_labels(vec![Label::Claimed(0), Label::Unclaimed], &thread_pool);
    assert!(matches!(
        BlockAdjacency::build(&graph, &blocks, &thread_pool, no_logging![]),
        Err(Error::InvariantViolation { .. })
    ));
}

#[test]
fn test_affinity_wins() -> Result<()> {
    // Block 2 is tied to block 0, block 3 to block 1; 2 and 3 are weakly
    // tied.
    let adjacency = BlockAdjacency::from_counts(
        4,
        [both_ways(0, 2, 10), both_ways(1, 3, 10), both_ways(2, 3, 1)]
            .into_iter()
            .flatten(),
    );
    let partitions = greedy_partition(&adjacency, &[10, 10, 5, 5], 2, no_logging![])?;

    assert_eq!(
        partitions,
        vec![
            Partition {
                blocks: vec![0, 2],
                size: 15
            },
            Partition {
                blocks: vec![1, 3],
                size: 15
            }
        ]
    );
    Ok(())
}

#[test]
fn test_tied_seeds_avoid_neighbors() -> Result<()> {
    // Blocks 0 and 1 are tightly joined, as are 2 and 3: the two partitions
    // must start from 0 and 2.
    let adjacency = BlockAdjacency::from_counts(
        4,
        [both_ways(0, 1, 10), both_ways(2, 3, 10)]
            .into_iter()
            .flatten(),
    );
    let partitions = greedy_partition(&adjacency, &[5, 5, 5, 5], 2, no_logging![])?;

    assert_eq!(
        partitions,
        vec![
            Partition {
                blocks: vec![0, 1],
                size: 10
            },
            Partition {
                blocks: vec![2, 3],
                size: 10
            }
        ]
    );
    Ok(())
}

#[test]
fn test_seed_ties_only() -> Result<()> {
    // Block 1 is joined to block 0 but is strictly larger than block 2, so
    // it still starts the second partition.
    let adjacency = BlockAdjacency::from_counts(3, both_ways(0, 1, 10));
    let partitions = greedy_partition(&adjacency, &[8, 6, 5], 2, no_logging![])?;

    assert_eq!(partitions[0].blocks, vec![0]);
    assert_eq!(partitions[1].blocks, vec![1, 2]);
    Ok(())
}

#[test]
fn test_equal_blocks() -> Result<()> {
    for (num_blocks, num_partitions) in [(6, 3), (8, 4), (12, 3), (12, 6)] {
        let adjacency = BlockAdjacency::from_counts(
            num_blocks,
            (0..num_blocks).flat_map(|b| both_ways(b, (b + 1) % num_blocks, 7)),
        );
        let sizes = vec![4; num_blocks];
        let partitions = greedy_partition(&adjacency, &sizes, num_partitions, no_logging![])?;

        assert_eq!(partitions.len(), num_partitions);
        for partition in &partitions {
            assert_eq!(partition.size, 4 * num_blocks / num_partitions);
        }
        let mut merged = partitions
            .iter()
            .flat_map(|p| p.blocks.iter().copied())
            .collect::<Vec<_>>();
        merged.sort_unstable();
        assert_eq!(merged, (0..num_blocks).collect::<Vec<_>>());
    }
    Ok(())
}

#[test]
fn test_isolated_blocks() -> Result<()> {
    // No arcs: partitions absorb the largest blocks left.
    let adjacency = BlockAdjacency::from_counts(5, []);
    let partitions = greedy_partition(&adjacency, &[9, 5, 4, 3, 1], 2, no_logging![])?;

    assert_eq!(partitions[0].blocks, vec![0, 3]);
    assert_eq!(partitions[1].blocks, vec![1, 2, 4]);
    Ok(())
}

#[test]
fn test_degenerate_partitions() {
    let adjacency = BlockAdjacency::from_counts(2, both_ways(0, 1, 1));
    assert!(matches!(
        greedy_partition(&adjacency, &[2, 1], 0, no_logging![]),
        Err(Error::DegenerateConfig { .. })
    ));
    assert!(matches!(
        greedy_partition(&adjacency, &[2, 1], 3, no_logging![]),
        Err(Error::DegenerateConfig { .. })
    ));
}

#[test]
fn test_final_remap() -> Result<()> {
    let thread_pool = threads![];
    let blocks = Blocks::from_labels(
        vec![
            Label::Claimed(0),
            Label::Claimed(0),
            Label::Claimed(2),
            Label::Deleted,
            Label::Claimed(2),
            Label::Claimed(2),
        ],
        &thread_pool,
    );
    // Block 0 has label 2 (three nodes), block 1 has label 0 (two nodes).
    let partitions = vec![
        Partition {
            blocks: vec![1],
            size: 2,
        },
        Partition {
            blocks: vec![0],
            size: 3,
        },
    ];
    let remap = final_remap(&blocks, &partitions, 10..15, &thread_pool, no_logging![])?;

    assert_eq!(
        remap.intervals,
        vec![
            Interval { start: 10, end: 11 },
            Interval { start: 12, end: 14 }
        ]
    );
    let mut rows = remap.rows.clone();
    rows.sort_unstable();
    let (old, new): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    assert_eq!(old, vec![0, 1, 2, 4, 5]);
    let mut first = new[..2].to_vec();
    first.sort_unstable();
    assert_eq!(first, vec![10, 11]);
    let mut second = new[2..].to_vec();
    second.sort_unstable();
    assert_eq!(second, vec![12, 13, 14]);

    assert!(matches!(
        final_remap(&blocks, &partitions, 10..16, &thread_pool, no_logging![]),
        Err(Error::InvariantViolation { .. })
    ));
    Ok(())
}
