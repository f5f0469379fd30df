use super::Partition;
use crate::algo::blocks::Blocks;
use crate::graph::io::Interval;
use crate::{Error, Result};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The result of [`final_remap`].
#[derive(Debug, Clone)]
pub struct FinalRemap {
    /// The `(old id, new id)` rows of the nodes in a block.
    pub rows: Vec<(usize, usize)>,
    /// The interval of each partition, in partition order.
    pub intervals: Vec<Interval>,
}

/// Assigns the ids in `range` to the nodes of `blocks`.
///
/// Partitions receive consecutive sub-ranges in order; within a partition,
/// blocks receive consecutive sub-ranges in merge order, and the nodes of a
/// block draw their ids from a counter starting at the beginning of the
/// block's sub-range.
pub fn final_remap(
    blocks: &Blocks,
    partitions: &[Partition],
    range: Range<usize>,
    thread_pool: &ThreadPool,
    pl: &mut impl ProgressLog,
) -> Result<FinalRemap> {
    let sizes = blocks.sizes();
    let mut bases = vec![usize::MAX; blocks.len()];
    let mut intervals = Vec::with_capacity(partitions.len());
    let mut cursor = range.start;
    for partition in partitions {
        let start = cursor;
        for &b in &partition.blocks {
            if b >= bases.len() {
                return Err(Error::invariant(
                    "final remap",
                    format!("block index {} out of range (0..{})", b, bases.len()),
                ));
            }
            bases[b] = cursor;
            cursor += sizes[b];
        }
        if let Some(interval) = Interval::with_len(start, cursor - start) {
            intervals.push(interval);
        }
    }
    if cursor != range.end {
        return Err(Error::invariant(
            "final remap",
            format!(
                "partitions cover {}..{} instead of {}..{}",
                range.start, cursor, range.start, range.end
            ),
        ));
    }
    if let Some(b) = bases.iter().position(|&base| base == usize::MAX) {
        return Err(Error::invariant(
            "final remap",
            format!("block {} (label {}) is in no partition", b, blocks.list()[b].label),
        ));
    }

    pl.item_name("node");
    pl.expected_updates(Some(range.len()));
    pl.start("Renumbering the giant component...");

    let counters: Vec<AtomicUsize> = bases.iter().map(|&base| AtomicUsize::new(base)).collect();
    let rows = thread_pool.install(|| {
        blocks
            .labels()
            .par_iter()
            .enumerate()
            .filter(|(_, label)| label.is_claimed())
            .map(|(node, _)| {
                let b = blocks.block_of(node)?;
                Ok((node, counters[b].fetch_add(1, Ordering::Relaxed)))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    pl.update_with_count(rows.len());

    for (b, counter) in counters.iter().enumerate() {
        let end = counter.load(Ordering::Relaxed);
        if end != bases[b] + sizes[b] {
            return Err(Error::invariant(
                "final remap",
                format!(
                    "block {} drew {} ids instead of {}",
                    b,
                    end - bases[b],
                    sizes[b]
                ),
            ));
        }
    }

    pl.done();
    Ok(FinalRemap { rows, intervals })
}
