/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Preparation of large directed graphs for distributed processing.
//!
//! The crate locates the strongly connected component containing a pivot
//! node, splits the remaining nodes into the two DAG zones that precede and
//! follow it, decomposes the giant component into locality-preserving blocks
//! and merges the blocks into balanced partitions. The result is a global
//! renumbering of the nodes (`.vmap`) and an interval table
//! (`.dag.interval`) in which every zone and partition owns a contiguous
//! range of identifiers.

pub mod algo;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod utils;

pub use error::{Error, Result};

/// Module exposing all traits in a single level.
pub mod traits {
    use super::*;
    pub use algo::traits::*;
}

/// Use `use webgraph_dagpart::prelude::*;` to import common utilities, modules
/// and all traits.
pub mod prelude {
    use super::*;
    pub use algo::blocks;
    pub use algo::fwbw;
    pub use algo::partition;
    pub use algo::rounds::{run_rounds, Convergence};
    pub use algo::zone_remap;
    pub use algo::zones::{self, Zone, ZoneRanges, ZoneSizes};
    pub use graph::{ArcGraph, ArcLabels, BiLabel, Label};
    pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput};
    pub use traits::*;
    pub use utils::Threads;
}

/// Builds a [`rayon::ThreadPool`].
///
/// With no arguments the pool uses rayon's default number of threads;
/// otherwise, the argument is the number of threads.
#[macro_export]
macro_rules! threads {
    () => {
        $crate::utils::Threads::Default
            .build()
            .expect("Cannot build the default thread pool")
    };
    ($num_threads:expr) => {
        $crate::utils::Threads::NumThreads($num_threads)
            .build()
            .expect("Cannot build the thread pool")
    };
}
