/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Merging of blocks into partitions and final renumbering of the giant
//! component.

mod adjacency;
pub use adjacency::*;

mod greedy;
pub use greedy::*;

mod remap;
pub use remap::*;
