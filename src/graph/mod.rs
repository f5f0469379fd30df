/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The in-memory substrate the propagation phases run on: a graph with
//! numbered arcs and an in-arc index, and the per-arc payloads written by
//! the endpoints.

mod arc_graph;
pub use arc_graph::*;

mod labels;
pub use labels::*;

pub mod io;
