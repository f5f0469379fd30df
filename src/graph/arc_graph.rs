/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rayon::prelude::*;
use std::ops::Range;
use webgraph::traits::RandomAccessGraph;

/// A directed graph whose arcs are numbered, with an index of incoming arcs.
///
/// Arcs are numbered consecutively following the successor lists, so the
/// outgoing arcs of a node form a range of arc ids. The in-arc index lists,
/// for each node, the ids of the arcs pointing to it. Per-arc payloads (see
/// [`ArcLabels`](super::ArcLabels)) are indexed by arc id, so both endpoints
/// of an arc reach the same payload.
#[derive(Debug, Clone)]
pub struct ArcGraph {
    num_nodes: usize,
    /// `out_offsets[node]..out_offsets[node + 1]` are the outgoing arcs of `node`.
    out_offsets: Box<[usize]>,
    /// The target of each arc.
    targets: Box<[usize]>,
    /// The source of each arc.
    sources: Box<[usize]>,
    /// `in_offsets[node]..in_offsets[node + 1]` indexes `in_arcs`.
    in_offsets: Box<[usize]>,
    /// The incoming arcs of each node, grouped by target.
    in_arcs: Box<[usize]>,
}

impl ArcGraph {
    /// Builds an arc graph from a list of arcs.
    ///
    /// The number of nodes is the maximum between `num_nodes` and one plus the
    /// largest node appearing in `arcs`. Successors keep the order in which
    /// they appear in `arcs`; parallel arcs and loops are kept.
    pub fn from_arcs(num_nodes: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs: Vec<(usize, usize)> = arcs.into_iter().collect();
        let num_nodes = arcs
            .iter()
            .fold(num_nodes, |n, &(src, dst)| n.max(src + 1).max(dst + 1));

        let mut out_offsets = vec![0; num_nodes + 1];
        for &(src, _) in arcs.iter() {
            out_offsets[src + 1] += 1;
        }
        for node in 0..num_nodes {
            out_offsets[node + 1] += out_offsets[node];
        }

        let mut cursor = out_offsets[..num_nodes].to_vec();
        let mut targets = vec![0; arcs.len()];
        for &(src, dst) in arcs.iter() {
            targets[cursor[src]] = dst;
            cursor[src] += 1;
        }

        Self::from_out_index(num_nodes, out_offsets, targets)
    }

    /// Builds an arc graph with the same nodes and arcs of a
    /// [`RandomAccessGraph`].
    pub fn from_graph<G: RandomAccessGraph>(graph: &G) -> Self {
        let num_nodes = graph.num_nodes();
        let mut out_offsets = Vec::with_capacity(num_nodes + 1);
        let mut targets = Vec::new();
        out_offsets.push(0);
        for node in 0..num_nodes {
            targets.extend(graph.successors(node));
            out_offsets.push(targets.len());
        }
        Self::from_out_index(num_nodes, out_offsets, targets)
    }

    fn from_out_index(num_nodes: usize, out_offsets: Vec<usize>, targets: Vec<usize>) -> Self {
        let num_arcs = targets.len();
        let mut sources = vec![0; num_arcs];
        for node in 0..num_nodes {
            sources[out_offsets[node]..out_offsets[node + 1]].fill(node);
        }

        let mut in_offsets = vec![0; num_nodes + 1];
        for &dst in targets.iter() {
            in_offsets[dst + 1] += 1;
        }
        for node in 0..num_nodes {
            in_offsets[node + 1] += in_offsets[node];
        }
        let mut cursor = in_offsets[..num_nodes].to_vec();
        let mut in_arcs = vec![0; num_arcs];
        for (arc, &dst) in targets.iter().enumerate() {
            in_arcs[cursor[dst]] = arc;
            cursor[dst] += 1;
        }

        Self {
            num_nodes,
            out_offsets: out_offsets.into_boxed_slice(),
            targets: targets.into_boxed_slice(),
            sources: sources.into_boxed_slice(),
            in_offsets: in_offsets.into_boxed_slice(),
            in_arcs: in_arcs.into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline(always)]
    pub fn num_arcs(&self) -> usize {
        self.targets.len()
    }

    /// Returns the ids of the outgoing arcs of `node`.
    #[inline(always)]
    pub fn out_arcs(&self, node: usize) -> Range<usize> {
        self.out_offsets[node]..self.out_offsets[node + 1]
    }

    /// Returns the ids of the incoming arcs of `node`.
    #[inline(always)]
    pub fn in_arcs(&self, node: usize) -> &[usize] {
        &self.in_arcs[self.in_offsets[node]..self.in_offsets[node + 1]]
    }

    /// Returns the ids of all arcs incident on `node`, incoming arcs first.
    ///
    /// A loop appears twice.
    pub fn incident_arcs(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.in_arcs(node)
            .iter()
            .copied()
            .chain(self.out_arcs(node))
    }

    #[inline(always)]
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.targets[self.out_arcs(node)]
    }

    /// Returns the sources of the incoming arcs of `node`.
    pub fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.in_arcs(node).iter().map(|&arc| self.sources[arc])
    }

    #[inline(always)]
    pub fn source(&self, arc: usize) -> usize {
        self.sources[arc]
    }

    #[inline(always)]
    pub fn target(&self, arc: usize) -> usize {
        self.targets[arc]
    }

    /// Returns the endpoint of `arc` that is not `node`.
    #[inline(always)]
    pub fn other_endpoint(&self, arc: usize, node: usize) -> usize {
        let src = self.sources[arc];
        if src == node {
            self.targets[arc]
        } else {
            src
        }
    }

    #[inline(always)]
    pub fn is_loop(&self, arc: usize) -> bool {
        self.sources[arc] == self.targets[arc]
    }

    #[inline(always)]
    pub fn outdegree(&self, node: usize) -> usize {
        self.out_offsets[node + 1] - self.out_offsets[node]
    }

    #[inline(always)]
    pub fn indegree(&self, node: usize) -> usize {
        self.in_offsets[node + 1] - self.in_offsets[node]
    }

    #[inline(always)]
    pub fn degree(&self, node: usize) -> usize {
        self.indegree(node) + self.outdegree(node)
    }

    /// Returns whether `node` has neither incoming nor outgoing arcs.
    #[inline(always)]
    pub fn is_isolated(&self, node: usize) -> bool {
        self.degree(node) == 0
    }

    /// Returns the number of nodes with at least one incident arc.
    pub fn num_non_isolated(&self) -> usize {
        (0..self.num_nodes)
            .into_par_iter()
            .filter(|&node| !self.is_isolated(node))
            .count()
    }

    /// Returns an iterator on all arcs as `(source, target)` pairs, in arc-id
    /// order.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sources.iter().copied().zip(self.targets.iter().copied())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_in_arc_index() {
        let graph = ArcGraph::from_arcs(0, [(0, 1), (2, 1), (1, 2), (2, 2), (0, 2)]);
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_arcs(), 5);
        assert_eq!(graph.successors(0), &[1, 2]);
        assert_eq!(graph.successors(2), &[1, 2]);

        let preds = graph.predecessors(2).collect::<Vec<_>>();
        assert_eq!(preds, vec![0, 1, 2]);
        for node in 0..3 {
            for &arc in graph.in_arcs(node) {
                assert_eq!(graph.target(arc), node);
            }
            for arc in graph.out_arcs(node) {
                assert_eq!(graph.source(arc), node);
            }
        }
        assert_eq!(graph.indegree(2), 3);
        assert_eq!(graph.outdegree(2), 2);
        assert_eq!(graph.incident_arcs(2).count(), 5);
    }

    #[test]
    fn test_isolated_nodes() {
        let graph = ArcGraph::from_arcs(6, [(0, 1), (3, 3)]);
        assert_eq!(graph.num_nodes(), 6);
        assert!(graph.is_isolated(2));
        assert!(graph.is_isolated(5));
        assert!(!graph.is_isolated(3));
        assert_eq!(graph.num_non_isolated(), 3);
    }
}
