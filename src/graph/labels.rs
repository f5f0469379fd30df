/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::atomic::{AtomicUsize, Ordering};

/// Value of a [`BiLabel`] slot that has never been written.
pub const UNSET: usize = usize::MAX;

/// A two-slot arc payload.
///
/// Each endpoint of an arc owns one slot: the endpoint with the smaller id
/// owns `low`, the other one owns `high`. A node only writes the slot it
/// owns and reads the slot of the other endpoint, so both endpoints of an
/// arc can be updated in the same round without conflicts.
#[derive(Debug)]
pub struct BiLabel {
    low: AtomicUsize,
    high: AtomicUsize,
}

impl BiLabel {
    pub fn new(value: usize) -> Self {
        Self {
            low: AtomicUsize::new(value),
            high: AtomicUsize::new(value),
        }
    }

    #[inline(always)]
    fn slot(&self, owner: usize, other: usize) -> &AtomicUsize {
        if owner < other {
            &self.low
        } else {
            &self.high
        }
    }

    /// Returns the value of the slot owned by `me` on the arc between `me`
    /// and `other`.
    #[inline(always)]
    pub fn mine(&self, me: usize, other: usize) -> usize {
        self.slot(me, other).load(Ordering::Relaxed)
    }

    /// Writes the slot owned by `me` on the arc between `me` and `other`.
    #[inline(always)]
    pub fn set_mine(&self, me: usize, other: usize, value: usize) {
        self.slot(me, other).store(value, Ordering::Relaxed)
    }

    /// Returns the value of the slot owned by `other` on the arc between `me`
    /// and `other`.
    #[inline(always)]
    pub fn neighbor(&self, me: usize, other: usize) -> usize {
        self.slot(other, me).load(Ordering::Relaxed)
    }
}

/// A [`BiLabel`] for each arc of an [`ArcGraph`](super::ArcGraph), indexed by
/// arc id.
#[derive(Debug)]
pub struct ArcLabels {
    labels: Box<[BiLabel]>,
}

impl ArcLabels {
    /// Creates labels for `num_arcs` arcs with both slots set to [`UNSET`].
    pub fn new(num_arcs: usize) -> Self {
        Self {
            labels: (0..num_arcs).map(|_| BiLabel::new(UNSET)).collect(),
        }
    }

    #[inline(always)]
    pub fn get(&self, arc: usize) -> &BiLabel {
        &self.labels[arc]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The claim state of a node during block growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The node belongs to the graph being split but no block owns it yet.
    Unclaimed,
    /// The node belongs to the block with the given id.
    Claimed(usize),
    /// The node does not take part in block growth.
    Deleted,
}

impl Label {
    const DELETED: usize = usize::MAX;
    const UNCLAIMED: usize = usize::MAX - 1;

    /// Returns the block id, if the node is claimed.
    #[inline(always)]
    pub fn block(self) -> Option<usize> {
        match self {
            Label::Claimed(block) => Some(block),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn is_claimed(self) -> bool {
        matches!(self, Label::Claimed(_))
    }

    #[inline(always)]
    fn to_word(self) -> usize {
        match self {
            Label::Unclaimed => Self::UNCLAIMED,
            Label::Claimed(block) => {
                debug_assert!(block < Self::UNCLAIMED);
                block
            }
            Label::Deleted => Self::DELETED,
        }
    }

    #[inline(always)]
    fn from_word(word: usize) -> Self {
        match word {
            Self::DELETED => Label::Deleted,
            Self::UNCLAIMED => Label::Unclaimed,
            block => Label::Claimed(block),
        }
    }
}

/// A [`Label`] for each node, readable and writable concurrently.
#[derive(Debug)]
pub struct NodeLabels {
    words: Box<[AtomicUsize]>,
}

impl NodeLabels {
    /// Creates labels for `num_nodes` nodes, all set to `label`.
    pub fn new(num_nodes: usize, label: Label) -> Self {
        let word = label.to_word();
        Self {
            words: (0..num_nodes).map(|_| AtomicUsize::new(word)).collect(),
        }
    }

    #[inline(always)]
    pub fn get(&self, node: usize) -> Label {
        Label::from_word(self.words[node].load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub fn set(&self, node: usize, label: Label) {
        self.words[node].store(label.to_word(), Ordering::Relaxed)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the labels as a vector.
    pub fn to_vec(&self) -> Vec<Label> {
        (0..self.len()).map(|node| self.get(node)).collect()
    }
}
