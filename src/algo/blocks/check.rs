use super::BlockState;
use crate::graph::Label;
use crate::{Error, Result};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Checks the state left by block growth.
///
/// Every node that is not deleted must be claimed by a block and marked as
/// such; deleted nodes must not be marked.
pub fn check_claims(state: &BlockState, thread_pool: &ThreadPool) -> Result<()> {
    thread_pool.install(|| {
        (0..state.num_nodes())
            .into_par_iter()
            .try_for_each(|node| match (state.label(node), state.in_bfs(node)) {
                (Label::Claimed(_), true) | (Label::Deleted, false) => Ok(()),
                (label, in_bfs) => Err(Error::invariant(
                    "block check",
                    format!("node {} has label {:?} but in_bfs = {}", node, label, in_bfs),
                )),
            })
    })
}
