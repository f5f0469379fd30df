//! Collaborators of the pipeline phases: degree ranking, label aggregation,
//! pivot selection and small numeric helpers.

/// Module containing mathematical utilities.
pub mod math;

mod label_count;
pub use label_count::*;

mod pivot;
pub use pivot::*;

mod threadpool;
pub use threadpool::*;

mod top_k;
pub use top_k::*;
