//! Module containing the phases of the decomposition.

pub mod rounds;

pub mod fwbw;

pub mod zones;

pub mod zone_remap;

pub mod blocks;

pub mod partition;

/// Traits used to interact with the implemented algorithms.
pub mod traits {
    pub use super::rounds::RoundProgram;
}
