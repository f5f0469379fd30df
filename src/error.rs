/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

/// Errors that stop a pipeline run.
///
/// Exhausting the iteration budget of a propagation phase is not an error:
/// it is reported as [`Convergence::BudgetExhausted`](crate::algo::rounds::Convergence)
/// and logged as a warning.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A structural invariant does not hold; the phase is aborted.
    #[error("[{phase}] invariant violated: {message}")]
    InvariantViolation {
        phase: &'static str,
        message: String,
    },
    /// The configuration (or the graph it is applied to) leaves nothing
    /// sensible to compute.
    #[error("[{phase}] degenerate configuration: {message}")]
    DegenerateConfig {
        phase: &'static str,
        message: String,
    },
    /// An artifact could not be created, written or read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invariant(phase: &'static str, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            phase,
            message: message.into(),
        }
    }

    pub(crate) fn degenerate(phase: &'static str, message: impl Into<String>) -> Self {
        Self::DegenerateConfig {
            phase,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
