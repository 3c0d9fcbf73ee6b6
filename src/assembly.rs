//! Reference assemblers that drive forms over a [`SimplexMesh`](crate::mesh::SimplexMesh).
//!
//! For each cell, the assembler builds a cell view, asks the node maps of the form for the
//! global indices of the cell, gathers the local coefficient values, asks the form for the
//! element tensor and finally scatter-adds the element tensor into the global tensor.
use serde::{Deserialize, Serialize};

mod buffers;
mod global;

pub use global::*;

/// How an assembler treats element tensors with NaN or infinite entries.
///
/// Forms report degenerate cells through non-finite values rather than errors, so it is up to
/// the assembler to decide whether to look for them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NonFinitePolicy {
    /// Do not inspect element tensors.
    #[default]
    Ignore,
    /// Log a warning for every cell with non-finite entries and carry on.
    Warn,
    /// Abort assembly with an error naming the first offending cell.
    Error,
}

/// Runtime configuration shared by the serial and parallel assemblers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    pub non_finite: NonFinitePolicy,
    /// The minimum number of cells handed to a single parallel task.
    pub min_cells_per_task: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            non_finite: NonFinitePolicy::Ignore,
            min_cells_per_task: 64,
        }
    }
}

impl AssemblyOptions {
    pub fn with_non_finite_policy(self, non_finite: NonFinitePolicy) -> Self {
        Self { non_finite, ..self }
    }

    pub fn with_min_cells_per_task(self, min_cells_per_task: usize) -> Self {
        Self {
            min_cells_per_task: min_cells_per_task.max(1),
            ..self
        }
    }
}
