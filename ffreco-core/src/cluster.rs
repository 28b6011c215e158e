//! Calorimeter cluster records produced by the upstream clustering stage.

use crate::kinematics::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reconstructed calorimeter cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Uncalibrated energy (GeV).
    pub energy: f64,
    /// Energy-weighted centre of gravity in the lab frame (mm).
    pub position: Vector3,
    /// Eigenvalues of the cluster moment matrix (mm²): two transverse,
    /// then the longitudinal proxy.
    pub shape_eigenvalues: [f64; 3],
}

impl Cluster {
    /// Creates a new cluster.
    #[must_use]
    pub fn new(energy: f64, position: Vector3, shape_eigenvalues: [f64; 3]) -> Self {
        Self {
            energy,
            position,
            shape_eigenvalues,
        }
    }

    /// Square roots of the shape eigenvalues (mm).
    #[must_use]
    pub fn widths(&self) -> [f64; 3] {
        self.shape_eigenvalues.map(f64::sqrt)
    }
}

/// Back-link from a candidate to an input cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterRef {
    /// Detector region index.
    pub region: usize,
    /// Index in the region's cluster collection.
    pub index: usize,
}

impl ClusterRef {
    /// Creates a new cluster reference.
    #[inline]
    #[must_use]
    pub const fn new(region: usize, index: usize) -> Self {
        Self { region, index }
    }
}
