//! Neutral particle candidates built from classified clusters.

use crate::cluster::ClusterRef;
use crate::kinematics::{FourMomentum, Vector3};
use crate::particle::pdg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Particle species hypothesis for a neutral candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Species {
    /// Electromagnetic shower hypothesis.
    Photon,
    /// Hadronic shower hypothesis.
    Neutron,
}

impl Species {
    /// PDG code of the species.
    #[must_use]
    pub fn pdg(self) -> i32 {
        match self {
            Species::Photon => pdg::PHOTON,
            Species::Neutron => pdg::NEUTRON,
        }
    }
}

/// Reliability rank of the detector region that supplied a candidate.
///
/// Lower ranks are preferred during Λ selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SourceRank {
    /// Designated reference detector for the species.
    #[default]
    Primary,
    /// Any other detector able to measure the species.
    Secondary,
}

impl SourceRank {
    /// Numeric category, 0 for primary and 1 for secondary.
    #[inline]
    #[must_use]
    pub fn category(self) -> u8 {
        match self {
            SourceRank::Primary => 0,
            SourceRank::Secondary => 1,
        }
    }
}

/// Index of a candidate in an event's candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateId(pub usize);

/// A classified neutral particle candidate in the lab frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeutralCandidate {
    /// Species hypothesis.
    pub species: Species,
    /// Calibrated energy (GeV).
    pub energy: f64,
    /// Three-momentum (GeV).
    pub momentum: Vector3,
    /// Calorimeter impact point (mm).
    pub reference_point: Vector3,
    /// Detector region that produced the candidate.
    pub region: usize,
    /// Reliability rank of that region for this species.
    pub rank: SourceRank,
    /// Contributing clusters.
    pub clusters: Vec<ClusterRef>,
}

impl NeutralCandidate {
    /// Four-momentum of the candidate.
    #[inline]
    #[must_use]
    pub fn four_momentum(&self) -> FourMomentum {
        FourMomentum::new(self.momentum, self.energy)
    }

    /// Returns true for photon candidates.
    #[inline]
    #[must_use]
    pub fn is_photon(&self) -> bool {
        self.species == Species::Photon
    }

    /// Returns true for neutron candidates.
    #[inline]
    #[must_use]
    pub fn is_neutron(&self) -> bool {
        self.species == Species::Neutron
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        assert!(SourceRank::Primary < SourceRank::Secondary);
        assert_eq!(SourceRank::Primary.category(), 0);
        assert_eq!(SourceRank::Secondary.category(), 1);
    }

    #[test]
    fn test_species_pdg() {
        assert_eq!(Species::Photon.pdg(), 22);
        assert_eq!(Species::Neutron.pdg(), 2112);
    }
}
