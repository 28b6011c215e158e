//! Output records for reconstructed Λ and Σ⁰ candidates.

use crate::candidate::CandidateId;
use crate::kinematics::{FourMomentum, Vector3};
use crate::particle::ParticleInfo;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a Λ reconstruction in an event's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambdaId(pub usize);

/// Explicit back-link from a record to one of its constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParticleRef {
    /// A neutral candidate of the same event.
    Candidate(CandidateId),
    /// A Λ reconstruction of the same event.
    Lambda(LambdaId),
}

/// A reconstructed particle with its constituents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReconstructedParticle {
    /// PDG code.
    pub pdg: i32,
    /// Electric charge.
    pub charge: i8,
    /// Mass (GeV). Reconstructed for parents, nominal for CM daughters.
    pub mass: f64,
    /// Energy (GeV).
    pub energy: f64,
    /// Three-momentum (GeV).
    pub momentum: Vector3,
    /// Reference point in output length units.
    pub reference_point: Vector3,
    /// Constituents this record was built from.
    pub constituents: Vec<ParticleRef>,
}

impl ReconstructedParticle {
    /// Builds a record for `info` from a four-momentum.
    #[must_use]
    pub fn from_four_momentum(
        info: &ParticleInfo,
        mass: f64,
        p4: FourMomentum,
        reference_point: Vector3,
        constituents: Vec<ParticleRef>,
    ) -> Self {
        Self {
            pdg: info.pdg,
            charge: info.charge,
            mass,
            energy: p4.e,
            momentum: p4.p,
            reference_point,
            constituents,
        }
    }

    /// Four-momentum of the record.
    #[inline]
    #[must_use]
    pub fn four_momentum(&self) -> FourMomentum {
        FourMomentum::new(self.momentum, self.energy)
    }
}

/// An accepted Λ → n π⁰ (π⁰ → γγ) reconstruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambdaReconstruction {
    /// The Λ in the lab frame, reference point at the fitted decay vertex.
    pub lambda: ReconstructedParticle,
    /// Neutron, γ, γ boosted into the Λ rest frame.
    pub daughters_cm: [ReconstructedParticle; 3],
}

impl LambdaReconstruction {
    /// Lab-frame candidates the Λ was built from (neutron, γ, γ).
    pub fn constituent_candidates(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.lambda
            .constituents
            .iter()
            .filter_map(|link| match link {
                ParticleRef::Candidate(id) => Some(*id),
                ParticleRef::Lambda(_) => None,
            })
    }
}

/// An accepted Σ⁰ → Λ γ reconstruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sigma0Reconstruction {
    /// The Σ⁰ in the lab frame, reference point at the origin.
    pub sigma0: ReconstructedParticle,
    /// Λ and γ boosted into the Σ⁰ rest frame.
    pub daughters_cm: [ReconstructedParticle; 2],
}
