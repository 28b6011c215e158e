//! Final Λ record assembly.

use ffreco_core::{
    pdg, BeamFrame, CandidateId, FourMomentum, LambdaReconstruction, ParticleInfo, ParticleRef,
    ParticleTable, ReconstructedParticle, Result,
};
use log::debug;

use crate::vertex::VertexSolution;

/// Applies the post-fit mass cut and emits the Λ with its rest-frame daughters.
#[derive(Clone, Debug)]
pub struct LambdaBuilder {
    lambda: ParticleInfo,
    neutron: ParticleInfo,
    photon: ParticleInfo,
    max_mass_dev: f64,
    frame: BeamFrame,
    length_unit: f64,
}

impl LambdaBuilder {
    /// Create a builder.
    ///
    /// `rot_y` rotates beam-frame solutions back to the lab; `length_unit`
    /// is millimetres per output length unit.
    pub fn new(
        particles: &ParticleTable,
        max_mass_dev: f64,
        rot_y: f64,
        length_unit: f64,
    ) -> Result<Self> {
        Ok(Self {
            lambda: *particles.particle(pdg::LAMBDA)?,
            neutron: *particles.particle(pdg::NEUTRON)?,
            photon: *particles.particle(pdg::PHOTON)?,
            max_mass_dev,
            frame: BeamFrame::new(rot_y),
            length_unit,
        })
    }

    /// Builds the Λ record from a beam-frame vertex solution.
    ///
    /// `constituents` are the neutron and the two photons, in that order.
    /// Returns `None` when the fitted mass is outside the post-fit window.
    #[must_use]
    pub fn build(
        &self,
        solution: &VertexSolution,
        constituents: [CandidateId; 3],
    ) -> Option<LambdaReconstruction> {
        let mass = solution.lambda.mass()?;
        if (mass - self.lambda.mass).abs() > self.max_mass_dev {
            debug!("lambda rejected after vertex fit: m={mass:.4}");
            return None;
        }

        let lab = solution.rotated(self.frame.lab_from_beam());
        let vertex = lab.vertex / self.length_unit;
        let boost = -lab.lambda.boost_vector();

        let lambda = ReconstructedParticle::from_four_momentum(
            &self.lambda,
            mass,
            lab.lambda,
            vertex,
            constituents.iter().copied().map(ParticleRef::Candidate).collect(),
        );

        let daughter = |info: &ParticleInfo, p4: FourMomentum, id: CandidateId| {
            ReconstructedParticle::from_four_momentum(
                info,
                info.mass,
                p4.boost(boost),
                vertex,
                vec![ParticleRef::Candidate(id)],
            )
        };
        let [n_id, g1_id, g2_id] = constituents;

        Some(LambdaReconstruction {
            lambda,
            daughters_cm: [
                daughter(&self.neutron, lab.neutron, n_id),
                daughter(&self.photon, lab.gamma1, g1_id),
                daughter(&self.photon, lab.gamma2, g2_id),
            ],
        })
    }
}
