//! Σ⁰ → Λ γ reconstruction.
//!
//! Every photon not used by the Λ is tried; each combination inside the
//! absolute Σ⁰ window yields its own record. There is no best-of reduction
//! at this stage.

use ffreco_core::{
    pdg, CandidateId, LambdaId, LambdaReconstruction, NeutralCandidate, ParticleInfo,
    ParticleRef, ParticleTable, ReconstructedParticle, Result, Sigma0Reconstruction, Vector3,
};
use log::debug;

/// Pairs a reconstructed Λ with the event's remaining photons.
#[derive(Clone, Debug)]
pub struct Sigma0CandidateSearch {
    sigma0: ParticleInfo,
    lambda: ParticleInfo,
    photon: ParticleInfo,
    window: f64,
}

impl Sigma0CandidateSearch {
    /// Create a search accepting `|m − m_Σ0| ≤ window` (GeV).
    pub fn new(particles: &ParticleTable, window: f64) -> Result<Self> {
        Ok(Self {
            sigma0: *particles.particle(pdg::SIGMA0)?,
            lambda: *particles.particle(pdg::LAMBDA)?,
            photon: *particles.particle(pdg::PHOTON)?,
            window,
        })
    }

    /// Reconstructs Σ⁰ candidates from `lambda` and the photons in `candidates`.
    #[must_use]
    pub fn search(
        &self,
        lambda_id: LambdaId,
        lambda: &LambdaReconstruction,
        candidates: &[NeutralCandidate],
    ) -> Vec<Sigma0Reconstruction> {
        let used: Vec<CandidateId> = lambda.constituent_candidates().collect();
        let p_lambda = lambda.lambda.four_momentum();

        let mut out = Vec::new();
        for (idx, gamma) in candidates.iter().enumerate() {
            let id = CandidateId(idx);
            if !gamma.is_photon() || used.contains(&id) {
                continue;
            }

            let p_gamma = gamma.four_momentum();
            let p_sigma = p_lambda + p_gamma;
            let Some(mass) = p_sigma.mass() else {
                continue;
            };
            if (mass - self.sigma0.mass).abs() > self.window {
                continue;
            }

            let boost = -p_sigma.boost_vector();
            let sigma0 = ReconstructedParticle::from_four_momentum(
                &self.sigma0,
                mass,
                p_sigma,
                Vector3::zeros(),
                vec![ParticleRef::Lambda(lambda_id), ParticleRef::Candidate(id)],
            );
            let lambda_cm = ReconstructedParticle::from_four_momentum(
                &self.lambda,
                self.lambda.mass,
                p_lambda.boost(boost),
                Vector3::zeros(),
                vec![ParticleRef::Lambda(lambda_id)],
            );
            let gamma_cm = ReconstructedParticle::from_four_momentum(
                &self.photon,
                self.photon.mass,
                p_gamma.boost(boost),
                Vector3::zeros(),
                vec![ParticleRef::Candidate(id)],
            );

            out.push(Sigma0Reconstruction {
                sigma0,
                daughters_cm: [lambda_cm, gamma_cm],
            });
        }

        debug!("{} sigma0 candidates", out.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ffreco_core::{FourMomentum, SourceRank, Species};

    const M_LAMBDA: f64 = 1.115_683;
    const M_SIGMA0: f64 = 1.192_642;

    fn photon(energy: f64, direction: Vector3) -> NeutralCandidate {
        let dir = direction.normalize();
        NeutralCandidate {
            species: Species::Photon,
            energy,
            momentum: dir * energy,
            reference_point: dir * 30_000.0,
            region: 0,
            rank: SourceRank::Primary,
            clusters: Vec::new(),
        }
    }

    fn lambda_record(p4: FourMomentum, constituents: [usize; 3]) -> LambdaReconstruction {
        let table = ParticleTable::standard();
        let particle = |code| {
            ReconstructedParticle::from_four_momentum(
                table.particle(code).unwrap(),
                0.0,
                FourMomentum::default(),
                Vector3::zeros(),
                Vec::new(),
            )
        };
        LambdaReconstruction {
            lambda: ReconstructedParticle::from_four_momentum(
                table.particle(pdg::LAMBDA).unwrap(),
                M_LAMBDA,
                p4,
                Vector3::new(0.0, 0.0, 5_000.0),
                constituents
                    .iter()
                    .map(|&idx| ParticleRef::Candidate(CandidateId(idx)))
                    .collect(),
            ),
            daughters_cm: [
                particle(pdg::NEUTRON),
                particle(pdg::PHOTON),
                particle(pdg::PHOTON),
            ],
        }
    }

    /// Photon energy along `direction` completing a Σ⁰ with `lambda`.
    fn sigma0_photon_energy(lambda: &FourMomentum, direction: Vector3) -> f64 {
        let dir = direction.normalize();
        (M_SIGMA0 * M_SIGMA0 - M_LAMBDA * M_LAMBDA) / (2.0 * (lambda.e - lambda.p.dot(&dir)))
    }

    fn lambda_p4() -> FourMomentum {
        let p = Vector3::new(0.1, 0.0, 99.0);
        FourMomentum::new(p, (p.norm_squared() + M_LAMBDA * M_LAMBDA).sqrt())
    }

    #[test]
    fn test_single_photon_in_window() {
        let p_lambda = lambda_p4();
        let lambda = lambda_record(p_lambda, [0, 1, 2]);

        let good_dir = Vector3::new(0.004, 0.003, 1.0);
        let good = photon(sigma0_photon_energy(&p_lambda, good_dir), good_dir);
        // Same direction, three times the energy: far above the Σ⁰ mass.
        let bad = photon(3.0 * good.energy, good_dir);

        let mut candidates = vec![
            photon(10.0, Vector3::new(0.01, 0.0, 1.0)),
            photon(10.0, Vector3::new(-0.01, 0.0, 1.0)),
            photon(10.0, Vector3::new(0.0, 0.01, 1.0)),
        ];
        candidates.push(bad);
        candidates.push(good);

        let search = Sigma0CandidateSearch::new(&ParticleTable::standard(), 0.03).unwrap();
        let sigmas = search.search(LambdaId(0), &lambda, &candidates);

        assert_eq!(sigmas.len(), 1);
        let sigma = &sigmas[0];
        assert_eq!(sigma.sigma0.pdg, pdg::SIGMA0);
        assert_abs_diff_eq!(sigma.sigma0.mass, M_SIGMA0, epsilon = 1e-6);
        assert_eq!(sigma.sigma0.reference_point, Vector3::zeros());
        assert_eq!(
            sigma.sigma0.constituents,
            vec![
                ParticleRef::Lambda(LambdaId(0)),
                ParticleRef::Candidate(CandidateId(4))
            ]
        );

        let [lambda_cm, gamma_cm] = &sigma.daughters_cm;
        assert_eq!(lambda_cm.constituents, vec![ParticleRef::Lambda(LambdaId(0))]);
        assert_eq!(gamma_cm.constituents, vec![ParticleRef::Candidate(CandidateId(4))]);
        // Back to back in the Σ⁰ rest frame.
        let sum = lambda_cm.four_momentum() + gamma_cm.four_momentum();
        assert_abs_diff_eq!(sum.p.norm(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sum.e, M_SIGMA0, epsilon = 1e-6);
    }

    #[test]
    fn test_every_accepted_pair_is_emitted() {
        let p_lambda = lambda_p4();
        let lambda = lambda_record(p_lambda, [0, 1, 2]);

        let dir_a = Vector3::new(0.004, 0.003, 1.0);
        let dir_b = Vector3::new(-0.002, 0.005, 1.0);
        let candidates = vec![
            photon(10.0, Vector3::new(0.01, 0.0, 1.0)),
            photon(10.0, Vector3::new(-0.01, 0.0, 1.0)),
            photon(10.0, Vector3::new(0.0, 0.01, 1.0)),
            photon(sigma0_photon_energy(&p_lambda, dir_a), dir_a),
            photon(sigma0_photon_energy(&p_lambda, dir_b), dir_b),
        ];

        let search = Sigma0CandidateSearch::new(&ParticleTable::standard(), 0.03).unwrap();
        assert_eq!(search.search(LambdaId(0), &lambda, &candidates).len(), 2);
    }

    #[test]
    fn test_lambda_constituents_are_skipped() {
        let p_lambda = lambda_p4();
        let dir = Vector3::new(0.004, 0.003, 1.0);
        let candidates = vec![photon(sigma0_photon_energy(&p_lambda, dir), dir)];

        // The only photon already belongs to the Λ.
        let lambda = lambda_record(p_lambda, [0, 0, 0]);
        let search = Sigma0CandidateSearch::new(&ParticleTable::standard(), 0.03).unwrap();
        assert!(search.search(LambdaId(0), &lambda, &candidates).is_empty());
    }
}
