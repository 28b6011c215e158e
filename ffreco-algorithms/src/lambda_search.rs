//! Λ → n π⁰ triplet search and single-best selection.

use std::cmp::Reverse;

use ffreco_core::{CandidateId, NeutralCandidate, SourceRank};
use log::debug;

use crate::pi0::Pi0Pair;
use crate::selection::{select_best, Ranked, TotalF64};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A (neutron, γ, γ) triplet inside the Λ mass window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LambdaCandidate {
    /// Photon pair.
    pub pair: Pi0Pair,
    /// Neutron candidate.
    pub neutron: CandidateId,
    /// Neutron source category (0 primary, 1 secondary).
    pub neutron_category: u8,
    /// Photon pair category, copied from the pair.
    pub pair_category: u8,
    /// Window-normalised χ² of the π⁰ and Λ mass deviations.
    pub chi2: f64,
    /// Triplet invariant mass (GeV).
    pub mass: f64,
    /// Total energy (GeV).
    pub energy: f64,
    /// Longitudinal momentum (GeV).
    pub pz: f64,
}

/// Selection preference, compared field by field in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LambdaRank {
    /// Neutron category, lower first.
    pub neutron_category: u8,
    /// Photon pair category, lower first.
    pub pair_category: u8,
    /// χ², lower first.
    pub chi2: TotalF64,
    /// Longitudinal momentum, higher first.
    pub pz: Reverse<TotalF64>,
    /// Total energy, higher first.
    pub energy: Reverse<TotalF64>,
}

impl Ranked for LambdaCandidate {
    type Key = LambdaRank;

    fn rank_key(&self) -> LambdaRank {
        LambdaRank {
            neutron_category: self.neutron_category,
            pair_category: self.pair_category,
            chi2: TotalF64(self.chi2),
            pz: Reverse(TotalF64(self.pz)),
            energy: Reverse(TotalF64(self.energy)),
        }
    }
}

/// Combines π⁰ pairs with neutron candidates.
#[derive(Clone, Debug)]
pub struct LambdaCandidateSearch {
    lambda_mass: f64,
    pi0_window: f64,
    lambda_window: f64,
}

impl LambdaCandidateSearch {
    /// Create a search with absolute π⁰ window `pi0_window` and
    /// `|m − m_Λ| ≤ window_fraction · m_Λ` acceptance.
    #[must_use]
    pub fn new(lambda_mass: f64, window_fraction: f64, pi0_window: f64) -> Self {
        Self {
            lambda_mass,
            pi0_window,
            lambda_window: window_fraction * lambda_mass,
        }
    }

    /// Builds the pool of triplets inside the Λ window.
    ///
    /// Neutrons are enumerated one source rank at a time, primary first.
    #[must_use]
    pub fn search(&self, candidates: &[NeutralCandidate], pairs: &[Pi0Pair]) -> Vec<LambdaCandidate> {
        let mut pool = Vec::new();

        for rank in [SourceRank::Primary, SourceRank::Secondary] {
            let neutrons = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_neutron() && c.rank == rank);

            for (n_idx, neutron) in neutrons {
                for pair in pairs {
                    let total = neutron.four_momentum()
                        + candidates[pair.first.0].four_momentum()
                        + candidates[pair.second.0].four_momentum();
                    let Some(mass) = total.mass() else {
                        continue;
                    };

                    let deviation = (mass - self.lambda_mass).abs();
                    if deviation > self.lambda_window {
                        continue;
                    }

                    pool.push(LambdaCandidate {
                        pair: *pair,
                        neutron: CandidateId(n_idx),
                        neutron_category: rank.category(),
                        pair_category: pair.category,
                        chi2: self.chi2(pair.mass_deviation, deviation),
                        mass,
                        energy: total.e,
                        pz: total.p.z,
                    });
                }
            }
        }

        debug!("{} pi0 pairs -> {} lambda candidates", pairs.len(), pool.len());
        pool
    }

    /// Selects the preferred candidate of the pool.
    #[must_use]
    pub fn select<'a>(&self, pool: &'a [LambdaCandidate]) -> Option<&'a LambdaCandidate> {
        select_best(pool)
    }

    fn chi2(&self, pi0_deviation: f64, lambda_deviation: f64) -> f64 {
        normalized_square(pi0_deviation, self.pi0_window)
            + normalized_square(lambda_deviation, self.lambda_window)
    }
}

/// `(deviation / window)²`, zero for a zero window.
fn normalized_square(deviation: f64, window: f64) -> f64 {
    if window > 0.0 {
        (deviation / window).powi(2)
    } else {
        0.0
    }
}
