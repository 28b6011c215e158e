//! π⁰ → γγ pair finding over the pooled photon candidates of an event.

use ffreco_core::{CandidateId, NeutralCandidate, SourceRank};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An accepted photon pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pi0Pair {
    /// First photon (lower candidate index).
    pub first: CandidateId,
    /// Second photon.
    pub second: CandidateId,
    /// Number of photons not supplied by a primary photon source (0, 1 or 2).
    pub category: u8,
    /// Reconstructed invariant mass (GeV).
    pub mass: f64,
    /// `|m − m_π0|` (GeV).
    pub mass_deviation: f64,
}

/// Enumerates photon pairs inside the π⁰ mass window.
#[derive(Clone, Debug)]
pub struct Pi0PairFinder {
    pi0_mass: f64,
    window: f64,
}

impl Pi0PairFinder {
    /// Create a finder accepting `|m − m_π0| ≤ window_fraction · m_π0`.
    #[must_use]
    pub fn new(pi0_mass: f64, window_fraction: f64) -> Self {
        Self {
            pi0_mass,
            window: window_fraction * pi0_mass,
        }
    }

    /// Absolute mass window (GeV).
    #[must_use]
    pub fn window(&self) -> f64 {
        self.window
    }

    /// Finds every unordered photon pair `(i < j)` inside the window.
    ///
    /// A photon may appear in several pairs.
    #[must_use]
    pub fn find(&self, candidates: &[NeutralCandidate]) -> Vec<Pi0Pair> {
        let photons: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_photon())
            .map(|(idx, _)| idx)
            .collect();

        let mut pairs = Vec::new();
        for (n, &i) in photons.iter().enumerate() {
            for &j in &photons[n + 1..] {
                let (a, b) = (&candidates[i], &candidates[j]);
                let Some(mass) = (a.four_momentum() + b.four_momentum()).mass() else {
                    continue;
                };

                let mass_deviation = (mass - self.pi0_mass).abs();
                if mass_deviation > self.window {
                    continue;
                }

                let category = [a.rank, b.rank]
                    .iter()
                    .filter(|&&rank| rank != SourceRank::Primary)
                    .count();

                pairs.push(Pi0Pair {
                    first: CandidateId(i),
                    second: CandidateId(j),
                    category: u8::try_from(category).unwrap_or(u8::MAX),
                    mass,
                    mass_deviation,
                });
            }
        }

        debug!(
            "{} photons -> {} pi0 pairs in window",
            photons.len(),
            pairs.len()
        );
        pairs
    }
}
