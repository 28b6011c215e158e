//! Per-event input and output containers.

use crate::candidate::{CandidateId, NeutralCandidate};
use crate::cluster::Cluster;
use crate::record::{LambdaReconstruction, Sigma0Reconstruction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clusters of one event, one collection per configured region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventInput {
    /// Cluster collections, indexed like `ReconstructionConfig::regions`.
    pub regions: Vec<Vec<Cluster>>,
}

impl EventInput {
    /// Creates an event from per-region cluster collections.
    #[must_use]
    pub fn new(regions: Vec<Vec<Cluster>>) -> Self {
        Self { regions }
    }

    /// Total number of clusters in the event.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.regions.iter().map(Vec::len).sum()
    }
}

/// Everything reconstructed from one event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventOutput {
    /// Classified neutral candidates; record back-links index this list.
    pub candidates: Vec<NeutralCandidate>,
    /// Number of accepted π⁰ pairs.
    pub pi0_pairs: usize,
    /// The selected Λ, if any survived every cut.
    pub lambda: Option<LambdaReconstruction>,
    /// One Σ⁰ per accepted (Λ, γ) pair.
    pub sigma0s: Vec<Sigma0Reconstruction>,
}

impl EventOutput {
    /// Looks up a candidate by id.
    #[must_use]
    pub fn candidate(&self, id: CandidateId) -> Option<&NeutralCandidate> {
        self.candidates.get(id.0)
    }

    /// Number of photon candidates.
    #[must_use]
    pub fn photon_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_photon()).count()
    }

    /// Number of neutron candidates.
    #[must_use]
    pub fn neutron_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_neutron()).count()
    }
}

/// Counts accumulated over many events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReconstructionStatistics {
    /// Events processed.
    pub events: usize,
    /// Photon candidates.
    pub photons: usize,
    /// Neutron candidates.
    pub neutrons: usize,
    /// Accepted π⁰ pairs.
    pub pi0_pairs: usize,
    /// Reconstructed Λ.
    pub lambdas: usize,
    /// Reconstructed Σ⁰.
    pub sigma0s: usize,
}

impl ReconstructionStatistics {
    /// Adds one event's output.
    pub fn record(&mut self, output: &EventOutput) {
        self.events += 1;
        self.photons += output.photon_count();
        self.neutrons += output.neutron_count();
        self.pi0_pairs += output.pi0_pairs;
        self.lambdas += usize::from(output.lambda.is_some());
        self.sigma0s += output.sigma0s.len();
    }

    /// Fraction of events with a reconstructed Λ.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn lambda_efficiency(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.lambdas as f64 / self.events as f64
        }
    }
}

impl<'a> FromIterator<&'a EventOutput> for ReconstructionStatistics {
    fn from_iter<I: IntoIterator<Item = &'a EventOutput>>(iter: I) -> Self {
        let mut stats = Self::default();
        for output in iter {
            stats.record(output);
        }
        stats
    }
}
