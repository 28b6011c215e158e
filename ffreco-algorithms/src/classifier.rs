//! Neutral candidate classification.
//!
//! Turns the clusters of each calorimeter region into photon and neutron
//! candidates:
//! - Photons are promoted first, according to the region's [`PhotonMode`].
//! - Clusters that did not become photons and pass the neutron energy cut
//!   are eligible for the region's single neutron candidate.
//! - A region in [`NeutronMode::Combined`] also absorbs the eligible
//!   clusters of its partner region, for showers split between sections.
//! - Candidate direction is the unit vector from the origin to the
//!   reference point; the momentum magnitude follows from the calibrated
//!   energy and the species mass.

use ffreco_core::{
    direction, BeamFrame, Cluster, ClusterRef, NeutralCandidate, NeutronMode, PhotonMode,
    RegionConfig, ShapeCuts, SourceRank, Species, Vector3,
};
use log::debug;

/// Classifies clusters into neutral candidates.
#[derive(Clone, Debug)]
pub struct NeutralCandidateClassifier {
    frame: BeamFrame,
    neutron_mass: f64,
}

/// One region's clusters after photon promotion.
struct RegionClusters<'a> {
    index: usize,
    config: &'a RegionConfig,
    clusters: &'a [Cluster],
    is_photon: Vec<bool>,
}

impl RegionClusters<'_> {
    /// Clusters left for neutron aggregation.
    fn neutron_eligible(&self) -> Vec<usize> {
        (0..self.clusters.len())
            .filter(|&idx| {
                !self.is_photon[idx] && self.clusters[idx].energy > self.config.neutron_min_energy
            })
            .collect()
    }

    /// Most energetic of `eligible`; the first one wins ties.
    fn leader(&self, eligible: &[usize]) -> Option<usize> {
        let mut leader: Option<usize> = None;
        for &idx in eligible {
            if leader.map_or(true, |l| self.clusters[idx].energy > self.clusters[l].energy) {
                leader = Some(idx);
            }
        }
        leader
    }

    fn raw_energy(&self, members: &[usize]) -> f64 {
        members.iter().map(|&idx| self.clusters[idx].energy).sum()
    }

    fn refs(&self, members: &[usize]) -> Vec<ClusterRef> {
        members
            .iter()
            .map(|&idx| ClusterRef::new(self.index, idx))
            .collect()
    }

    /// Cluster links for a summed neutron.
    fn sum_refs(&self, eligible: &[usize], leader: Option<usize>) -> Vec<ClusterRef> {
        if self.config.associate_all_clusters {
            self.refs(eligible)
        } else {
            self.refs(&leader.into_iter().collect::<Vec<_>>())
        }
    }
}

impl NeutralCandidateClassifier {
    /// Create a classifier for a beam frame rotated by `rot_y` about Y.
    #[must_use]
    pub fn new(rot_y: f64, neutron_mass: f64) -> Self {
        Self {
            frame: BeamFrame::new(rot_y),
            neutron_mass,
        }
    }

    /// Shape test for the photon hypothesis.
    ///
    /// Rejects clusters beyond `max_z` in the beam frame, clusters with any
    /// width above `max_length`, and clusters with two or more widths above
    /// `max_width`.
    #[must_use]
    pub fn is_gamma(&self, cluster: &Cluster, cuts: &ShapeCuts) -> bool {
        let z = self.frame.to_beam(&cluster.position).z;
        if z > cuts.max_z {
            return false;
        }

        let widths = cluster.widths();
        if widths.iter().any(|&w| w > cuts.max_length) {
            return false;
        }

        let wide = widths.iter().filter(|&&w| w > cuts.max_width).count();
        wide < 2
    }

    /// Classifies one event.
    ///
    /// `event` holds one cluster collection per entry of `regions`.
    /// Candidates come out region by region: the region's photons in cluster
    /// order (energy order for [`PhotonMode::LeaderOnly`]), then at most one
    /// neutron.
    #[must_use]
    pub fn classify(&self, regions: &[RegionConfig], event: &[Vec<Cluster>]) -> Vec<NeutralCandidate> {
        let mut photons = Vec::with_capacity(regions.len());
        let mut views = Vec::with_capacity(regions.len());
        for (index, (config, clusters)) in regions.iter().zip(event).enumerate() {
            let (found, is_photon) = self.photons(index, config, clusters);
            photons.push(found);
            views.push(RegionClusters {
                index,
                config,
                clusters,
                is_photon,
            });
        }

        let partners: Vec<Option<&RegionClusters>> = views
            .iter()
            .map(|view| match view.config.neutron_mode {
                NeutronMode::Combined { partner } if partner != view.index => views.get(partner),
                _ => None,
            })
            .collect();

        let mut out = Vec::new();
        for ((view, found), partner) in views.iter().zip(photons).zip(&partners) {
            let before = out.len();
            out.extend(found);

            let absorbed = partners.iter().flatten().any(|p| p.index == view.index);
            if absorbed {
                debug!("{}: clusters absorbed by a combined neutron", view.config.name);
            } else if let Some(neutron) = self.neutron(view, *partner) {
                out.push(neutron);
            }

            debug!(
                "{}: {} clusters -> {} candidates",
                view.config.name,
                view.clusters.len(),
                out.len() - before
            );
        }
        out
    }

    /// Promotes a region's photons; also returns the per-cluster photon flags.
    fn photons(
        &self,
        index: usize,
        region: &RegionConfig,
        clusters: &[Cluster],
    ) -> (Vec<NeutralCandidate>, Vec<bool>) {
        let mut is_photon = vec![false; clusters.len()];
        let mut found = Vec::new();

        for idx in self.photon_indices(region, clusters) {
            let cluster = &clusters[idx];
            let energy = region.photon_correction.apply(cluster.energy);
            let Some(candidate) = self.candidate(
                Species::Photon,
                energy,
                cluster.position,
                index,
                region.photon_rank,
                vec![ClusterRef::new(index, idx)],
            ) else {
                debug!(
                    "{}: cluster {idx} rejected as photon (E={energy:.3})",
                    region.name
                );
                continue;
            };
            is_photon[idx] = true;
            found.push(candidate);
        }

        (found, is_photon)
    }

    /// Indices of clusters promoted to photons.
    fn photon_indices(&self, region: &RegionConfig, clusters: &[Cluster]) -> Vec<usize> {
        let above_cut = |idx: &usize| clusters[*idx].energy > region.photon_min_energy;

        match region.photon_mode {
            PhotonMode::Disabled => Vec::new(),
            PhotonMode::LeaderOnly => {
                let mut order: Vec<usize> = (0..clusters.len()).filter(above_cut).collect();
                order.sort_by(|&a, &b| clusters[b].energy.total_cmp(&clusters[a].energy));
                order.truncate(region.max_leading_photons);
                order
            }
            PhotonMode::AllPassing => (0..clusters.len())
                .filter(above_cut)
                .filter(|&idx| self.is_gamma(&clusters[idx], &region.shape))
                .collect(),
        }
    }

    /// Aggregates the region's neutron candidate from non-photon clusters.
    fn neutron(
        &self,
        view: &RegionClusters,
        partner: Option<&RegionClusters>,
    ) -> Option<NeutralCandidate> {
        let config = view.config;
        let eligible = view.neutron_eligible();
        let leader = view.leader(&eligible);

        let (energy, members) = match config.neutron_mode {
            NeutronMode::Disabled => return None,
            NeutronMode::LeaderOnly => {
                let leader = leader?;
                let raw = view.clusters[leader].energy;
                (config.neutron_correction.apply(raw), view.refs(&[leader]))
            }
            NeutronMode::SumAll => {
                let raw = view.raw_energy(&eligible);
                if raw <= 0.0 {
                    return None;
                }
                (
                    config.neutron_correction.apply(raw),
                    view.sum_refs(&eligible, leader),
                )
            }
            NeutronMode::Combined { .. } => {
                let partner_eligible = partner.map(RegionClusters::neutron_eligible).unwrap_or_default();
                let own = view.raw_energy(&eligible);
                let other = partner.map_or(0.0, |p| p.raw_energy(&partner_eligible));
                let total = own + other;
                if total <= 0.0 {
                    return None;
                }

                let mut energy = config.neutron_correction.apply_at(own, total);
                let mut members = view.sum_refs(&eligible, leader);
                if let Some(p) = partner {
                    energy += p.config.neutron_correction.apply_at(other, total);
                    if config.associate_all_clusters {
                        members.extend(p.refs(&partner_eligible));
                    }
                }
                (energy, members)
            }
        };

        let leader = leader?;
        self.candidate(
            Species::Neutron,
            energy,
            view.clusters[leader].position,
            view.index,
            config.neutron_rank,
            members,
        )
    }

    /// Builds a candidate pointing from the origin to `position`.
    fn candidate(
        &self,
        species: Species,
        energy: f64,
        position: Vector3,
        region: usize,
        rank: SourceRank,
        clusters: Vec<ClusterRef>,
    ) -> Option<NeutralCandidate> {
        if !(energy.is_finite() && energy > 0.0) {
            return None;
        }
        let dir = direction(&position)?;

        let magnitude = match species {
            Species::Photon => energy,
            Species::Neutron => (energy * energy - self.neutron_mass * self.neutron_mass)
                .max(0.0)
                .sqrt(),
        };

        Some(NeutralCandidate {
            species,
            energy,
            momentum: dir * magnitude,
            reference_point: position,
            region,
            rank,
            clusters,
        })
    }
}
