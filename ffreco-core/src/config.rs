//! Reconstruction configuration.
//!
//! Energies in GeV, lengths in mm, angles in radians. Values are not checked
//! by the reconstruction stages; callers that load configuration from outside
//! may call [`ReconstructionConfig::validate`].

use crate::candidate::SourceRank;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry constant holding the downstream extent of the far-forward calorimeter.
pub const DEFAULT_Z_MAX_CONSTANT: &str = "HcalFarForwardZDC_SiPMonTile_r_pos";

/// Fallback for [`DEFAULT_Z_MAX_CONSTANT`] (mm).
pub const DEFAULT_Z_MAX_FALLBACK: f64 = 35_800.0;

/// Photon extraction strategy for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhotonMode {
    /// The region never yields photons.
    Disabled,
    /// Promote up to `max_leading_photons` of the most energetic clusters
    /// above the photon energy cut, without a shape test.
    LeaderOnly,
    /// Promote every cluster above the energy cut that passes the shape test.
    #[default]
    AllPassing,
}

/// Neutron extraction strategy for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeutronMode {
    /// The region never yields a neutron.
    Disabled,
    /// Sum all eligible clusters, positioned at the most energetic one.
    #[default]
    SumAll,
    /// Use only the most energetic eligible cluster.
    LeaderOnly,
    /// Sum this region's eligible clusters with those of region `partner`,
    /// positioned at this region's most energetic cluster. Each region's
    /// neutron correction is evaluated at the combined raw energy. The
    /// partner yields no neutron of its own.
    Combined {
        /// Index of the region whose clusters are absorbed.
        partner: usize,
    },
}

/// Energy-scale calibration applied to raw cluster energies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnergyCorrection {
    /// `E_corr = E_raw`.
    #[default]
    Identity,
    /// `E_corr = c0 · E_raw^c1`.
    PowerLaw { c0: f64, c1: f64 },
    /// `E_corr = E_raw / (1 + c0 + c1/√E_raw + c2/E_raw)`.
    Rational { c0: f64, c1: f64, c2: f64 },
}

impl EnergyCorrection {
    /// Power-law correction from a coefficient vector.
    ///
    /// Fewer than two coefficients gives the identity.
    #[must_use]
    pub fn from_coefficients(coeffs: &[f64]) -> Self {
        match coeffs {
            [c0, c1, ..] => Self::PowerLaw { c0: *c0, c1: *c1 },
            _ => Self::Identity,
        }
    }

    /// Applies the correction to a raw energy.
    #[must_use]
    pub fn apply(&self, raw: f64) -> f64 {
        match *self {
            Self::Identity => raw,
            Self::PowerLaw { c0, c1 } => c0 * raw.powf(c1),
            Self::Rational { c0, c1, c2 } => raw / (1.0 + c0 + c1 / raw.sqrt() + c2 / raw),
        }
    }

    /// Corrects `raw` with the energy-dependent scale evaluated at
    /// `reference` rather than at `raw`.
    ///
    /// Used when one shower is split across calorimeters: each part is
    /// scaled by its own calibration taken at the total energy.
    #[must_use]
    pub fn apply_at(&self, raw: f64, reference: f64) -> f64 {
        match *self {
            Self::Identity => raw,
            Self::PowerLaw { c0, c1 } => raw * c0 * reference.powf(c1 - 1.0),
            Self::Rational { c0, c1, c2 } => {
                raw / (1.0 + c0 + c1 / reference.sqrt() + c2 / reference)
            }
        }
    }
}

/// Cluster shape cuts for the photon hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeCuts {
    /// Maximum longitudinal coordinate in the beam frame (mm).
    pub max_z: f64,
    /// Maximum allowed value of any shape width (mm).
    pub max_length: f64,
    /// Shape widths above this count as wide (mm); two or more wide axes reject.
    pub max_width: f64,
}

impl Default for ShapeCuts {
    fn default() -> Self {
        Self {
            max_z: 36_000.0,
            max_length: 100.0,
            max_width: 12.0,
        }
    }
}

/// Configuration of one calorimeter region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegionConfig {
    /// Human-readable region name.
    pub name: String,
    /// Photon extraction strategy.
    pub photon_mode: PhotonMode,
    /// Neutron extraction strategy.
    pub neutron_mode: NeutronMode,
    /// Rank of this region as a photon source.
    pub photon_rank: SourceRank,
    /// Rank of this region as a neutron source.
    pub neutron_rank: SourceRank,
    /// Photon energy-scale correction.
    pub photon_correction: EnergyCorrection,
    /// Neutron energy-scale correction.
    pub neutron_correction: EnergyCorrection,
    /// Minimum raw cluster energy for photon promotion (GeV).
    pub photon_min_energy: f64,
    /// Minimum raw cluster energy for neutron aggregation (GeV).
    pub neutron_min_energy: f64,
    /// Shape cuts for the photon hypothesis.
    pub shape: ShapeCuts,
    /// Maximum photons promoted in [`PhotonMode::LeaderOnly`].
    pub max_leading_photons: usize,
    /// Link every aggregated cluster to a summed neutron, not just the leader.
    pub associate_all_clusters: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            photon_mode: PhotonMode::AllPassing,
            neutron_mode: NeutronMode::SumAll,
            photon_rank: SourceRank::Primary,
            neutron_rank: SourceRank::Primary,
            photon_correction: EnergyCorrection::Identity,
            neutron_correction: EnergyCorrection::Identity,
            photon_min_energy: 0.1,
            neutron_min_energy: 0.0,
            shape: ShapeCuts::default(),
            max_leading_photons: 4,
            associate_all_clusters: true,
        }
    }
}

impl RegionConfig {
    /// Creates a region with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Electromagnetic section of the zero-degree calorimeter: reference
    /// photon source, secondary neutron source.
    #[must_use]
    pub fn zdc_ecal() -> Self {
        Self::new("ZDC Ecal")
            .with_photon_rank(SourceRank::Primary)
            .with_neutron_rank(SourceRank::Secondary)
    }

    /// Hadronic section of the zero-degree calorimeter: reference neutron
    /// source, secondary photon source.
    #[must_use]
    pub fn zdc_hcal() -> Self {
        Self::new("ZDC Hcal")
            .with_photon_rank(SourceRank::Secondary)
            .with_neutron_rank(SourceRank::Primary)
    }

    /// Returns true if the region can yield photons.
    #[must_use]
    pub fn detects_photons(&self) -> bool {
        self.photon_mode != PhotonMode::Disabled
    }

    /// Returns true if the region can yield neutrons.
    #[must_use]
    pub fn detects_neutrons(&self) -> bool {
        self.neutron_mode != NeutronMode::Disabled
    }

    /// Set photon extraction mode.
    #[must_use]
    pub fn with_photon_mode(mut self, mode: PhotonMode) -> Self {
        self.photon_mode = mode;
        self
    }

    /// Set neutron extraction mode.
    #[must_use]
    pub fn with_neutron_mode(mut self, mode: NeutronMode) -> Self {
        self.neutron_mode = mode;
        self
    }

    /// Set photon source rank.
    #[must_use]
    pub fn with_photon_rank(mut self, rank: SourceRank) -> Self {
        self.photon_rank = rank;
        self
    }

    /// Set neutron source rank.
    #[must_use]
    pub fn with_neutron_rank(mut self, rank: SourceRank) -> Self {
        self.neutron_rank = rank;
        self
    }

    /// Set photon energy correction.
    #[must_use]
    pub fn with_photon_correction(mut self, correction: EnergyCorrection) -> Self {
        self.photon_correction = correction;
        self
    }

    /// Set neutron energy correction.
    #[must_use]
    pub fn with_neutron_correction(mut self, correction: EnergyCorrection) -> Self {
        self.neutron_correction = correction;
        self
    }

    /// Set minimum photon cluster energy.
    #[must_use]
    pub fn with_photon_min_energy(mut self, energy: f64) -> Self {
        self.photon_min_energy = energy;
        self
    }

    /// Set minimum neutron cluster energy.
    #[must_use]
    pub fn with_neutron_min_energy(mut self, energy: f64) -> Self {
        self.neutron_min_energy = energy;
        self
    }

    /// Set shape cuts.
    #[must_use]
    pub fn with_shape_cuts(mut self, shape: ShapeCuts) -> Self {
        self.shape = shape;
        self
    }

    /// Set cluster association for summed neutrons.
    #[must_use]
    pub fn with_associate_all_clusters(mut self, associate: bool) -> Self {
        self.associate_all_clusters = associate;
        self
    }
}

/// Configuration of the full reconstruction chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconstructionConfig {
    /// Calorimeter regions, in the order events supply cluster collections.
    pub regions: Vec<RegionConfig>,
    /// π⁰ mass window as a fraction of the π⁰ mass.
    pub pi0_window: f64,
    /// Λ combinatorial mass window as a fraction of the Λ mass.
    pub lambda_window: f64,
    /// Maximum post-fit Λ mass deviation (GeV).
    pub lambda_max_mass_dev: f64,
    /// Σ⁰ mass window (GeV).
    pub sigma0_window: f64,
    /// Vertex solver iteration count.
    pub iterations: usize,
    /// Rotation about Y from the beam frame to the lab frame (rad).
    pub rot_y: f64,
    /// Geometry constant resolving the maximum longitudinal extent.
    pub z_max_constant: String,
    /// Longitudinal extent used when the lookup fails (mm).
    pub z_max_fallback: f64,
    /// Millimetres per output length unit.
    pub length_unit: f64,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            regions: vec![RegionConfig::zdc_ecal(), RegionConfig::zdc_hcal()],
            pi0_window: 0.2,
            lambda_window: 0.05,
            lambda_max_mass_dev: 0.030,
            sigma0_window: 0.030,
            iterations: 10,
            rot_y: -0.025,
            z_max_constant: DEFAULT_Z_MAX_CONSTANT.to_string(),
            z_max_fallback: DEFAULT_Z_MAX_FALLBACK,
            length_unit: 1.0,
        }
    }
}

impl ReconstructionConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region list.
    #[must_use]
    pub fn with_regions(mut self, regions: Vec<RegionConfig>) -> Self {
        self.regions = regions;
        self
    }

    /// Set the fractional π⁰ window.
    #[must_use]
    pub fn with_pi0_window(mut self, fraction: f64) -> Self {
        self.pi0_window = fraction;
        self
    }

    /// Set the fractional Λ window.
    #[must_use]
    pub fn with_lambda_window(mut self, fraction: f64) -> Self {
        self.lambda_window = fraction;
        self
    }

    /// Set the post-fit Λ window.
    #[must_use]
    pub fn with_lambda_max_mass_dev(mut self, dev: f64) -> Self {
        self.lambda_max_mass_dev = dev;
        self
    }

    /// Set the absolute Σ⁰ window.
    #[must_use]
    pub fn with_sigma0_window(mut self, window: f64) -> Self {
        self.sigma0_window = window;
        self
    }

    /// Set the solver iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the beam rotation angle.
    #[must_use]
    pub fn with_rot_y(mut self, angle: f64) -> Self {
        self.rot_y = angle;
        self
    }

    /// Set the longitudinal extent fallback.
    #[must_use]
    pub fn with_z_max_fallback(mut self, z_max: f64) -> Self {
        self.z_max_fallback = z_max;
        self
    }

    /// Set the output length unit.
    #[must_use]
    pub fn with_length_unit(mut self, mm_per_unit: f64) -> Self {
        self.length_unit = mm_per_unit;
        self
    }

    /// Checks values that would make the reconstruction meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(Error::ConfigError("no calorimeter regions".into()));
        }
        for (name, value) in [
            ("pi0_window", self.pi0_window),
            ("lambda_window", self.lambda_window),
            ("lambda_max_mass_dev", self.lambda_max_mass_dev),
            ("sigma0_window", self.sigma0_window),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::ConfigError(format!("{name} must be non-negative")));
            }
        }
        if self.iterations == 0 {
            return Err(Error::ConfigError("iterations must be at least 1".into()));
        }
        if self.length_unit <= 0.0 {
            return Err(Error::ConfigError("length_unit must be positive".into()));
        }
        for (idx, region) in self.regions.iter().enumerate() {
            if region.photon_min_energy < 0.0 || region.neutron_min_energy < 0.0 {
                return Err(Error::ConfigError(format!(
                    "region '{}': negative energy threshold",
                    region.name
                )));
            }
            if let NeutronMode::Combined { partner } = region.neutron_mode {
                let valid = partner != idx
                    && self.regions.get(partner).is_some_and(|p| {
                        !matches!(p.neutron_mode, NeutronMode::Combined { .. })
                    });
                if !valid {
                    return Err(Error::ConfigError(format!(
                        "region '{}': invalid neutron partner {partner}",
                        region.name
                    )));
                }
            }
        }
        Ok(())
    }
}
