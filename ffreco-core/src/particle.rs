//! Particle property lookup by PDG code.
//!
//! The table is an explicit value built once and passed by reference to the
//! stages that need masses, so there is no process-wide particle registry.

use std::collections::HashMap;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// PDG Monte Carlo particle codes used by the reconstruction.
pub mod pdg {
    /// Photon.
    pub const PHOTON: i32 = 22;
    /// Neutral pion.
    pub const PI0: i32 = 111;
    /// Long-lived neutral kaon.
    pub const K0_LONG: i32 = 130;
    /// Neutron.
    pub const NEUTRON: i32 = 2112;
    /// Proton.
    pub const PROTON: i32 = 2212;
    /// Λ baryon.
    pub const LAMBDA: i32 = 3122;
    /// Σ⁰ baryon.
    pub const SIGMA0: i32 = 3212;
}

/// Static properties of one particle species.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleInfo {
    /// PDG code.
    pub pdg: i32,
    /// Electric charge in units of e.
    pub charge: i8,
    /// Rest mass (GeV).
    pub mass: f64,
}

/// Read-only PDG code to particle property table.
#[derive(Debug, Clone, Default)]
pub struct ParticleTable {
    entries: HashMap<i32, ParticleInfo>,
}

impl ParticleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the species needed for neutral hyperon reconstruction.
    #[must_use]
    pub fn standard() -> Self {
        [
            (pdg::PHOTON, 0, 0.0),
            (pdg::PI0, 0, 0.134_976_8),
            (pdg::K0_LONG, 0, 0.497_611),
            (pdg::NEUTRON, 0, 0.939_565_42),
            (pdg::PROTON, 1, 0.938_272_09),
            (pdg::LAMBDA, 0, 1.115_683),
            (pdg::SIGMA0, 0, 1.192_642),
        ]
        .into_iter()
        .fold(Self::new(), |table, (pdg, charge, mass)| {
            table.with_particle(ParticleInfo { pdg, charge, mass })
        })
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with_particle(mut self, info: ParticleInfo) -> Self {
        self.entries.insert(info.pdg, info);
        self
    }

    /// Looks up a particle by PDG code.
    pub fn particle(&self, pdg: i32) -> Result<&ParticleInfo> {
        self.entries.get(&pdg).ok_or(Error::UnknownParticle(pdg))
    }

    /// Rest mass for a PDG code.
    pub fn mass(&self, pdg: i32) -> Result<f64> {
        self.particle(pdg).map(|info| info.mass)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Masses the reconstruction stages need, resolved once from a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperonMasses {
    /// Neutron mass.
    pub neutron: f64,
    /// π⁰ mass.
    pub pi0: f64,
    /// Λ mass.
    pub lambda: f64,
}

impl HyperonMasses {
    /// Resolves the masses from `table`.
    pub fn from_table(table: &ParticleTable) -> Result<Self> {
        Ok(Self {
            neutron: table.mass(pdg::NEUTRON)?,
            pi0: table.mass(pdg::PI0)?,
            lambda: table.mass(pdg::LAMBDA)?,
        })
    }
}
