//! ffreco-core: Core types for far-forward neutral particle reconstruction.
//!
//! This crate provides the data model shared by the reconstruction stages:
//! calorimeter clusters, classified neutral candidates, output records,
//! kinematics helpers, the particle table, geometry constant lookup and
//! configuration.
//!

pub mod candidate;
pub mod cluster;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod kinematics;
pub mod particle;
pub mod record;

pub use candidate::{CandidateId, NeutralCandidate, SourceRank, Species};
pub use cluster::{Cluster, ClusterRef};
pub use config::{
    EnergyCorrection, NeutronMode, PhotonMode, ReconstructionConfig, RegionConfig, ShapeCuts,
};
pub use error::{Error, Result};
pub use event::{EventInput, EventOutput, ReconstructionStatistics};
pub use geometry::{resolve_constant, GeometryService, StaticGeometry};
pub use kinematics::{direction, BeamFrame, FourMomentum, Vector3};
pub use particle::{pdg, HyperonMasses, ParticleInfo, ParticleTable};
pub use record::{
    LambdaId, LambdaReconstruction, ParticleRef, ReconstructedParticle, Sigma0Reconstruction,
};
