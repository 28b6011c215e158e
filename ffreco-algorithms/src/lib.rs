//! ffreco-algorithms: Reconstruction stages for far-forward neutral hyperons.
//!
//! The chain runs strictly forward, one event at a time:
//! - **Classification** - clusters to photon and neutron candidates
//! - **π⁰ pairing** - photon pairs in the π⁰ mass window
//! - **Λ search** - (n, γ, γ) triplets, single best per event
//! - **Vertex fit** - fixed-count bisection on the π⁰ opening angle
//! - **Λ build** - post-fit mass cut, rest-frame daughters
//! - **Σ⁰ search** - Λ plus each remaining photon
//!
#![warn(missing_docs)]

mod classifier;
mod lambda_builder;
mod lambda_search;
mod pi0;
mod processing;
pub mod selection;
mod sigma0;
mod vertex;

pub use classifier::NeutralCandidateClassifier;
pub use lambda_builder::LambdaBuilder;
pub use lambda_search::{LambdaCandidate, LambdaCandidateSearch, LambdaRank};
pub use pi0::{Pi0Pair, Pi0PairFinder};
pub use processing::NeutralsReconstruction;
pub use selection::{select_best, Ranked, TotalF64};
pub use sigma0::Sigma0CandidateSearch;
pub use vertex::{VertexIterativeSolver, VertexSolution};

// Re-export core configuration and records
pub use ffreco_core::{EventInput, EventOutput, ReconstructionConfig, ReconstructionStatistics};
