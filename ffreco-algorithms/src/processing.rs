//! Event-level driver chaining every reconstruction stage.

use ffreco_core::{
    resolve_constant, CandidateId, Error, EventInput, EventOutput, GeometryService,
    HyperonMasses, LambdaId, ParticleTable, ReconstructionConfig, Result,
};
use log::debug;
use rayon::prelude::*;

use crate::classifier::NeutralCandidateClassifier;
use crate::lambda_builder::LambdaBuilder;
use crate::lambda_search::LambdaCandidateSearch;
use crate::pi0::Pi0PairFinder;
use crate::sigma0::Sigma0CandidateSearch;
use crate::vertex::VertexIterativeSolver;

/// Far-forward neutral reconstruction: clusters to Λ and Σ⁰ records.
///
/// Holds no per-event state; one instance can process events concurrently.
#[derive(Clone, Debug)]
pub struct NeutralsReconstruction {
    config: ReconstructionConfig,
    classifier: NeutralCandidateClassifier,
    pi0: Pi0PairFinder,
    lambda_search: LambdaCandidateSearch,
    solver: VertexIterativeSolver,
    builder: LambdaBuilder,
    sigma0: Sigma0CandidateSearch,
}

impl NeutralsReconstruction {
    /// Prepares every stage, resolving masses and the longitudinal extent once.
    pub fn new(
        config: ReconstructionConfig,
        particles: &ParticleTable,
        geometry: &dyn GeometryService,
    ) -> Result<Self> {
        let masses = HyperonMasses::from_table(particles)?;
        let z_max = resolve_constant(geometry, &config.z_max_constant, config.z_max_fallback);

        let pi0 = Pi0PairFinder::new(masses.pi0, config.pi0_window);
        let lambda_search =
            LambdaCandidateSearch::new(masses.lambda, config.lambda_window, pi0.window());

        Ok(Self {
            classifier: NeutralCandidateClassifier::new(config.rot_y, masses.neutron),
            pi0,
            lambda_search,
            solver: VertexIterativeSolver::new(
                config.iterations,
                z_max,
                config.rot_y,
                masses.neutron,
                masses.pi0,
            ),
            builder: LambdaBuilder::new(
                particles,
                config.lambda_max_mass_dev,
                config.rot_y,
                config.length_unit,
            )?,
            sigma0: Sigma0CandidateSearch::new(particles, config.sigma0_window)?,
            config,
        })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstructs one event.
    ///
    /// Fails only if the event's region count differs from the configuration.
    pub fn process(&self, event: &EventInput) -> Result<EventOutput> {
        if event.regions.len() != self.config.regions.len() {
            return Err(Error::RegionMismatch {
                found: event.regions.len(),
                configured: self.config.regions.len(),
            });
        }

        let mut output = EventOutput {
            candidates: self.classifier.classify(&self.config.regions, &event.regions),
            ..EventOutput::default()
        };

        let pairs = self.pi0.find(&output.candidates);
        output.pi0_pairs = pairs.len();

        let pool = self.lambda_search.search(&output.candidates, &pairs);
        let Some(best) = self.lambda_search.select(&pool) else {
            return Ok(output);
        };

        let ids = [best.neutron, best.pair.first, best.pair.second];
        let [n, g1, g2] = ids.map(|CandidateId(idx)| &output.candidates[idx]);
        let Some(solution) = self.solver.solve(n, g1, g2) else {
            debug!("vertex solver rejected selected triplet {ids:?}");
            return Ok(output);
        };

        if let Some(lambda) = self.builder.build(&solution, ids) {
            output.sigma0s = self.sigma0.search(LambdaId(0), &lambda, &output.candidates);
            output.lambda = Some(lambda);
        }

        Ok(output)
    }

    /// Reconstructs independent events in parallel, preserving input order.
    pub fn process_events(&self, events: &[EventInput]) -> Result<Vec<EventOutput>> {
        events.par_iter().map(|event| self.process(event)).collect()
    }
}
