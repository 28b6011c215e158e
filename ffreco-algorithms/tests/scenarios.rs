#![allow(clippy::float_cmp)]
use approx::assert_abs_diff_eq;
use ffreco_algorithms::NeutralsReconstruction;
use ffreco_core::{
    CandidateId, Cluster, EventInput, EventOutput, FourMomentum, LambdaId, NeutralCandidate,
    ParticleRef, ParticleTable, ReconstructedParticle, ReconstructionConfig,
    ReconstructionStatistics, SourceRank, StaticGeometry, Vector3,
};

const M_N: f64 = 0.939_565_42;
const M_PI0: f64 = 0.134_976_8;
const M_LAMBDA: f64 = 1.115_683;
const M_SIGMA0: f64 = 1.192_642;
const Z_CALO: f64 = 30_000.0;

const PHOTON_SHAPE: [f64; 3] = [4.0, 4.0, 1.0];
const HADRON_SHAPE: [f64; 3] = [900.0, 900.0, 40_000.0];

fn on_calorimeter(direction: Vector3) -> Vector3 {
    direction * (Z_CALO / direction.z)
}

/// Λ → n π⁰ → n γγ decaying at the origin.
///
/// The neutron (80 GeV) hits (30 mm, -30 mm, 30 m); the π⁰ (20 GeV) opens at
/// the angle that closes the Λ mass, and splits into two 10 GeV photons at
/// the nominal π⁰ opening angle. Returns (ecal clusters, hcal clusters).
fn lambda_clusters() -> (Vec<Cluster>, Vec<Cluster>) {
    let e_n = 80.0;
    let e_pi = 20.0;
    let p_n = (e_n * e_n - M_N * M_N).sqrt();
    let p_pi = (e_pi * e_pi - M_PI0 * M_PI0).sqrt();

    let n_hit = Vector3::new(30.0, -30.0, Z_CALO);
    let n_dir = n_hit.normalize();
    let u = Vector3::y().cross(&n_dir).normalize();
    let w = n_dir.cross(&u);

    let cos_alpha = (M_N * M_N + M_PI0 * M_PI0 + 2.0 * e_n * e_pi - M_LAMBDA * M_LAMBDA)
        / (2.0 * p_n * p_pi);
    let alpha = cos_alpha.acos();
    let pi_dir = n_dir * alpha.cos() + u * alpha.sin();

    let half = (M_PI0 / e_pi).asin();
    let g1 = pi_dir * half.cos() + w * half.sin();
    let g2 = pi_dir * half.cos() - w * half.sin();

    let ecal = vec![
        Cluster::new(e_pi / 2.0, on_calorimeter(g1), PHOTON_SHAPE),
        Cluster::new(e_pi / 2.0, on_calorimeter(g2), PHOTON_SHAPE),
    ];
    let hcal = vec![Cluster::new(e_n, n_hit, HADRON_SHAPE)];
    (ecal, hcal)
}

fn reconstruction() -> NeutralsReconstruction {
    NeutralsReconstruction::new(
        ReconstructionConfig::default(),
        &ParticleTable::standard(),
        &StaticGeometry::new().with_constant("HcalFarForwardZDC_SiPMonTile_r_pos", 35_800.0),
    )
    .unwrap()
}

fn scenario_a() -> EventInput {
    let (ecal, hcal) = lambda_clusters();
    EventInput::new(vec![ecal, hcal])
}

#[test]
fn test_scenario_a_single_lambda() {
    let output = reconstruction().process(&scenario_a()).unwrap();

    assert_eq!(output.photon_count(), 2);
    assert_eq!(output.neutron_count(), 1);
    assert_eq!(output.pi0_pairs, 1);

    let lambda = output.lambda.as_ref().expect("lambda reconstructed");
    assert_eq!(lambda.lambda.pdg, 3122);
    assert!((lambda.lambda.mass - M_LAMBDA).abs() <= 0.030);
    assert_eq!(
        lambda.lambda.constituents,
        vec![
            ParticleRef::Candidate(CandidateId(2)),
            ParticleRef::Candidate(CandidateId(0)),
            ParticleRef::Candidate(CandidateId(1)),
        ]
    );
    for (daughter, id) in lambda.daughters_cm.iter().zip([2, 0, 1]) {
        assert_eq!(daughter.constituents, vec![ParticleRef::Candidate(CandidateId(id))]);
        assert_eq!(daughter.reference_point, lambda.lambda.reference_point);
    }

    // True decay at the origin: the vertex lands within the last bisection steps.
    assert!(lambda.lambda.reference_point.norm() < 35_800.0 / 256.0);
    // No photons left over for a Σ⁰.
    assert!(output.sigma0s.is_empty());
}

#[test]
fn test_lambda_cm_daughters_reproduce_parent() {
    let output = reconstruction().process(&scenario_a()).unwrap();
    let lambda = output.lambda.unwrap();
    let parent = lambda.lambda.four_momentum();

    let boost = parent.boost_vector();
    let lab_sum: FourMomentum = lambda
        .daughters_cm
        .iter()
        .map(|d| d.four_momentum().boost(boost))
        .sum();

    assert_abs_diff_eq!(lab_sum.e, parent.e, epsilon = 1e-6);
    assert_abs_diff_eq!(lab_sum.p.x, parent.p.x, epsilon = 1e-6);
    assert_abs_diff_eq!(lab_sum.p.y, parent.p.y, epsilon = 1e-6);
    assert_abs_diff_eq!(lab_sum.p.z, parent.p.z, epsilon = 1e-6);
}

#[test]
fn test_scenario_b_no_pi0_pair() {
    let (mut ecal, hcal) = lambda_clusters();
    // Pull the second photon far away: the pair mass leaves the π⁰ window.
    ecal[1].position = Vector3::new(-1_500.0, 800.0, Z_CALO);

    let output = reconstruction()
        .process(&EventInput::new(vec![ecal, hcal]))
        .unwrap();

    assert_eq!(output.photon_count(), 2);
    assert_eq!(output.pi0_pairs, 0);
    assert!(output.lambda.is_none());
    assert!(output.sigma0s.is_empty());
}

#[test]
fn test_scenario_c_one_sigma0_from_two_leftover_photons() {
    let lambda = reconstruction().process(&scenario_a()).unwrap().lambda.unwrap();
    let p_lambda = lambda.lambda.four_momentum();
    let m_lambda = lambda.lambda.mass;

    // Photon energy along `dir` that closes the Σ⁰ mass with the fitted Λ.
    let dir = (p_lambda.p.normalize() + Vector3::new(0.004, 0.0, 0.0)).normalize();
    let e_gamma =
        (M_SIGMA0 * M_SIGMA0 - m_lambda * m_lambda) / (2.0 * (p_lambda.e - p_lambda.p.dot(&dir)));
    let unrelated_dir = Vector3::new(-0.05, 0.04, 1.0).normalize();

    let (mut ecal, hcal) = lambda_clusters();
    ecal.push(Cluster::new(e_gamma, on_calorimeter(dir), PHOTON_SHAPE));
    ecal.push(Cluster::new(5.0, on_calorimeter(unrelated_dir), PHOTON_SHAPE));

    let output = reconstruction()
        .process(&EventInput::new(vec![ecal, hcal]))
        .unwrap();

    // Neither extra photon forms a π⁰, so the Λ is unchanged.
    assert_eq!(output.photon_count(), 4);
    assert_eq!(output.pi0_pairs, 1);
    let fitted = output.lambda.as_ref().expect("lambda reconstructed");
    assert_eq!(
        fitted.lambda.constituents,
        vec![
            ParticleRef::Candidate(CandidateId(4)),
            ParticleRef::Candidate(CandidateId(0)),
            ParticleRef::Candidate(CandidateId(1)),
        ]
    );
    assert_abs_diff_eq!(fitted.lambda.energy, lambda.lambda.energy, epsilon = 1e-9);

    assert_eq!(output.sigma0s.len(), 1);
    let sigma0 = &output.sigma0s[0];
    assert_eq!(sigma0.sigma0.pdg, 3212);
    assert_abs_diff_eq!(sigma0.sigma0.mass, M_SIGMA0, epsilon = 1e-6);
    assert_eq!(sigma0.sigma0.reference_point, Vector3::zeros());
    assert_eq!(
        sigma0.sigma0.constituents,
        vec![
            ParticleRef::Lambda(LambdaId(0)),
            ParticleRef::Candidate(CandidateId(2))
        ]
    );
    let [lambda_cm, gamma_cm] = &sigma0.daughters_cm;
    assert_eq!(lambda_cm.constituents, vec![ParticleRef::Lambda(LambdaId(0))]);
    assert_eq!(gamma_cm.constituents, vec![ParticleRef::Candidate(CandidateId(2))]);

    let stats: ReconstructionStatistics = std::iter::once(&output).collect();
    assert_eq!(stats.sigma0s, 1);
}

#[test]
fn test_idempotent() {
    let reco = reconstruction();
    let event = scenario_a();
    let first = reco.process(&event).unwrap();
    let second = reco.process(&event).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_selection_invariant_under_cluster_order() {
    let (ecal, hcal) = lambda_clusters();
    let neutron = hcal[0];

    // A secondary-source neutron in the ecal gives a competing triplet with
    // the same kinematics; the primary-source neutron must win regardless of order.
    let mut ecal_mixed = ecal.clone();
    ecal_mixed.push(Cluster::new(neutron.energy, neutron.position, HADRON_SHAPE));
    // An extra soft photon that pairs with nothing.
    ecal_mixed.push(Cluster::new(
        2.0,
        Vector3::new(-1_500.0, 1_500.0, Z_CALO),
        PHOTON_SHAPE,
    ));

    let forward = EventInput::new(vec![ecal_mixed.clone(), hcal.clone()]);
    let mut ecal_reversed = ecal_mixed;
    ecal_reversed.reverse();
    let reversed = EventInput::new(vec![ecal_reversed, hcal]);

    let reco = reconstruction();
    let a = reco.process(&forward).unwrap();
    let b = reco.process(&reversed).unwrap();

    let neutron_of = |output: &EventOutput| -> NeutralCandidate {
        let lambda = output.lambda.as_ref().unwrap();
        let id = lambda.constituent_candidates().next().unwrap();
        output.candidate(id).unwrap().clone()
    };
    assert_eq!(neutron_of(&a).rank, SourceRank::Primary);
    assert_eq!(neutron_of(&a).region, 1);
    assert_eq!(neutron_of(&b).region, 1);

    let la = a.lambda.unwrap().lambda;
    let lb = b.lambda.unwrap().lambda;
    assert_abs_diff_eq!(la.energy, lb.energy, epsilon = 1e-9);
    assert_abs_diff_eq!(la.mass, lb.mass, epsilon = 1e-9);
    assert_abs_diff_eq!(la.momentum.z, lb.momentum.z, epsilon = 1e-9);
}

#[test]
fn test_process_events_matches_sequential() {
    let reco = reconstruction();
    let (ecal, hcal) = lambda_clusters();
    let mut no_pi0 = ecal.clone();
    no_pi0[1].position = Vector3::new(-1_500.0, 800.0, Z_CALO);

    let events = vec![
        scenario_a(),
        EventInput::new(vec![no_pi0, hcal.clone()]),
        EventInput::new(vec![Vec::new(), Vec::new()]),
        EventInput::new(vec![ecal, hcal]),
    ];

    let batch = reco.process_events(&events).unwrap();
    let sequential: Vec<EventOutput> = events.iter().map(|e| reco.process(e).unwrap()).collect();
    assert_eq!(batch, sequential);

    let stats: ReconstructionStatistics = batch.iter().collect();
    assert_eq!(stats.events, 4);
    assert_eq!(stats.lambdas, 2);
    assert_eq!(stats.sigma0s, 0);
    assert_eq!(stats.neutrons, 3);
}

#[test]
fn test_lambda_daughters_have_nominal_masses() {
    let output = reconstruction().process(&scenario_a()).unwrap();
    let lambda = output.lambda.unwrap();
    let masses: Vec<f64> = lambda
        .daughters_cm
        .iter()
        .map(|d: &ReconstructedParticle| d.mass)
        .collect();
    assert_eq!(masses, vec![M_N, 0.0, 0.0]);
}
