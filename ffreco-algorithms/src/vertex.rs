//! Λ decay vertex recovery from the π⁰ opening angle.
//!
//! Only the calorimeter impact points and the daughter energies are known.
//! Moving the assumed vertex along the parent direction changes the photon
//! opening angle; the solver bisects the longitudinal vertex fraction `f`
//! until the measured angle matches the one expected from the photon
//! energies. The map is iterated exactly `iterations` times, with no
//! convergence test, so results are reproducible bit for bit.
//!
//! All quantities are handled in the beam frame, obtained by rotating lab
//! coordinates by `-rot_y` about Y.

use ffreco_core::{direction, BeamFrame, FourMomentum, NeutralCandidate, Vector3};
use log::trace;
use nalgebra::Rotation3;

/// Kinematics at the fitted vertex, in the beam frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSolution {
    /// Decay vertex (mm).
    pub vertex: Vector3,
    /// Sum of the daughters from the final iteration.
    pub lambda: FourMomentum,
    /// Neutron from the final iteration.
    pub neutron: FourMomentum,
    /// First photon from the final iteration.
    pub gamma1: FourMomentum,
    /// Second photon from the final iteration.
    pub gamma2: FourMomentum,
}

impl VertexSolution {
    /// Same solution with every vector rotated.
    #[must_use]
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self {
            vertex: rotation * self.vertex,
            lambda: self.lambda.rotated(rotation),
            neutron: self.neutron.rotated(rotation),
            gamma1: self.gamma1.rotated(rotation),
            gamma2: self.gamma2.rotated(rotation),
        }
    }
}

/// Fixed-count vertex bisection.
#[derive(Clone, Debug)]
pub struct VertexIterativeSolver {
    iterations: usize,
    z_max: f64,
    frame: BeamFrame,
    neutron_mass: f64,
    pi0_mass: f64,
}

/// A daughter with fixed energy and momentum magnitude.
#[derive(Clone, Copy)]
struct Daughter {
    hit: Vector3,
    energy: f64,
    momentum: f64,
}

impl Daughter {
    fn at(&self, vertex: Vector3) -> Option<FourMomentum> {
        let dir = direction(&(self.hit - vertex))?;
        Some(FourMomentum::along(dir, self.momentum, self.energy))
    }
}

impl VertexIterativeSolver {
    /// Create a solver.
    ///
    /// `z_max` is the longitudinal extent (mm) that scales the vertex fraction.
    #[must_use]
    pub fn new(iterations: usize, z_max: f64, rot_y: f64, neutron_mass: f64, pi0_mass: f64) -> Self {
        Self {
            iterations,
            z_max,
            frame: BeamFrame::new(rot_y),
            neutron_mass,
            pi0_mass,
        }
    }

    /// Expected γγ opening angle for a π⁰ decaying into photons of energies `e1` and `e2`.
    ///
    /// `None` when no opening angle can produce the π⁰ mass.
    #[must_use]
    pub fn expected_opening_angle(&self, e1: f64, e2: f64) -> Option<f64> {
        let product = e1 * e2;
        if product <= 0.0 {
            return None;
        }
        let s = self.pi0_mass / (2.0 * product.sqrt());
        (s <= 1.0).then(|| 2.0 * s.asin())
    }

    /// Recovers the vertex for a (neutron, γ, γ) triplet.
    ///
    /// Returns `None` for degenerate input: neutron energy below its mass,
    /// photon energies that cannot form a π⁰, a hit coinciding with the
    /// vertex, or a non-positive parent longitudinal momentum.
    #[must_use]
    pub fn solve(
        &self,
        neutron: &NeutralCandidate,
        gamma1: &NeutralCandidate,
        gamma2: &NeutralCandidate,
    ) -> Option<VertexSolution> {
        let p2 = neutron.energy * neutron.energy - self.neutron_mass * self.neutron_mass;
        if p2 < 0.0 {
            return None;
        }
        let theta_expected = self.expected_opening_angle(gamma1.energy, gamma2.energy)?;

        let daughters = [
            Daughter {
                hit: self.frame.to_beam(&neutron.reference_point),
                energy: neutron.energy,
                momentum: p2.sqrt(),
            },
            photon(gamma1, &self.frame),
            photon(gamma2, &self.frame),
        ];

        let mut vertex = Vector3::zeros();
        let mut f = 0.0;
        let mut df = 0.5;
        let mut last = None;

        for i in 0..self.iterations {
            let n = daughters[0].at(vertex)?;
            let g1 = daughters[1].at(vertex)?;
            let g2 = daughters[2].at(vertex)?;
            let lambda = n + g1 + g2;

            let theta_open = g1.p.angle(&g2.p);
            if theta_open > theta_expected {
                f -= df;
            } else {
                f += df;
            }

            if lambda.p.z <= 0.0 {
                return None;
            }
            vertex = lambda.p * (f * self.z_max / lambda.p.z);
            df /= 2.0;

            trace!(
                "iteration {i}: theta={theta_open:.6} expected={theta_expected:.6} f={f:.6} vz={:.1}",
                vertex.z
            );
            last = Some((lambda, n, g1, g2));
        }

        let (lambda, neutron, gamma1, gamma2) = last?;
        Some(VertexSolution {
            vertex,
            lambda,
            neutron,
            gamma1,
            gamma2,
        })
    }
}

fn photon(candidate: &NeutralCandidate, frame: &BeamFrame) -> Daughter {
    Daughter {
        hit: frame.to_beam(&candidate.reference_point),
        energy: candidate.energy,
        momentum: candidate.energy,
    }
}
