//! Three-vectors, four-momenta and the beam frame.
//!
//! Natural units throughout: energies and momenta in GeV, lengths in mm.
//! Three-vectors are `nalgebra` column vectors; rotations and boosts follow
//! the usual active-transformation conventions, so `p.boost(b).boost(-b)`
//! is an identity up to rounding.

use nalgebra::Rotation3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cartesian three-vector; `z` is the beam direction.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit vector along `v`, or `None` for a zero-length vector.
#[inline]
#[must_use]
pub fn direction(v: &Vector3) -> Option<Vector3> {
    v.try_normalize(0.0)
}

/// Frame aligned with the incoming beam, reached from the lab by a rotation
/// of `-rot_y` about Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamFrame {
    lab_from_beam: Rotation3<f64>,
}

impl BeamFrame {
    /// Beam frame for a crossing angle `rot_y` (rad) about Y.
    #[must_use]
    pub fn new(rot_y: f64) -> Self {
        Self {
            lab_from_beam: Rotation3::from_axis_angle(&Vector3::y_axis(), rot_y),
        }
    }

    /// Rotation taking beam-frame vectors back to the lab.
    #[inline]
    #[must_use]
    pub fn lab_from_beam(&self) -> &Rotation3<f64> {
        &self.lab_from_beam
    }

    /// Expresses a lab-frame vector in the beam frame.
    #[inline]
    #[must_use]
    pub fn to_beam(&self, v: &Vector3) -> Vector3 {
        self.lab_from_beam.inverse_transform_vector(v)
    }
}

/// Energy-momentum four-vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FourMomentum {
    /// Three-momentum (GeV).
    pub p: Vector3,
    /// Energy (GeV).
    pub e: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its components.
    #[inline]
    #[must_use]
    pub const fn new(p: Vector3, e: f64) -> Self {
        Self { p, e }
    }

    /// Four-momentum with momentum `magnitude` along the unit vector `direction`.
    #[inline]
    #[must_use]
    pub fn along(direction: Vector3, magnitude: f64, e: f64) -> Self {
        Self::new(direction * magnitude, e)
    }

    /// Invariant mass squared, `E² − |p|²`.
    #[inline]
    #[must_use]
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.p.norm_squared()
    }

    /// Invariant mass, or `None` when `E² − |p|² ≤ 0`.
    #[must_use]
    pub fn mass(&self) -> Option<f64> {
        let m2 = self.mass2();
        (m2 > 0.0).then(|| m2.sqrt())
    }

    /// Velocity vector `p / E`.
    #[inline]
    #[must_use]
    pub fn boost_vector(&self) -> Vector3 {
        self.p / self.e
    }

    /// Lorentz-boosts the four-vector by velocity `b` (|b| < 1).
    #[must_use]
    pub fn boost(&self, b: Vector3) -> Self {
        let b2 = b.norm_squared();
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = b.dot(&self.p);
        let gamma2 = if b2 > 0.0 { (gamma - 1.0) / b2 } else { 0.0 };

        Self {
            p: self.p + b * (gamma2 * bp + gamma * self.e),
            e: gamma * (self.e + bp),
        }
    }

    /// Applies a rotation to the spatial part.
    #[must_use]
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self::new(rotation * self.p, self.e)
    }
}

impl std::ops::Add for FourMomentum {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.p + rhs.p, self.e + rhs.e)
    }
}

impl std::ops::AddAssign for FourMomentum {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.p += rhs.p;
        self.e += rhs.e;
    }
}

impl std::iter::Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| acc + p)
    }
}
