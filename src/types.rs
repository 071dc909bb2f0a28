//! Core point types for the spherical sweep.

use std::cmp::Ordering;
use std::sync::OnceLock;

use glam::DVec3;

/// A point on the unit sphere, stored in sweep coordinates.
///
/// `theta` is the colatitude (angle from the north pole, the sweep
/// direction) and `phi` the azimuth around the pole axis in `(-PI, PI]`.
/// The Cartesian form is computed on first use and cached; points built
/// from Cartesian input carry both representations from the start.
#[derive(Debug, Clone)]
pub struct SpherePoint {
    pub theta: f64,
    pub phi: f64,
    cartesian: OnceLock<DVec3>,
}

impl SpherePoint {
    /// Create from sweep coordinates. The Cartesian form is derived lazily.
    pub fn from_spherical(theta: f64, phi: f64) -> Self {
        Self {
            theta,
            phi,
            cartesian: OnceLock::new(),
        }
    }

    /// Create from a unit vector.
    ///
    /// The azimuth of a pole (x = y = 0) is fixed at 0 rather than left to
    /// `atan2(0, 0)`.
    pub fn from_cartesian(v: DVec3) -> Self {
        let theta = v.z.clamp(-1.0, 1.0).acos();
        let phi = if v.x == 0.0 && v.y == 0.0 {
            0.0
        } else {
            v.y.atan2(v.x)
        };
        let cartesian = OnceLock::new();
        let _ = cartesian.set(v);
        Self {
            theta,
            phi,
            cartesian,
        }
    }

    /// The point as a unit vector, converting and caching if needed.
    pub fn cartesian(&self) -> DVec3 {
        *self.cartesian.get_or_init(|| {
            let sin_theta = self.theta.sin();
            DVec3::new(
                sin_theta * self.phi.cos(),
                sin_theta * self.phi.sin(),
                self.theta.cos(),
            )
        })
    }

    /// Great-circle angle to another point.
    pub fn angle_to(&self, other: &SpherePoint) -> f64 {
        self.cartesian().dot(other.cartesian()).clamp(-1.0, 1.0).acos()
    }

    /// Sweep ordering: colatitude first, azimuth second.
    ///
    /// Site events sorted by this ordering are consumed in non-decreasing
    /// sweep position.
    pub fn sweep_cmp(&self, other: &SpherePoint) -> Ordering {
        self.theta
            .total_cmp(&other.theta)
            .then(self.phi.total_cmp(&other.phi))
    }
}

impl PartialEq for SpherePoint {
    fn eq(&self, other: &Self) -> bool {
        self.theta == other.theta && self.phi == other.phi
    }
}

/// Trait for types usable as input points.
///
/// Allows zero-copy input from plain arrays, tuples, or math-library
/// vectors.
pub trait UnitVec3Like {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> f64;
}

impl UnitVec3Like for [f64; 3] {
    #[inline]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f64 {
        self[1]
    }
    #[inline]
    fn z(&self) -> f64 {
        self[2]
    }
}

impl UnitVec3Like for (f64, f64, f64) {
    #[inline]
    fn x(&self) -> f64 {
        self.0
    }
    #[inline]
    fn y(&self) -> f64 {
        self.1
    }
    #[inline]
    fn z(&self) -> f64 {
        self.2
    }
}

impl UnitVec3Like for DVec3 {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }
    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
    #[inline]
    fn z(&self) -> f64 {
        self.z
    }
}

/// Normalize a vector, failing safe on zero length.
///
/// Returns the zeroed vector and `true` when the input has no direction;
/// the caller records the diagnostic instead of propagating NaN.
pub(crate) fn normalize_or_zero(v: DVec3) -> (DVec3, bool) {
    let len = v.length();
    if len == 0.0 {
        (DVec3::ZERO, true)
    } else {
        (v / len, false)
    }
}

/// Wrap an angle into `(-PI, PI]`.
#[inline]
pub(crate) fn wrap_angle(x: f64) -> f64 {
    let wrapped = x.rem_euclid(std::f64::consts::TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - std::f64::consts::TAU
    } else {
        wrapped
    }
}
