//! Geodesic predicates for the sweep: beach-arc intersections, beach-point
//! evaluation, and the circumcircle solver.

use crate::types::{wrap_angle, SpherePoint};

/// Cross-product magnitude below which a site triple is treated as
/// degenerate (duplicate or near-coincident sites). Degenerate solves
/// report `None` instead of propagating NaN into the queue.
pub(crate) const DEGENERATE_CROSS_EPS: f64 = 1e-12;

/// Magnitude below which the boundary equation has no usable direction.
const BOUNDARY_EPS: f64 = 1e-15;

/// Below this, a site sits on the sweep line and its arc collapses to a
/// point.
const TANGENT_EPS: f64 = 1e-12;

/// Sweep position with its trigonometric values, computed once per event.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepLine {
    pub theta: f64,
    pub sin: f64,
    pub cos: f64,
}

impl SweepLine {
    pub fn at(theta: f64) -> Self {
        Self {
            theta,
            sin: theta.sin(),
            cos: theta.cos(),
        }
    }
}

/// Azimuth where the beach arcs of `left` and `right` intersect at the
/// current sweep position, with `left` preceding `right` in beach order.
///
/// Every beach point of a site `s` satisfies `d(q, s) = sweep - theta(q)`;
/// equating the loci of the two sites reduces to
/// `a cos(phi) + b sin(phi) = e`, whose branch closer to `left` is the
/// shared boundary. Returns `None` when the system degenerates (duplicate
/// sites, or no real solution near the poles).
pub(crate) fn arc_intersection(
    left: &SpherePoint,
    right: &SpherePoint,
    sweep: &SweepLine,
) -> Option<f64> {
    let (cos_l, sin_l) = (left.theta.cos(), left.theta.sin());
    let (cos_r, sin_r) = (right.theta.cos(), right.theta.sin());

    let weight_l = sweep.cos - cos_r;
    let weight_r = sweep.cos - cos_l;
    let a = weight_l * sin_l * left.phi.cos() - weight_r * sin_r * right.phi.cos();
    let b = weight_l * sin_l * left.phi.sin() - weight_r * sin_r * right.phi.sin();
    let e = (cos_l - cos_r) * sweep.sin;

    let magnitude = a.hypot(b);
    if magnitude < BOUNDARY_EPS || !magnitude.is_finite() {
        return None;
    }
    let ratio = e / magnitude;
    if ratio.abs() > 1.0 + BOUNDARY_EPS {
        return None;
    }

    let phi = b.atan2(a) - ratio.clamp(-1.0, 1.0).acos();
    Some(wrap_angle(phi))
}

/// The beach point of `site`'s arc at azimuth `phi`.
///
/// Solves `cot(theta)` from the equal-distance locus; a site lying on the
/// sweep line has a point arc at the sweep position itself.
pub(crate) fn beach_point(site: &SpherePoint, phi: f64, sweep: &SweepLine) -> SpherePoint {
    let denom = site.theta.cos() - sweep.cos;
    if denom.abs() < TANGENT_EPS {
        return SpherePoint::from_spherical(sweep.theta, phi);
    }
    let numer = sweep.sin - site.theta.sin() * (phi - site.phi).cos();
    SpherePoint::from_spherical(denom.atan2(numer), phi)
}

/// Circumcircle of a beach-ordered site triple `(left, mid, right)`.
///
/// Returns the circumcenter and the activation colatitude — the sweep
/// position at which the circle through the three sites becomes tangent to
/// the sweep line. The center is the intersection of the two perpendicular
/// bisector planes on the side from which the triple winds clockwise; the
/// opposite center belongs to the mirrored beach ordering.
pub(crate) fn circumcircle(
    left: &SpherePoint,
    mid: &SpherePoint,
    right: &SpherePoint,
) -> Option<(SpherePoint, f64)> {
    let a = left.cartesian();
    let b = mid.cartesian();
    let c = right.cartesian();

    let normal = (a - b).cross(c - b);
    let len = normal.length();
    if len < DEGENERATE_CROSS_EPS || !len.is_finite() {
        return None;
    }

    let center = SpherePoint::from_cartesian(normal / len);
    let radius = center.angle_to(left);
    let activation = center.theta + radius;
    if !activation.is_finite() {
        return None;
    }
    Some((center, activation))
}
