//! Spherical Voronoi diagrams via a sweep line over colatitude.
//!
//! This crate computes the Voronoi diagram and dual Delaunay graph of a
//! point set on the unit sphere with a Fortune-style sweep: the front is a
//! circle of constant colatitude advancing from the north pole, the beach
//! line is a circular skip list of geodesic arcs, and Voronoi vertices
//! surface as circle events.
//!
//! # Example
//!
//! ```
//! use s2_sweepline::compute;
//!
//! // Vertices of a regular tetrahedron inscribed in the unit sphere.
//! let n = 3.0_f64.sqrt();
//! let points = vec![
//!     [1.0 / n, 1.0 / n, 1.0 / n],
//!     [1.0 / n, -1.0 / n, -1.0 / n],
//!     [-1.0 / n, 1.0 / n, -1.0 / n],
//!     [-1.0 / n, -1.0 / n, 1.0 / n],
//! ];
//!
//! let output = compute(&points).expect("computation should succeed");
//! assert_eq!(output.diagram.num_sites(), 4);
//! assert_eq!(output.diagram.num_edges(), 6);
//! assert!(output.diagnostics.is_clean());
//! ```

mod diagram;
mod error;
mod observer;
mod types;

pub(crate) mod sweep;

use glam::DVec3;

pub use diagram::SphericalVoronoi;
pub use error::VoronoiError;
pub use observer::{NoopObserver, SweepObserver, SweepSnapshot};
pub use types::{SpherePoint, UnitVec3Like};

/// Output from Voronoi computation: the diagram and run diagnostics.
#[derive(Debug, Clone)]
pub struct VoronoiOutput {
    /// The computed diagram.
    pub diagram: SphericalVoronoi,
    /// Diagnostic information about the computation.
    pub diagnostics: SweepDiagnostics,
}

/// Diagnostic counters from a sweep.
///
/// Degenerate inputs (duplicate or antipodal sites, near-collinear
/// triples) do not abort the sweep; they surface here instead. A clean run
/// of well-separated sites reports all zeros.
#[derive(Debug, Clone, Default)]
pub struct SweepDiagnostics {
    /// Circumcircle solves rejected as ill-conditioned; the corresponding
    /// circle events were discarded.
    pub degenerate_circle_events: usize,
    /// Boundaries still missing an endpoint at termination, dropped from
    /// the diagram. Non-zero for degenerate configurations such as a
    /// single antipodal pair.
    pub dropped_open_edges: usize,
    /// Input points with zero norm, zeroed instead of normalized.
    pub zero_norm_inputs: usize,
    /// The run was cancelled through the observer; the diagram holds only
    /// the edges finished before cancellation.
    pub cancelled: bool,
}

impl SweepDiagnostics {
    /// Returns true if no issues were detected.
    pub fn is_clean(&self) -> bool {
        self.degenerate_circle_events == 0
            && self.dropped_open_edges == 0
            && self.zero_norm_inputs == 0
            && !self.cancelled
    }
}

/// Worker count selector.
///
/// Only the single-threaded sweep is implemented: splitting the sphere
/// between sweeps requires a beach-line merge along the partition boundary
/// whose protocol is unresolved, so `Two` and `Four` currently run the
/// same single sweep and exist for interface compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadCount {
    #[default]
    One,
    Two,
    Four,
}

/// Configuration for Voronoi computation.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Worker count selector; see [`ThreadCount`].
    pub threads: ThreadCount,
    /// Seed for the skip-list height stream. A fixed seed and input order
    /// make the output byte-identical across runs.
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threads: ThreadCount::One,
            seed: 0,
        }
    }
}

/// Compute a spherical Voronoi diagram with default settings.
pub fn compute<P: UnitVec3Like>(points: &[P]) -> Result<VoronoiOutput, VoronoiError> {
    compute_with(points, SweepConfig::default())
}

/// Compute a spherical Voronoi diagram with explicit configuration.
pub fn compute_with<P: UnitVec3Like>(
    points: &[P],
    config: SweepConfig,
) -> Result<VoronoiOutput, VoronoiError> {
    compute_observed(points, config, &mut NoopObserver)
}

/// Compute with an injected observer, notified after each processed event.
pub fn compute_observed<P: UnitVec3Like, O: SweepObserver>(
    points: &[P],
    config: SweepConfig,
    observer: &mut O,
) -> Result<VoronoiOutput, VoronoiError> {
    if points.is_empty() {
        return Err(VoronoiError::NoSites);
    }

    let mut diagnostics = SweepDiagnostics::default();
    let sites: Vec<SpherePoint> = points
        .iter()
        .map(|p| {
            let (v, zeroed) = types::normalize_or_zero(DVec3::new(p.x(), p.y(), p.z()));
            if zeroed {
                diagnostics.zero_norm_inputs += 1;
            }
            SpherePoint::from_cartesian(v)
        })
        .collect();

    // All thread counts run the single sweep: the hemisphere partition
    // needs a boundary merge protocol that is not implemented.
    let _ = config.threads;
    let outcome = sweep::run(&sites, config.seed, diagnostics, observer);

    Ok(VoronoiOutput {
        diagram: SphericalVoronoi::from_parts(
            sites,
            outcome.vertices,
            outcome.voronoi_edges,
            outcome.delaunay_edges,
        ),
        diagnostics: outcome.diagnostics,
    })
}
