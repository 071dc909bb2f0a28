//! Error type for Voronoi computation.

use std::fmt;

/// Errors from spherical Voronoi computation.
///
/// Degenerate geometry never errors; it is reported through
/// [`SweepDiagnostics`](crate::SweepDiagnostics) so that partial results
/// remain available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoronoiError {
    /// The input point set was empty.
    NoSites,
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::NoSites => write!(f, "input point set is empty"),
        }
    }
}

impl std::error::Error for VoronoiError {}
