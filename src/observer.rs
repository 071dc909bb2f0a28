//! Observation hooks for the sweep.
//!
//! The driver is decoupled from any visualization technology: callers
//! inject a capability with an `on_event` notification and a
//! `should_continue` poll. Both run synchronously on the sweep thread
//! between events, with read-only access to engine state.

use crate::sweep::edges::EdgeBuilder;
use crate::sweep::geometry::{beach_point, SweepLine};
use crate::types::SpherePoint;

/// Read-only view of the sweep handed to observers after each processed
/// event.
#[derive(Clone, Copy)]
pub struct SweepSnapshot<'a> {
    sites: &'a [SpherePoint],
    vertices: &'a [SpherePoint],
    edges: &'a EdgeBuilder,
    sweep_theta: f64,
    current_site: u32,
}

impl<'a> SweepSnapshot<'a> {
    pub(crate) fn new(
        sites: &'a [SpherePoint],
        vertices: &'a [SpherePoint],
        edges: &'a EdgeBuilder,
        sweep_theta: f64,
        current_site: u32,
    ) -> Self {
        Self {
            sites,
            vertices,
            edges,
            sweep_theta,
            current_site,
        }
    }

    /// All input sites (the cell list), in input order.
    #[inline]
    pub fn sites(&self) -> &'a [SpherePoint] {
        self.sites
    }

    /// Voronoi vertices discovered so far.
    #[inline]
    pub fn vertices(&self) -> &'a [SpherePoint] {
        self.vertices
    }

    /// Finished Voronoi edges so far, as vertex-index pairs.
    pub fn voronoi_edges(&self) -> impl Iterator<Item = [u32; 2]> + 'a {
        self.edges.voronoi_edges()
    }

    /// Bordering site pairs of the finished edges, index-aligned with
    /// [`Self::voronoi_edges`].
    pub fn delaunay_edges(&self) -> impl Iterator<Item = [u32; 2]> + 'a {
        self.edges.delaunay_edges()
    }

    /// Current sweep colatitude.
    #[inline]
    pub fn sweep_theta(&self) -> f64 {
        self.sweep_theta
    }

    /// Site of the arc the event acted on: the inserted arc for a site
    /// event, the squeezed-out arc for a circle event.
    #[inline]
    pub fn current_site(&self) -> u32 {
        self.current_site
    }

    /// Sample a site's beach arc at an azimuth, at the current sweep
    /// position. This is the same locus evaluation the beach line orders
    /// itself by, exposed for drawing the front.
    pub fn beach_point(&self, site: u32, phi: f64) -> SpherePoint {
        let sweep = SweepLine::at(self.sweep_theta);
        beach_point(&self.sites[site as usize], phi, &sweep)
    }
}

/// Caller-injected observation capability.
///
/// `on_event` fires after every processed event; skipped (stale) circle
/// events do not notify. `should_continue` is polled once per processed
/// event: blocking inside it pauses the sweep, returning `false` cancels
/// it — the driver then drops unfinished boundaries instead of fabricating
/// endpoints.
pub trait SweepObserver {
    fn on_event(&mut self, snapshot: &SweepSnapshot<'_>) {
        let _ = snapshot;
    }

    fn should_continue(&mut self) -> bool {
        true
    }
}

/// The default observer: never looks, never pauses, never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}
