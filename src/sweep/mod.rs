//! The sweep driver: advances the front over colatitude, dispatching site
//! and circle events until the queue drains or the caller cancels.

pub(crate) mod beach;
pub(crate) mod edges;
pub(crate) mod events;
pub(crate) mod geometry;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::observer::{SweepObserver, SweepSnapshot};
use crate::types::SpherePoint;
use crate::SweepDiagnostics;

use beach::{ArcId, BeachLine};
use edges::{EdgeBuilder, EdgeEnd};
use events::{Event, EventQueue};
use geometry::{circumcircle, SweepLine};

/// Slack on the reachability test for circle events, absorbing roundoff on
/// activation colatitudes of vertices coincident with the sweep line.
const REACHABLE_SLACK: f64 = 1e-9;

pub(crate) struct SweepOutcome {
    pub vertices: Vec<SpherePoint>,
    pub voronoi_edges: Vec<[u32; 2]>,
    pub delaunay_edges: Vec<[u32; 2]>,
    pub diagnostics: SweepDiagnostics,
}

struct SweepState {
    beach: BeachLine,
    queue: EventQueue,
    edges: EdgeBuilder,
    vertices: Vec<SpherePoint>,
    diagnostics: SweepDiagnostics,
}

/// Run the sweep over normalized sites. `diagnostics` carries counters
/// accumulated during input conversion.
pub(crate) fn run<O: SweepObserver + ?Sized>(
    sites: &[SpherePoint],
    seed: u64,
    diagnostics: SweepDiagnostics,
    observer: &mut O,
) -> SweepOutcome {
    let mut state = SweepState {
        beach: BeachLine::new(ChaCha8Rng::seed_from_u64(seed)),
        queue: EventQueue::new(sites),
        edges: EdgeBuilder::new(),
        vertices: Vec::new(),
        diagnostics,
    };

    while let Some(event) = state.queue.pop(sites) {
        let (sweep_theta, current_site) = match event {
            Event::Site(site) => {
                state.handle_site(site, sites);
                (sites[site as usize].theta, site)
            }
            Event::Circle(id) => {
                if !state.is_valid(id) {
                    // Stale event: its arc was split or removed. Routine.
                    continue;
                }
                let arc = state.queue.circle(id).arc;
                let site = state.beach.arc(arc).site;
                let theta = state.queue.circle(id).theta;
                state.handle_circle(id, sites);
                (theta, site)
            }
        };

        let snapshot = SweepSnapshot::new(
            sites,
            &state.vertices,
            &state.edges,
            sweep_theta,
            current_site,
        );
        observer.on_event(&snapshot);
        if !observer.should_continue() {
            state.diagnostics.cancelled = true;
            state.edges.drop_unfinished();
            return state.into_outcome();
        }
    }

    // The queue is drained; surviving adjacencies trace already-started
    // boundaries from both ends and are merged pairwise.
    let open: Vec<EdgeEnd> = state
        .beach
        .ring()
        .filter_map(|id| state.beach.arc(id).right_edge)
        .collect();
    state.edges.reconcile_open(&open);
    state.into_outcome()
}

impl SweepState {
    fn handle_site(&mut self, site: u32, sites: &[SpherePoint]) {
        if self.beach.is_empty() {
            self.beach.insert_first(site);
            return;
        }

        let point = &sites[site as usize];
        let sweep = SweepLine::at(point.theta);
        let at = self.beach.locate(point.phi, &sweep, sites);
        let old_site = self.beach.arc(at).site;

        let (new_arc, right_copy) = self.beach.split(at, site);

        // The two new adjacencies border the same pair of cells and grow
        // the same boundary from opposite ends: one record, two slots.
        let (left_end, right_end) = self.edges.open_pair(old_site, site);
        self.beach.arc_mut(at).right_edge = Some(left_end);
        self.beach.arc_mut(new_arc).left_edge = Some(left_end);
        self.beach.arc_mut(new_arc).right_edge = Some(right_end);
        self.beach.arc_mut(right_copy).left_edge = Some(right_end);

        self.check_circle(at, &sweep, sites);
        self.check_circle(right_copy, &sweep, sites);
    }

    fn handle_circle(&mut self, id: u32, sites: &[SpherePoint]) {
        let event = self.queue.circle(id).clone();
        let mid = event.arc;
        let left = self.beach.prev(mid);
        let right = self.beach.next(mid);
        let sweep = SweepLine::at(event.theta);

        let vertex = self.vertices.len() as u32;
        self.vertices.push(event.center);

        if let Some(end) = self.beach.arc(mid).left_edge {
            self.edges.finish(end, vertex);
        }
        if let Some(end) = self.beach.arc(mid).right_edge {
            self.edges.finish(end, vertex);
        }

        self.beach.arc_mut(left).event = None;
        self.beach.arc_mut(right).event = None;
        self.beach.remove(mid);

        if left != right {
            let left_site = self.beach.arc(left).site;
            let right_site = self.beach.arc(right).site;
            if left_site != right_site {
                let end = self.edges.open_at(left_site, right_site, vertex);
                self.beach.arc_mut(left).right_edge = Some(end);
                self.beach.arc_mut(right).left_edge = Some(end);
            } else {
                self.beach.arc_mut(left).right_edge = None;
                self.beach.arc_mut(right).left_edge = None;
            }
            self.check_circle(left, &sweep, sites);
            self.check_circle(right, &sweep, sites);
        }
    }

    /// Consider a circle event for the triple centered on `arc`.
    ///
    /// Triples with repeated sites have no circumcircle; degenerate solves
    /// are counted and discarded rather than queued (the event would carry
    /// garbage coordinates). Only circles the sweep can still reach are
    /// queued.
    fn check_circle(&mut self, arc: ArcId, sweep: &SweepLine, sites: &[SpherePoint]) {
        let left = self.beach.prev(arc);
        let right = self.beach.next(arc);
        if left == arc || right == arc || left == right {
            return;
        }
        let sl = self.beach.arc(left).site;
        let sm = self.beach.arc(arc).site;
        let sr = self.beach.arc(right).site;
        if sl == sm || sm == sr || sl == sr {
            return;
        }

        match circumcircle(
            &sites[sl as usize],
            &sites[sm as usize],
            &sites[sr as usize],
        ) {
            None => self.diagnostics.degenerate_circle_events += 1,
            Some((center, activation)) => {
                if activation + REACHABLE_SLACK >= sweep.theta {
                    debug_assert!(self.beach.arc(arc).event.is_none());
                    let id = self.queue.push_circle(arc, center, activation);
                    self.beach.arc_mut(arc).event = Some(id);
                }
            }
        }
    }

    fn is_valid(&self, id: u32) -> bool {
        let arc = self.queue.circle(id).arc;
        self.beach.arc(arc).live && self.beach.arc(arc).event == Some(id)
    }

    fn into_outcome(mut self) -> SweepOutcome {
        self.diagnostics.dropped_open_edges = self.edges.dropped_open;
        SweepOutcome {
            voronoi_edges: self.edges.voronoi_edges().collect(),
            delaunay_edges: self.edges.delaunay_edges().collect(),
            vertices: self.vertices,
            diagnostics: self.diagnostics,
        }
    }
}
