//! The beach line: a circular skip list of arcs over an arena.
//!
//! Arcs are addressed by stable `u32` ids and never deallocated during a
//! run; removal only unlinks and marks them dead. A stale circle event can
//! therefore be recognized by a pure index check, with no dangling links.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use super::edges::EdgeEnd;
use super::geometry::{arc_intersection, SweepLine};
use crate::types::{wrap_angle, SpherePoint};

/// Cap on sampled arc heights. Heights are drawn once at creation from
/// independent fair coin flips and never recomputed.
pub(crate) const MAX_SKIPLIST_HEIGHT: usize = 15;

pub(crate) type ArcId = u32;
const NIL: ArcId = ArcId::MAX;

#[derive(Debug, Clone)]
pub(crate) struct Arc {
    pub site: u32,
    pub height: u8,
    pub live: bool,
    /// Pending circle event id, if any. Cleared when the arc's triple
    /// changes; the queue checks this on pop (lazy deletion).
    pub event: Option<u32>,
    /// Boundary endpoint owned by this arc's left adjacency.
    pub left_edge: Option<EdgeEnd>,
    /// Boundary endpoint owned by this arc's right adjacency.
    pub right_edge: Option<EdgeEnd>,
    next: [ArcId; MAX_SKIPLIST_HEIGHT],
    prev: [ArcId; MAX_SKIPLIST_HEIGHT],
}

#[derive(Debug)]
pub(crate) struct BeachLine {
    arcs: Vec<Arc>,
    head: ArcId,
    /// Search entry point; maintained as a live arc of maximal height.
    tallest: ArcId,
    len: usize,
    rng: ChaCha8Rng,
}

impl BeachLine {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            arcs: Vec::new(),
            head: NIL,
            tallest: NIL,
            len: 0,
            rng,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id as usize]
    }

    #[inline]
    pub fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.arcs[id as usize]
    }

    #[inline]
    pub fn next(&self, id: ArcId) -> ArcId {
        self.arcs[id as usize].next[0]
    }

    #[inline]
    pub fn prev(&self, id: ArcId) -> ArcId {
        self.arcs[id as usize].prev[0]
    }

    /// Seed the beach with the first site's arc, spanning all azimuths.
    pub fn insert_first(&mut self, site: u32) -> ArcId {
        debug_assert!(self.is_empty());
        let id = self.alloc(site);
        let height = self.arcs[id as usize].height as usize;
        for level in 0..height {
            self.arcs[id as usize].next[level] = id;
            self.arcs[id as usize].prev[level] = id;
        }
        self.head = id;
        self.len = 1;
        id
    }

    /// Split `at` for an incoming site: `at` is reused as the left copy and
    /// a new arc plus a right copy of `at`'s site are inserted after it.
    ///
    /// The split arc's pending event is invalidated and its right-adjacency
    /// endpoint moves to the right copy. Returns `(new_arc, right_copy)`.
    pub fn split(&mut self, at: ArcId, site: u32) -> (ArcId, ArcId) {
        let new_arc = self.alloc(site);
        self.insert_after(at, new_arc);
        let right_copy = self.alloc(self.arcs[at as usize].site);
        self.insert_after(new_arc, right_copy);

        self.arcs[at as usize].event = None;
        let moved = self.arcs[at as usize].right_edge.take();
        self.arcs[right_copy as usize].right_edge = moved;
        (new_arc, right_copy)
    }

    /// Unlink an arc from every level it participates in and mark it dead.
    pub fn remove(&mut self, id: ArcId) {
        let height = self.arcs[id as usize].height as usize;
        for level in 0..height {
            let p = self.arcs[id as usize].prev[level];
            let n = self.arcs[id as usize].next[level];
            if p != id {
                self.arcs[p as usize].next[level] = n;
                self.arcs[n as usize].prev[level] = p;
            }
        }
        self.arcs[id as usize].live = false;
        self.len -= 1;

        if self.head == id {
            let n = self.arcs[id as usize].next[0];
            self.head = if n == id { NIL } else { n };
        }
        if self.tallest == id {
            self.refresh_tallest();
        }
    }

    /// Find the arc whose azimuth interval contains `phi` at the current
    /// sweep position.
    ///
    /// Walks forward from the tallest arc, descending levels; keys are
    /// boundary azimuths measured from a reference cut, so the walk is a
    /// plain ordered search despite the circular topology. The step count
    /// is bounded so that degenerate inputs with unstable boundaries cannot
    /// hang the sweep.
    pub fn locate(&self, phi: f64, sweep: &SweepLine, sites: &[SpherePoint]) -> ArcId {
        if self.len <= 1 {
            return self.head;
        }

        // Boundary azimuths are circularly ordered along the ring; keyed
        // from the entry arc's own left boundary they form a plain ordered
        // sequence, so the skip levels apply as in a linear list.
        let entry = self.tallest;
        let reference = self.boundary_phi(self.prev(entry), entry, sweep, sites);
        let target = (phi - reference).rem_euclid(TAU);

        let mut node = entry;
        let mut node_key = 0.0f64;
        let mut steps = 0usize;
        let max_steps = 2 * self.len + MAX_SKIPLIST_HEIGHT;
        let top = self.arcs[entry as usize].height as usize;
        for level in (0..top).rev() {
            loop {
                let succ = self.arcs[node as usize].next[level];
                if succ == node {
                    break;
                }
                steps += 1;
                if steps > max_steps {
                    return node;
                }
                let left = self.arcs[succ as usize].prev[0];
                let bound = self.boundary_phi(left, succ, sweep, sites);
                let succ_key = (bound - reference).rem_euclid(TAU);
                if succ_key <= target && succ_key >= node_key {
                    node = succ;
                    node_key = succ_key;
                } else {
                    break;
                }
            }
        }
        node
    }

    /// Azimuth of the boundary between two adjacent arcs at the current
    /// sweep position. Adjacent copies of one site have no physical
    /// boundary and are cut at the site meridian; a degenerate geodesic
    /// solve falls back to the midpoint meridian.
    pub fn boundary_phi(
        &self,
        left: ArcId,
        right: ArcId,
        sweep: &SweepLine,
        sites: &[SpherePoint],
    ) -> f64 {
        let ls = self.site_of(left) as usize;
        let rs = self.site_of(right) as usize;
        if ls == rs {
            return sites[ls].phi;
        }
        arc_intersection(&sites[ls], &sites[rs], sweep)
            .unwrap_or_else(|| midpoint_azimuth(sites[ls].phi, sites[rs].phi))
    }

    /// Visit each live arc once in ring order.
    pub fn ring(&self) -> RingIter<'_> {
        RingIter {
            beach: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    #[inline]
    fn site_of(&self, id: ArcId) -> u32 {
        self.arcs[id as usize].site
    }

    fn alloc(&mut self, site: u32) -> ArcId {
        let mut height = 1u8;
        while (height as usize) < MAX_SKIPLIST_HEIGHT && self.rng.gen_bool(0.5) {
            height += 1;
        }
        let id = self.arcs.len() as ArcId;
        self.arcs.push(Arc {
            site,
            height,
            live: true,
            event: None,
            left_edge: None,
            right_edge: None,
            next: [NIL; MAX_SKIPLIST_HEIGHT],
            prev: [NIL; MAX_SKIPLIST_HEIGHT],
        });
        if self.tallest == NIL || height > self.arcs[self.tallest as usize].height {
            self.tallest = id;
        }
        id
    }

    fn insert_after(&mut self, pos: ArcId, id: ArcId) {
        self.link(0, pos, id);
        self.len += 1;

        let height = self.arcs[id as usize].height as usize;
        for level in 1..height {
            // Nearest predecessor linked at this level, found by walking
            // the level below backwards.
            let mut p = self.arcs[id as usize].prev[level - 1];
            while p != id && (self.arcs[p as usize].height as usize) <= level {
                p = self.arcs[p as usize].prev[level - 1];
            }
            if p == id {
                // Sole arc at this level.
                self.arcs[id as usize].next[level] = id;
                self.arcs[id as usize].prev[level] = id;
            } else {
                self.link(level, p, id);
            }
        }
    }

    fn link(&mut self, level: usize, pos: ArcId, id: ArcId) {
        let succ = self.arcs[pos as usize].next[level];
        self.arcs[pos as usize].next[level] = id;
        self.arcs[id as usize].prev[level] = pos;
        self.arcs[id as usize].next[level] = succ;
        self.arcs[succ as usize].prev[level] = id;
    }

    fn refresh_tallest(&mut self) {
        self.tallest = NIL;
        let mut best = 0u8;
        for (i, arc) in self.arcs.iter().enumerate() {
            if arc.live && arc.height > best {
                best = arc.height;
                self.tallest = i as ArcId;
            }
        }
    }
}

pub(crate) struct RingIter<'a> {
    beach: &'a BeachLine,
    cursor: ArcId,
    remaining: usize,
}

impl Iterator for RingIter<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        if self.remaining == 0 || self.cursor == NIL {
            return None;
        }
        let id = self.cursor;
        self.cursor = self.beach.next(id);
        self.remaining -= 1;
        Some(id)
    }
}

fn midpoint_azimuth(a: f64, b: f64) -> f64 {
    wrap_angle(a + 0.5 * (b - a).rem_euclid(TAU))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn beach() -> BeachLine {
        BeachLine::new(ChaCha8Rng::seed_from_u64(7))
    }

    #[test]
    fn split_builds_a_three_ring() {
        let mut beach = beach();
        let a = beach.insert_first(0);
        let (b, a_copy) = beach.split(a, 1);

        assert_eq!(beach.len(), 3);
        assert_eq!(beach.next(a), b);
        assert_eq!(beach.next(b), a_copy);
        assert_eq!(beach.next(a_copy), a);
        assert_eq!(beach.prev(a), a_copy);
        assert_eq!(beach.arc(a_copy).site, 0);
        assert_eq!(beach.arc(b).site, 1);
    }

    #[test]
    fn heights_are_capped() {
        let mut beach = beach();
        let first = beach.insert_first(0);
        let mut at = first;
        for site in 1..200 {
            let (new_arc, _) = beach.split(at, site);
            at = new_arc;
        }
        for id in beach.ring() {
            let h = beach.arc(id).height as usize;
            assert!(h >= 1 && h <= MAX_SKIPLIST_HEIGHT);
        }
    }

    #[test]
    fn remove_relinks_every_level() {
        let mut beach = beach();
        let a = beach.insert_first(0);
        let (b, a_copy) = beach.split(a, 1);
        beach.remove(a_copy);

        assert_eq!(beach.len(), 2);
        assert_eq!(beach.next(a), b);
        assert_eq!(beach.next(b), a);
        assert!(!beach.arc(a_copy).live);

        // The ring remains consistent at every level that still has arcs.
        for id in beach.ring() {
            let h = beach.arc(id).height as usize;
            for level in 0..h {
                let n = beach.arc(id).next[level];
                assert_eq!(beach.arc(n).prev[level], id);
            }
        }
    }

    #[test]
    fn locate_respects_boundaries() {
        // Two sites on the same parallel; boundaries sit on the bisecting
        // meridians at 1.5 and 1.5 - PI.
        let sites = vec![
            SpherePoint::from_spherical(0.5, 0.0),
            SpherePoint::from_spherical(0.5, 3.0),
        ];
        let sweep = SweepLine::at(1.0);

        let mut beach = beach();
        let a = beach.insert_first(0);
        let (b, a_copy) = beach.split(a, 1);
        beach.remove(a_copy);

        assert_eq!(beach.arc(beach.locate(0.2, &sweep, &sites)).site, 0);
        assert_eq!(beach.arc(beach.locate(1.0, &sweep, &sites)).site, 0);
        assert_eq!(beach.arc(beach.locate(2.8, &sweep, &sites)).site, 1);
        assert_eq!(beach.arc(beach.locate(-3.0, &sweep, &sites)).site, 1);
        assert_eq!(beach.arc(beach.locate(-1.0, &sweep, &sites)).site, 0);
        let _ = b;
    }

    #[test]
    fn split_invalidates_pending_event_and_moves_edge() {
        let mut beach = beach();
        let a = beach.insert_first(0);
        beach.arc_mut(a).event = Some(3);
        beach.arc_mut(a).right_edge = Some(EdgeEnd { edge: 9, slot: 1 });

        let (_, a_copy) = beach.split(a, 1);
        assert_eq!(beach.arc(a).event, None);
        assert_eq!(beach.arc(a).right_edge, None);
        assert_eq!(
            beach.arc(a_copy).right_edge,
            Some(EdgeEnd { edge: 9, slot: 1 })
        );
    }
}
