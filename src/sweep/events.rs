//! The event queue: presorted site events merged with a circle-event heap.
//!
//! Circle events are stored by value and never removed before their turn;
//! staleness is detected at pop time by checking the owning arc (lazy
//! deletion). The total order is (colatitude, azimuth, insertion sequence),
//! which makes the sweep deterministic for a fixed input and seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::beach::ArcId;
use crate::types::SpherePoint;

/// A candidate Voronoi vertex: the arc to squeeze out, the circumcenter,
/// and the sweep colatitude at which the circumcircle touches the front.
#[derive(Debug, Clone)]
pub(crate) struct CircleEvent {
    pub arc: ArcId,
    pub center: SpherePoint,
    pub theta: f64,
}

#[derive(Debug)]
pub(crate) enum Event {
    Site(u32),
    Circle(u32),
}

#[derive(Debug)]
struct HeapKey {
    theta: f64,
    phi: f64,
    seq: u64,
    event: u32,
}

impl PartialEq for HeapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapKey {}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and we pop minima.
        other
            .theta
            .total_cmp(&self.theta)
            .then(other.phi.total_cmp(&self.phi))
            .then(other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub(crate) struct EventQueue {
    /// Site indices in sweep order; immutable once built.
    site_order: Vec<u32>,
    cursor: usize,
    heap: BinaryHeap<HeapKey>,
    events: Vec<CircleEvent>,
    next_seq: u64,
}

impl EventQueue {
    /// Build the queue with all site events, presorted by (theta, phi).
    pub fn new(sites: &[SpherePoint]) -> Self {
        let mut site_order: Vec<u32> = (0..sites.len() as u32).collect();
        site_order.sort_by(|&i, &j| sites[i as usize].sweep_cmp(&sites[j as usize]));
        let next_seq = site_order.len() as u64;
        Self {
            site_order,
            cursor: 0,
            heap: BinaryHeap::new(),
            events: Vec::new(),
            next_seq,
        }
    }

    /// Register a circle event; returns its id for the owning arc.
    pub fn push_circle(&mut self, arc: ArcId, center: SpherePoint, theta: f64) -> u32 {
        let id = self.events.len() as u32;
        self.heap.push(HeapKey {
            theta,
            phi: center.phi,
            seq: self.next_seq,
            event: id,
        });
        self.next_seq += 1;
        self.events.push(CircleEvent { arc, center, theta });
        id
    }

    #[inline]
    pub fn circle(&self, id: u32) -> &CircleEvent {
        &self.events[id as usize]
    }

    /// Pop the next event in (theta, phi, sequence) order across both
    /// streams. Site events win ties, having the lower sequence numbers.
    pub fn pop(&mut self, sites: &[SpherePoint]) -> Option<Event> {
        let site = self.site_order.get(self.cursor).copied();
        let circle = self.heap.peek();

        let take_site = match (site, circle) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(s), Some(key)) => {
                let p = &sites[s as usize];
                p.theta
                    .total_cmp(&key.theta)
                    .then(p.phi.total_cmp(&key.phi))
                    .then((self.cursor as u64).cmp(&key.seq))
                    != Ordering::Greater
            }
        };

        if take_site {
            self.cursor += 1;
            Some(Event::Site(site.unwrap()))
        } else {
            let key = self.heap.pop().unwrap();
            Some(Event::Circle(key.event))
        }
    }
}
