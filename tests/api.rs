//! Public API integration tests for s2-sweepline.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use s2_sweepline::{
    compute, compute_observed, compute_with, SweepConfig, SweepObserver, SweepSnapshot,
    VoronoiError,
};
use std::f64::consts::{PI, TAU};

/// Generate random points uniformly distributed on the unit sphere.
fn random_sphere_points(n: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = rng.gen_range(-1.0..1.0);
            let theta: f64 = rng.gen_range(0.0..TAU);
            let r = (1.0 - z * z).sqrt();
            [r * theta.cos(), r * theta.sin(), z]
        })
        .collect()
}

/// Generate Fibonacci sphere points (more uniform than random).
fn fibonacci_sphere_points(n: usize, jitter: f64, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let golden_angle = PI * (3.0 - 5.0f64.sqrt());

    (0..n)
        .map(|i| {
            let y = 1.0 - (2.0 * i as f64 + 1.0) / n as f64;
            let radius = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f64;

            let mut x = radius * theta.cos();
            let mut z = radius * theta.sin();

            if jitter > 0.0 {
                x += rng.gen_range(-jitter..jitter);
                z += rng.gen_range(-jitter..jitter);
            }

            let len = (x * x + y * y + z * z).sqrt();
            [x / len, y / len, z / len]
        })
        .collect()
}

/// Vertices of a regular tetrahedron inscribed in the unit sphere.
fn tetrahedron_points() -> Vec<[f64; 3]> {
    let n = 3.0f64.sqrt();
    vec![
        [1.0 / n, 1.0 / n, 1.0 / n],
        [1.0 / n, -1.0 / n, -1.0 / n],
        [-1.0 / n, 1.0 / n, -1.0 / n],
        [-1.0 / n, -1.0 / n, 1.0 / n],
    ]
}

fn sorted_pair(e: [u32; 2]) -> (u32, u32) {
    if e[0] <= e[1] {
        (e[0], e[1])
    } else {
        (e[1], e[0])
    }
}

#[test]
fn test_tetrahedron_topology() {
    let output = compute(&tetrahedron_points()).expect("tetrahedron should work");
    let diagram = &output.diagram;

    assert_eq!(diagram.num_sites(), 4);
    assert_eq!(diagram.num_vertices(), 4);
    assert_eq!(diagram.num_edges(), 6);
    assert!(output.diagnostics.is_clean());

    // The Delaunay graph of the tetrahedron is K4.
    let mut pairs: Vec<_> = diagram
        .delaunay_edges()
        .iter()
        .map(|&e| sorted_pair(e))
        .collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
}

#[test]
fn test_euler_relation() {
    for (n, seed) in [(16usize, 5u64), (48, 42), (96, 1234)] {
        let points = fibonacci_sphere_points(n, 0.1, seed);
        let output = compute(&points).expect("computation should succeed");
        assert!(output.diagnostics.is_clean(), "n={n} not clean");

        let v = output.diagram.num_vertices() as i64;
        let e = output.diagram.num_edges() as i64;
        let f = output.diagram.num_sites() as i64;
        assert_eq!(v - e + f, 2, "Euler violated: V={v} E={e} F={f}");

        // General position: every vertex has degree 3.
        assert_eq!(v, 2 * n as i64 - 4);
        assert_eq!(e, 3 * n as i64 - 6);
    }
}

#[test]
fn test_edge_endpoints_equidistant() {
    let points = random_sphere_points(32, 9001);
    let output = compute(&points).expect("computation should succeed");
    let diagram = &output.diagram;

    for (voronoi, delaunay) in diagram
        .voronoi_edges()
        .iter()
        .zip(diagram.delaunay_edges().iter())
    {
        let site_a = diagram.site(delaunay[0] as usize);
        let site_b = diagram.site(delaunay[1] as usize);
        for &vi in voronoi {
            let vertex = diagram.vertex(vi as usize);
            let da = vertex.angle_to(site_a);
            let db = vertex.angle_to(site_b);
            assert!(
                (da - db).abs() < 1e-9,
                "edge endpoint not equidistant: {da} vs {db}"
            );
            // No other site is closer than the bordering pair.
            for site in diagram.sites() {
                assert!(vertex.angle_to(site) > da - 1e-9);
            }
        }
    }
}

#[test]
fn test_voronoi_delaunay_bijection() {
    let points = fibonacci_sphere_points(40, 0.1, 7);
    let output = compute(&points).expect("computation should succeed");
    let diagram = &output.diagram;

    assert_eq!(
        diagram.voronoi_edges().len(),
        diagram.delaunay_edges().len()
    );

    // Each pair of adjacent cells shares exactly one Voronoi edge.
    let mut pairs: Vec<_> = diagram
        .delaunay_edges()
        .iter()
        .map(|&e| sorted_pair(e))
        .collect();
    pairs.sort_unstable();
    let before = pairs.len();
    pairs.dedup();
    assert_eq!(pairs.len(), before, "duplicate Delaunay edge");
    for (a, b) in pairs {
        assert_ne!(a, b, "self-loop Delaunay edge");
    }
}

#[test]
fn test_vertex_indices_valid() {
    let points = random_sphere_points(64, 54321);
    let output = compute(&points).expect("computation should succeed");
    let num_vertices = output.diagram.num_vertices();

    for edge in output.diagram.voronoi_edges() {
        for &vi in edge {
            assert!((vi as usize) < num_vertices);
        }
    }
}

#[test]
fn test_determinism_across_runs() {
    let points = random_sphere_points(50, 77777);
    let config = SweepConfig {
        seed: 99,
        ..SweepConfig::default()
    };

    let first = compute_with(&points, config.clone()).unwrap();
    let second = compute_with(&points, config).unwrap();

    assert_eq!(first.diagram.voronoi_edges(), second.diagram.voronoi_edges());
    assert_eq!(
        first.diagram.delaunay_edges(),
        second.diagram.delaunay_edges()
    );
    assert_eq!(first.diagram.num_vertices(), second.diagram.num_vertices());
    for (a, b) in first
        .diagram
        .vertices()
        .iter()
        .zip(second.diagram.vertices().iter())
    {
        assert_eq!(a, b);
    }
}

#[test]
fn test_antipodal_pair_is_flagged() {
    let points = vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];
    let output = compute(&points).expect("degenerate input must not error");

    assert_eq!(output.diagram.num_sites(), 2);
    assert_eq!(output.diagram.num_edges(), 0);
    assert!(!output.diagnostics.is_clean());
    assert!(output.diagnostics.dropped_open_edges > 0);
    for vertex in output.diagram.vertices() {
        assert!(vertex.theta.is_finite() && vertex.phi.is_finite());
    }
}

#[test]
fn test_site_at_pole() {
    let mut points = random_sphere_points(20, 31337);
    points.push([0.0, 0.0, 1.0]);
    let output = compute(&points).expect("pole site should work");

    assert_eq!(output.diagram.num_sites(), 21);
    for vertex in output.diagram.vertices() {
        assert!(vertex.theta.is_finite() && vertex.phi.is_finite());
        let c = vertex.cartesian();
        assert!(c.x.is_finite() && c.y.is_finite() && c.z.is_finite());
    }
}

#[test]
fn test_sites_on_a_parallel() {
    // Three sites on one circle of latitude: both poles are vertices and
    // the three boundaries are meridian arcs joining them.
    let theta = 0.9f64;
    let points: Vec<[f64; 3]> = [-2.0f64, 0.3, 2.5]
        .iter()
        .map(|&phi| {
            [
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ]
        })
        .collect();

    let output = compute(&points).expect("computation should succeed");
    assert_eq!(output.diagram.num_vertices(), 2);
    assert_eq!(output.diagram.num_edges(), 3);
    assert!(output.diagnostics.is_clean());

    let mut poles: Vec<f64> = output
        .diagram
        .vertices()
        .iter()
        .map(|v| v.cartesian().z)
        .collect();
    poles.sort_by(f64::total_cmp);
    assert!((poles[0] + 1.0).abs() < 1e-9, "expected the south pole");
    assert!((poles[1] - 1.0).abs() < 1e-9, "expected the north pole");
}

#[test]
fn test_three_general_sites() {
    let points = vec![
        [0.2, -0.5, 0.9],
        [0.8, 0.1, 0.6],
        [-0.3, 0.7, 0.7],
    ];
    let output = compute(&points).expect("computation should succeed");

    assert_eq!(output.diagram.num_vertices(), 2);
    assert_eq!(output.diagram.num_edges(), 3);
    assert!(output.diagnostics.is_clean());
}

#[test]
fn test_small_inputs() {
    let empty: Vec<[f64; 3]> = Vec::new();
    assert!(matches!(compute(&empty), Err(VoronoiError::NoSites)));

    let one = vec![[0.0, 0.0, 1.0]];
    let output = compute(&one).unwrap();
    assert_eq!(output.diagram.num_sites(), 1);
    assert_eq!(output.diagram.num_edges(), 0);
    assert!(output.diagnostics.is_clean());

    // Two sites share one closed boundary with no vertices on it; that
    // cannot be expressed as a vertex pair and is reported, not invented.
    let two = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let output = compute(&two).unwrap();
    assert_eq!(output.diagram.num_edges(), 0);
    assert_eq!(output.diagnostics.dropped_open_edges, 1);
}

struct CountingObserver {
    events: usize,
    last_theta: f64,
    monotone: bool,
}

impl CountingObserver {
    fn new() -> Self {
        Self {
            events: 0,
            last_theta: 0.0,
            monotone: true,
        }
    }
}

impl SweepObserver for CountingObserver {
    fn on_event(&mut self, snapshot: &SweepSnapshot<'_>) {
        if snapshot.sweep_theta() < self.last_theta - 1e-6 {
            self.monotone = false;
        }
        self.last_theta = snapshot.sweep_theta();
        self.events += 1;
    }
}

#[test]
fn test_observer_sees_monotone_sweep() {
    let points = random_sphere_points(30, 424242);
    let mut observer = CountingObserver::new();
    let output =
        compute_observed(&points, SweepConfig::default(), &mut observer).unwrap();

    // Every site event fires plus one circle event per vertex.
    assert_eq!(
        observer.events,
        30 + output.diagram.num_vertices()
    );
    assert!(observer.monotone, "sweep colatitude went backwards");
    assert!(!output.diagnostics.cancelled);
}

struct CancellingObserver {
    remaining: usize,
}

impl SweepObserver for CancellingObserver {
    fn should_continue(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[test]
fn test_cancellation_drops_open_edges() {
    let points = random_sphere_points(40, 2024);
    let mut observer = CancellingObserver { remaining: 25 };
    let output =
        compute_observed(&points, SweepConfig::default(), &mut observer).unwrap();

    assert!(output.diagnostics.cancelled);
    // Whatever survived is fully finished and indexable.
    let num_vertices = output.diagram.num_vertices();
    for edge in output.diagram.voronoi_edges() {
        for &vi in edge {
            assert!((vi as usize) < num_vertices);
        }
    }
}

#[test]
fn test_input_types() {
    let base = random_sphere_points(24, 88888);

    let tuples: Vec<(f64, f64, f64)> = base.iter().map(|p| (p[0], p[1], p[2])).collect();
    let output = compute(&tuples).expect("tuple input should work");
    assert_eq!(output.diagram.num_sites(), 24);

    let vecs: Vec<glam::DVec3> = base
        .iter()
        .map(|p| glam::DVec3::new(p[0], p[1], p[2]))
        .collect();
    let output = compute(&vecs).expect("DVec3 input should work");
    assert_eq!(output.diagram.num_sites(), 24);
}
