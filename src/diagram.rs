//! Spherical Voronoi diagram storage and access.

use crate::SpherePoint;

/// A spherical Voronoi diagram and its Delaunay dual.
///
/// The diagram consists of:
/// - Sites (input points, one cell per site)
/// - Vertices (points equidistant from three or more sites)
/// - Voronoi edges, as pairs of indices into the vertex list
/// - Delaunay edges, as pairs of indices into the site list
///
/// Voronoi and Delaunay edges are index-aligned: `delaunay_edge(i)` names
/// the two cells separated by `voronoi_edge(i)`.
#[derive(Debug, Clone)]
pub struct SphericalVoronoi {
    sites: Vec<SpherePoint>,
    vertices: Vec<SpherePoint>,
    voronoi_edges: Vec<[u32; 2]>,
    delaunay_edges: Vec<[u32; 2]>,
}

impl SphericalVoronoi {
    /// Assemble a diagram from raw parts. Used by the sweep driver.
    pub(crate) fn from_parts(
        sites: Vec<SpherePoint>,
        vertices: Vec<SpherePoint>,
        voronoi_edges: Vec<[u32; 2]>,
        delaunay_edges: Vec<[u32; 2]>,
    ) -> Self {
        debug_assert_eq!(voronoi_edges.len(), delaunay_edges.len());
        Self {
            sites,
            vertices,
            voronoi_edges,
            delaunay_edges,
        }
    }

    /// Number of cells (same as number of sites).
    #[inline]
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of Voronoi vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of Voronoi (equivalently, Delaunay) edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.voronoi_edges.len()
    }

    /// The input sites, in input order.
    #[inline]
    pub fn sites(&self) -> &[SpherePoint] {
        &self.sites
    }

    /// The Voronoi vertices.
    #[inline]
    pub fn vertices(&self) -> &[SpherePoint] {
        &self.vertices
    }

    /// Voronoi edges as `[start, end]` indices into [`Self::vertices`].
    #[inline]
    pub fn voronoi_edges(&self) -> &[[u32; 2]] {
        &self.voronoi_edges
    }

    /// Delaunay edges as index pairs into [`Self::sites`].
    #[inline]
    pub fn delaunay_edges(&self) -> &[[u32; 2]] {
        &self.delaunay_edges
    }

    #[inline]
    pub fn site(&self, index: usize) -> &SpherePoint {
        &self.sites[index]
    }

    #[inline]
    pub fn vertex(&self, index: usize) -> &SpherePoint {
        &self.vertices[index]
    }
}
