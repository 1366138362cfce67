// Incremental construction of the n-th Brillouin zone
//
// The builder keeps every plane, edge and vertex it ever creates in arenas and
// refers to them by index. The three ordered collections (faces, edges, vertices)
// list the entities still alive; pruning compacts those lists, while the
// per-parent reference lists keep pointing at dead children so that liveness
// keeps seeing them until the final pass. Entities only ever go from active to
// inactive.

// ======================== IMPORTS ========================
use log::{debug, trace};
use nalgebra::Vector3;

use crate::geometries::vector_ops::points_approx_equal;
use crate::lattice::bragg_planes::{check_zone_number, sorted_bragg_planes};
use crate::lattice::intersections::{edge_intersection, plane_intersection};
use crate::lattice::polyhedron::{
    in_zone, Edge, Plane, Polyhedron, PrunableChildren, Vertex,
};
use crate::lattice::reciprocal::{check_independent, reciprocal_lattice};
use crate::Result;

// ======================== PUBLIC ENTRY POINTS ========================

/// Build the n-th Brillouin zone from three reciprocal lattice vectors.
///
/// Parameters:
/// - `reciprocal_vectors`: primitive vectors of the reciprocal lattice
/// - `zone_number`: 1, 2 or 3
///
/// Fails with `UnsupportedZoneNumber` outside `1..=3` and with `DegenerateLattice`
/// when the vectors are linearly dependent. Dependence is judged relative to the
/// vector lengths, so very large or very small cells are accepted; the geometric
/// tolerance further down stays absolute, though, so cells far from unit scale lose
/// precision in vertex welding and zone tests. The result depends only on the input,
/// so callers may cache it by value.
pub fn build_zone(reciprocal_vectors: &[Vector3<f64>; 3], zone_number: u32) -> Result<Polyhedron> {
    check_zone_number(zone_number)?;
    check_independent(reciprocal_vectors)?;

    let planes = sorted_bragg_planes(reciprocal_vectors, zone_number)?;
    debug!(
        "Building zone {} from {} Bragg planes",
        zone_number,
        planes.len()
    );
    build_zone_from_planes(planes, zone_number)
}

/// Build the n-th Brillouin zone of a real-space lattice (reciprocal transform first).
pub fn nth_brillouin_zone(direct_vectors: &[Vector3<f64>; 3], zone_number: u32) -> Result<Polyhedron> {
    let reciprocal_vectors = reciprocal_lattice(direct_vectors)?;
    build_zone(&reciprocal_vectors, zone_number)
}

/// Fold an explicit plane stream into a zone, in the order given.
///
/// The stream must be sorted nearest first (see
/// [`sort_by_distance`](crate::lattice::bragg_planes::sort_by_distance)); any other
/// order gives an unspecified, generally wrong, polyhedron.
pub fn build_zone_from_planes(
    planes: impl IntoIterator<Item = Plane>,
    zone_number: u32,
) -> Result<Polyhedron> {
    let mut builder = ZoneBuilder::new(zone_number)?;
    for plane in planes {
        builder.insert_plane(plane);
    }
    Ok(builder.finish())
}

// ======================== BUILDER ========================

// Arena slot shared by every crossing that is outside the zone when it is found
const RETIRED_VERTEX: usize = 0;

#[derive(Debug, Clone)]
pub struct ZoneBuilder {
    zone_number: u32,
    // Arenas, never shrink
    planes: Vec<Plane>,
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    // Ordered collections of live entities
    faces: Vec<usize>,
    live_edges: Vec<usize>,
    live_vertices: Vec<usize>,
}

impl ZoneBuilder {
    pub fn new(zone_number: u32) -> Result<Self> {
        check_zone_number(zone_number)?;
        Ok(Self {
            zone_number,
            planes: Vec::new(),
            edges: Vec::new(),
            vertices: vec![Vertex {
                position: Vector3::zeros(),
                active: false,
            }],
            faces: Vec::new(),
            live_edges: Vec::new(),
            live_vertices: Vec::new(),
        })
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.live_vertices.len()
    }

    /// Fold one plane into the construction.
    ///
    /// The plane is cut against every live face; each resulting edge is crossed
    /// with all edges that face has ever carried, then the plane becomes a face and
    /// liveness is recomputed and pruned. A crossing is tested against the zone
    /// (live faces plus the new plane) as soon as it is found; this is the same face
    /// set the vertex pass after the insertion uses.
    pub fn insert_plane(&mut self, plane: Plane) {
        let new_face = self.planes.len();
        self.planes.push(Plane::new(plane.normal, plane.offset));
        let zone_faces: Vec<usize> = self.faces.iter().copied().chain([new_face]).collect();

        for face_index in self.faces.clone() {
            let Some(mut edge) = plane_intersection(&self.planes[face_index], &self.planes[new_face]) else {
                continue;
            };
            let edge_index = self.edges.len();

            for k in 0..self.planes[face_index].edges.len() {
                let other_index = self.planes[face_index].edges[k];
                let Some(position) = edge_intersection(&edge, &self.edges[other_index]) else {
                    continue;
                };
                // Crossings already outside the zone are only recorded as dead children
                let vertex_index = if self.within_zone(&position, &zone_faces) {
                    self.vertices.push(Vertex::new(position));
                    self.live_vertices.push(self.vertices.len() - 1);
                    self.vertices.len() - 1
                } else {
                    RETIRED_VERTEX
                };
                edge.vertices.push(vertex_index);
                if self.edges[other_index].active {
                    self.edges[other_index].vertices.push(vertex_index);
                }
            }

            self.edges.push(edge);
            self.planes[face_index].edges.push(edge_index);
            self.planes[new_face].edges.push(edge_index);
            self.live_edges.push(edge_index);
        }
        self.faces.push(new_face);

        self.deactivate_external_vertices();
        self.prune();
        trace!(
            "Inserted plane {}: {} faces, {} edges, {} vertices live",
            new_face,
            self.faces.len(),
            self.live_edges.len(),
            self.live_vertices.len()
        );
    }

    /// Finish construction: final pruning, minimum topology, index remapping.
    pub fn finish(mut self) -> Polyhedron {
        self.prune();
        self.prune_reference_lists();

        // Minimum topology, repeated until nothing else drops out
        loop {
            let before = (self.faces.len(), self.live_edges.len());
            self.deactivate_singular_components();
            self.prune();
            self.prune_reference_lists();
            if (self.faces.len(), self.live_edges.len()) == before {
                break;
            }
        }

        let polyhedron = self.into_polyhedron();
        debug!(
            "Zone {} finished: {} faces, {} edges, {} vertices",
            polyhedron.zone_number,
            polyhedron.faces.len(),
            polyhedron.edges.len(),
            polyhedron.vertices.len()
        );
        polyhedron
    }

    // ======================== LIVENESS ========================

    fn within_zone(&self, position: &Vector3<f64>, faces: &[usize]) -> bool {
        in_zone(position, faces.iter().map(|&f| &self.planes[f]), self.zone_number)
    }

    /// A vertex dies once it strictly violates `zone_number` or more live faces.
    fn deactivate_external_vertices(&mut self) {
        let planes = &self.planes;
        let faces = &self.faces;
        for &vertex_index in &self.live_vertices {
            let vertex = &mut self.vertices[vertex_index];
            if !in_zone(&vertex.position, faces.iter().map(|&f| &planes[f]), self.zone_number) {
                vertex.active = false;
            }
        }
    }

    /// Two-phase prune: mark edges then faces from their children, then compact.
    fn prune(&mut self) {
        let vertices = &self.vertices;
        for &edge_index in &self.live_edges {
            let edge = &mut self.edges[edge_index];
            if !edge.has_live_children(|v| vertices[v].active) {
                edge.active = false;
            }
        }

        let edges = &self.edges;
        for &face_index in &self.faces {
            let face = &mut self.planes[face_index];
            if !face.has_live_children(|e| edges[e].active) {
                face.active = false;
            }
        }

        let planes = &self.planes;
        self.faces.retain(|&f| planes[f].active);
        let edges = &self.edges;
        self.live_edges.retain(|&e| edges[e].active);
        let vertices = &self.vertices;
        self.live_vertices.retain(|&v| vertices[v].active);
    }

    /// Prune every live face and edge on its own, dropping dead child references.
    fn prune_reference_lists(&mut self) {
        let edges = &self.edges;
        for &face_index in &self.faces {
            self.planes[face_index].prune_children(|e| edges[e].active);
        }
        let vertices = &self.vertices;
        for &edge_index in &self.live_edges {
            self.edges[edge_index].prune_children(|v| vertices[v].active);
        }
    }

    /// Faces need three edges and edges two distinct vertices to bound anything.
    ///
    /// An edge also needs both of the planes it lies on to still be faces.
    fn deactivate_singular_components(&mut self) {
        let mut face_references = vec![0usize; self.edges.len()];
        for &face_index in &self.faces {
            for &edge_index in &self.planes[face_index].edges {
                face_references[edge_index] += 1;
            }
        }

        for &face_index in &self.faces {
            if self.planes[face_index].edges.len() < 3 {
                self.planes[face_index].active = false;
            }
        }

        let vertices = &self.vertices;
        for &edge_index in &self.live_edges {
            let edge = &mut self.edges[edge_index];
            let distinct = distinct_positions(edge.vertices.iter().map(|&v| &vertices[v].position));
            if distinct < 2 || face_references[edge_index] < 2 {
                edge.active = false;
            }
        }
    }

    // ======================== OUTPUT ========================

    /// Compact the arenas into a dense polyhedron.
    ///
    /// Builds old → new index tables for faces, edges and vertices and rewrites
    /// every reference list through them. Vertices that coincide within tolerance
    /// are welded into one.
    fn into_polyhedron(self) -> Polyhedron {
        let mut polyhedron = Polyhedron::new(self.zone_number);

        let mut edge_map: Vec<Option<usize>> = vec![None; self.edges.len()];
        for (new_index, &old_index) in self.live_edges.iter().enumerate() {
            edge_map[old_index] = Some(new_index);
        }

        let mut vertex_map: Vec<Option<usize>> = vec![None; self.vertices.len()];
        for &edge_index in &self.live_edges {
            for &old_index in &self.edges[edge_index].vertices {
                if vertex_map[old_index].is_some() {
                    continue;
                }
                let position = self.vertices[old_index].position;
                let welded = polyhedron
                    .vertices
                    .iter()
                    .position(|existing| points_approx_equal(&existing.position, &position));
                vertex_map[old_index] = Some(welded.unwrap_or_else(|| {
                    polyhedron.vertices.push(Vertex::new(position));
                    polyhedron.vertices.len() - 1
                }));
            }
        }

        for &edge_index in &self.live_edges {
            let mut edge = self.edges[edge_index].clone();
            edge.remap_children(&vertex_map);
            let mut seen = Vec::with_capacity(edge.vertices.len());
            edge.vertices.retain(|v| {
                let fresh = !seen.contains(v);
                seen.push(*v);
                fresh
            });
            polyhedron.edges.push(edge);
        }

        for &face_index in &self.faces {
            let mut face = self.planes[face_index].clone();
            face.remap_children(&edge_map);
            polyhedron.faces.push(face);
        }

        polyhedron
    }
}

// ======================== HELPER FUNCTIONS ========================

// Number of positions that differ beyond tolerance
fn distinct_positions<'a>(positions: impl Iterator<Item = &'a Vector3<f64>>) -> usize {
    let mut distinct: Vec<&Vector3<f64>> = Vec::new();
    for position in positions {
        if !distinct.iter().any(|known| points_approx_equal(known, position)) {
            distinct.push(position);
        }
    }
    distinct.len()
}
