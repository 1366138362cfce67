// Lattice module: reciprocal space, Bragg planes and the n-th Brillouin zone engine
// This module provides zone construction by incremental half-space intersection and face loop extraction

// ======================== MODULE DECLARATIONS ========================
pub mod bragg_planes;
pub mod intersections;
pub mod loops;
pub mod polyhedron;
pub mod reciprocal;
pub mod zone_builder;

mod _tests_loops;

// ======================== RECIPROCAL SPACE ========================
pub use reciprocal::{
    check_independent,         // fn(vectors: &[Vector3<f64>; 3]) -> Result<f64> - scale-free independence check, returns V
    fermi_sphere_radius,       // fn(reciprocal_vectors: &[Vector3<f64>; 3], valence: f64) -> f64 - free-electron Fermi sphere radius
    normalized_triple_product, // fn(vectors: &[Vector3<f64>; 3]) -> f64 - V / (|a0| |a1| |a2|)
    reciprocal_lattice,        // fn(direct_vectors: &[Vector3<f64>; 3]) -> Result<[Vector3<f64>; 3]> - b_i = (a_j × a_k) / V, no 2π
    triple_product,            // fn(vectors: &[Vector3<f64>; 3]) -> f64 - signed cell volume a0 · (a1 × a2)
};

// ======================== BRAGG PLANES ========================
pub use bragg_planes::{
    bragg_plane,                      // fn(point: &Vector3<f64>) -> Result<Plane> - perpendicular bisector of origin and point
    check_zone_number,                // fn(zone_number: u32) -> Result<()> - rejects 0 and numbers above MAX_ZONE_NUMBER
    generate_lattice_points_by_shell, // fn(basis: &[Vector3<f64>; 3], max_shell: u32) -> Vec<Vector3<f64>> - all non-zero index combinations
    neighbour_shell,                  // fn(zone_number: u32) -> u32 - index range searched for a zone
    sort_by_distance,                 // fn(planes: &mut [Plane]) - stable nearest-first order
    sorted_bragg_planes,              // fn(reciprocal_vectors: &[Vector3<f64>; 3], zone_number: u32) -> Result<Vec<Plane>> - ordered plane stream
};

// ======================== TOPOLOGY ========================
pub use polyhedron::{
    children_alive,   // fn(children: &[usize], is_active: impl Fn(usize) -> bool) -> bool - liveness from children
    in_zone,          // fn(point, planes, zone_number: u32) -> bool - fewer than zone_number strict violations
    Edge,             // struct - line of two planes with its vertex references
    Face,             // type - a face is the plane it lies on
    Plane,            // struct - Bragg half-space with its edge references
    Polyhedron,       // struct - finished zone: dense faces, edges, vertices
    PrunableChildren, // trait - shared pruning of faces and edges
    Vertex,           // struct - crossing point of three or more planes
};
// Polyhedron impl methods:
//   new(zone_number: u32) -> Self                               - creates empty polyhedron
//   zone_contains(&self, point: &Vector3<f64>) -> bool          - zone membership against the surviving faces
//   face_edges(&self, face: &Face) -> impl Iterator<Item = &Edge>     - resolves a face's edge indices
//   edge_vertices(&self, edge: &Edge) -> impl Iterator<Item = &Vertex> - resolves an edge's vertex indices
//   face_loops(&self) -> Vec<FaceLoops>                          - loops of every face
//   is_empty(&self) -> bool                                      - no faces survived

// ======================== INTERSECTIONS ========================
pub use intersections::{
    edge_intersection,  // fn(edge_a: &Edge, edge_b: &Edge) -> Option<Vector3<f64>> - crossing point, None for skew/parallel
    plane_intersection, // fn(plane_a: &Plane, plane_b: &Plane) -> Option<Edge> - intersection line, None for parallel
};

// ======================== ZONE CONSTRUCTION ========================
pub use zone_builder::{
    build_zone,             // fn(reciprocal_vectors: &[Vector3<f64>; 3], zone_number: u32) -> Result<Polyhedron> - full pipeline
    build_zone_from_planes, // fn(planes: impl IntoIterator<Item = Plane>, zone_number: u32) -> Result<Polyhedron> - folds a sorted plane stream
    nth_brillouin_zone,     // fn(direct_vectors: &[Vector3<f64>; 3], zone_number: u32) -> Result<Polyhedron> - reciprocal transform then build
    ZoneBuilder,            // struct - incremental construction state
};
// ZoneBuilder impl methods:
//   new(zone_number: u32) -> Result<Self>     - empty construction
//   insert_plane(&mut self, plane: Plane)     - folds one plane in, then prunes
//   finish(self) -> Polyhedron                - final pruning and compaction
//   face_count / edge_count / vertex_count    - live entity counts

// ======================== FACE LOOPS ========================
pub use loops::{
    extract_loops,    // fn(face: &Face, polyhedron: &Polyhedron) -> Vec<Vec<Vector3<f64>>> - closed anticlockwise loops of a face
    polyhedron_loops, // fn(polyhedron: &Polyhedron) -> Vec<FaceLoops> - loops of every face
    FaceLoops,        // struct - loops of one face with its plane
};
