use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geometries::vector_ops::approx_equal;

// ======================== TOPOLOGY ENTITIES ========================

/// A point where (at least) three planes meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vector3<f64>,
    pub active: bool,
}

impl Vertex {
    pub fn new(position: Vector3<f64>) -> Self {
        Self {
            position,
            active: true,
        }
    }
}

/// Intersection line of two planes: `point + s * tangent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unit direction of the line
    pub tangent: Vector3<f64>,
    /// Any particular point on the line
    pub point: Vector3<f64>,
    /// Indices of the vertices found on this line, in discovery order
    pub vertices: Vec<usize>,
    pub active: bool,
}

impl Edge {
    pub fn new(tangent: Vector3<f64>, point: Vector3<f64>) -> Self {
        Self {
            tangent,
            point,
            vertices: Vec::new(),
            active: true,
        }
    }

    /// Line parameter of a point, measured along the tangent from `point`.
    pub fn parameter_of(&self, position: &Vector3<f64>) -> f64 {
        self.tangent.dot(&(position - self.point))
    }
}

/// The half-space `{x : x · normal <= offset}` bounded by a Bragg plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal, pointing away from the origin
    pub normal: Vector3<f64>,
    pub offset: f64,
    /// Indices of the edges lying on this plane
    pub edges: Vec<usize>,
    pub active: bool,
}

/// A face of the zone is the plane it lies on.
pub type Face = Plane;

impl Plane {
    pub fn new(normal: Vector3<f64>, offset: f64) -> Self {
        Self {
            normal,
            offset,
            edges: Vec::new(),
            active: true,
        }
    }

    /// `true` if the point lies strictly outside the half-space, beyond tolerance.
    pub fn is_violated_by(&self, point: &Vector3<f64>) -> bool {
        let projection = point.dot(&self.normal);
        projection > self.offset && !approx_equal(projection, self.offset)
    }
}

// ======================== LIVENESS & PRUNING ========================

/// Liveness of a component from its children.
///
/// Active when it has no children at all or at least one active child.
pub fn children_alive(children: &[usize], is_active: impl Fn(usize) -> bool) -> bool {
    children.is_empty() || children.iter().any(|&child| is_active(child))
}

/// Something that holds a reference list of prunable children.
///
/// Implemented by faces (children are edges) and edges (children are vertices) so
/// a single component can be pruned the same way the whole polyhedron is.
pub trait PrunableChildren {
    fn children(&self) -> &[usize];

    fn children_mut(&mut self) -> &mut Vec<usize>;

    /// Liveness per [`children_alive`].
    fn has_live_children(&self, is_active: impl Fn(usize) -> bool) -> bool {
        children_alive(self.children(), is_active)
    }

    /// Drop references to inactive children, keeping the order of the rest.
    fn prune_children(&mut self, is_active: impl Fn(usize) -> bool) {
        self.children_mut().retain(|&child| is_active(child));
    }

    /// Rewrite child references through an old → new index table, dropping unmapped ones.
    fn remap_children(&mut self, mapping: &[Option<usize>]) {
        let remapped: Vec<usize> = self
            .children()
            .iter()
            .filter_map(|&child| mapping.get(child).copied().flatten())
            .collect();
        *self.children_mut() = remapped;
    }
}

impl PrunableChildren for Plane {
    fn children(&self) -> &[usize] {
        &self.edges
    }

    fn children_mut(&mut self) -> &mut Vec<usize> {
        &mut self.edges
    }
}

impl PrunableChildren for Edge {
    fn children(&self) -> &[usize] {
        &self.vertices
    }

    fn children_mut(&mut self) -> &mut Vec<usize> {
        &mut self.vertices
    }
}

/// Zone membership of a point against a set of planes.
///
/// The point belongs to the zone while it strictly violates fewer than
/// `zone_number` of the planes.
pub fn in_zone<'a>(
    point: &Vector3<f64>,
    planes: impl IntoIterator<Item = &'a Plane>,
    zone_number: u32,
) -> bool {
    let mut violations = 0;
    for plane in planes {
        if plane.is_violated_by(point) {
            violations += 1;
            if violations >= zone_number {
                return false;
            }
        }
    }
    true
}

// ======================== POLYHEDRON ========================

/// Boundary representation of an n-th Brillouin zone.
///
/// Faces reference edges and edges reference vertices by index into the
/// polyhedron's own collections. Every entity of a finished polyhedron is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyhedron {
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
    pub vertices: Vec<Vertex>,
    pub zone_number: u32,
}

impl Polyhedron {
    /// Create a new empty polyhedron for the given zone
    pub fn new(zone_number: u32) -> Self {
        Self {
            faces: Vec::new(),
            edges: Vec::new(),
            vertices: Vec::new(),
            zone_number,
        }
    }

    /// Return `true` if `point` belongs to the zone, boundary included.
    pub fn zone_contains(&self, point: &Vector3<f64>) -> bool {
        in_zone(point, &self.faces, self.zone_number)
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn zone_number(&self) -> u32 {
        self.zone_number
    }

    /// Edges of one face, resolved.
    pub fn face_edges<'a>(&'a self, face: &'a Face) -> impl Iterator<Item = &'a Edge> + 'a {
        face.edges.iter().filter_map(move |&index| self.edges.get(index))
    }

    /// Vertices of one edge, resolved.
    pub fn edge_vertices<'a>(&'a self, edge: &'a Edge) -> impl Iterator<Item = &'a Vertex> + 'a {
        edge.vertices
            .iter()
            .filter_map(move |&index| self.vertices.get(index))
    }

    /// `true` when no face survived construction.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
