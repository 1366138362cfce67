// Loop extraction: face edge sets → simple closed polygons
//
// A face of a higher zone is not necessarily one convex polygon. Its edges are
// split into sub-segments at every vertex, sub-segments outside the zone are
// dropped, and the remaining planar graph is walked with an angular sweep to
// recover one closed loop per region.

// ======================== IMPORTS ========================
use std::f64::consts::PI;

use log::trace;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::EPSILON;
use crate::geometries::face_frame::loop_signed_area;
use crate::geometries::vector_ops::points_approx_equal;
use crate::lattice::polyhedron::{Edge, Face, Polyhedron};

// ======================== PUBLIC API ========================

/// All loops of one face, with the plane they lie on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceLoops {
    /// Index of the face in the polyhedron
    pub face: usize,
    pub normal: Vector3<f64>,
    pub offset: f64,
    /// Closed loops; the first point is repeated at the end
    pub loops: Vec<Vec<Vector3<f64>>>,
}

/// Decompose one face into simple closed polygon loops.
///
/// Each loop runs anticlockwise seen from the side the face normal points to, and
/// ends on its starting point. A face without a renderable interior gives an empty
/// list; this never fails.
///
/// Clockwise walks are dropped, and each loop is returned on its own without any
/// nesting information. When a region of the face has a hole, the anticlockwise loop
/// around the hole comes back as a separate loop, so filling every loop also fills
/// the hole.
pub fn extract_loops(face: &Face, polyhedron: &Polyhedron) -> Vec<Vec<Vector3<f64>>> {
    let mut graph = SegmentGraph::default();
    for edge in polyhedron.face_edges(face) {
        graph.add_edge(edge, polyhedron);
    }

    if graph.segments.len() < 3 {
        return Vec::new();
    }

    graph.find_loops(&face.normal)
}

/// Run [`extract_loops`] on every face, skipping faces that give no loop.
pub fn polyhedron_loops(polyhedron: &Polyhedron) -> Vec<FaceLoops> {
    polyhedron
        .faces
        .iter()
        .enumerate()
        .filter_map(|(index, face)| {
            let loops = extract_loops(face, polyhedron);
            (!loops.is_empty()).then(|| FaceLoops {
                face: index,
                normal: face.normal,
                offset: face.offset,
                loops,
            })
        })
        .collect()
}

impl Polyhedron {
    /// Loops of every face that has any, see [`polyhedron_loops`].
    pub fn face_loops(&self) -> Vec<FaceLoops> {
        polyhedron_loops(self)
    }
}

// ======================== SEGMENT GRAPH ========================

#[derive(Debug, Clone)]
struct Endpoint {
    position: Vector3<f64>,
    start_of_segments: Vec<usize>,
    end_of_segments: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Segment {
    a: usize,
    b: usize,
    direction: Vector3<f64>,
}

/// A segment traversed in one of its two orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Arc {
    segment: usize,
    reversed: bool,
}

impl Arc {
    fn orientation(&self) -> usize {
        self.reversed as usize
    }
}

#[derive(Debug, Clone, Default)]
struct SegmentGraph {
    endpoints: Vec<Endpoint>,
    segments: Vec<Segment>,
}

impl SegmentGraph {
    /// Split an edge at its vertices and keep the sub-segments inside the zone.
    fn add_edge(&mut self, edge: &Edge, polyhedron: &Polyhedron) {
        let mut points: Vec<(f64, Vector3<f64>)> = polyhedron
            .edge_vertices(edge)
            .map(|vertex| (edge.parameter_of(&vertex.position), vertex.position))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.dedup_by(|later, earlier| points_approx_equal(&later.1, &earlier.1));

        for pair in points.windows(2) {
            let midpoint = (pair[0].1 + pair[1].1) * 0.5;
            if polyhedron.zone_contains(&midpoint) {
                self.add_segment(pair[0].1, pair[1].1);
            }
        }
    }

    fn add_endpoint(&mut self, position: Vector3<f64>) -> usize {
        if let Some(index) = self
            .endpoints
            .iter()
            .position(|endpoint| points_approx_equal(&endpoint.position, &position))
        {
            return index;
        }
        self.endpoints.push(Endpoint {
            position,
            start_of_segments: Vec::new(),
            end_of_segments: Vec::new(),
        });
        self.endpoints.len() - 1
    }

    /// Add an undirected segment unless the same endpoint pair is already joined.
    fn add_segment(&mut self, start: Vector3<f64>, end: Vector3<f64>) {
        let a = self.add_endpoint(start);
        let b = self.add_endpoint(end);
        if a == b {
            return;
        }

        let joined = self.endpoints[a]
            .start_of_segments
            .iter()
            .any(|&s| self.segments[s].b == b)
            || self.endpoints[a]
                .end_of_segments
                .iter()
                .any(|&s| self.segments[s].a == b);
        if joined {
            return;
        }

        let index = self.segments.len();
        self.segments.push(Segment {
            a,
            b,
            direction: self.endpoints[b].position - self.endpoints[a].position,
        });
        self.endpoints[a].start_of_segments.push(index);
        self.endpoints[b].end_of_segments.push(index);
    }

    fn tail(&self, arc: Arc) -> usize {
        let segment = &self.segments[arc.segment];
        if arc.reversed {
            segment.b
        } else {
            segment.a
        }
    }

    fn head(&self, arc: Arc) -> usize {
        let segment = &self.segments[arc.segment];
        if arc.reversed {
            segment.a
        } else {
            segment.b
        }
    }

    fn direction(&self, arc: Arc) -> Vector3<f64> {
        let direction = self.segments[arc.segment].direction;
        if arc.reversed {
            -direction
        } else {
            direction
        }
    }

    // ======================== TRAVERSAL ========================

    /// Walk every unused arc and collect the closed anticlockwise loops.
    fn find_loops(&self, normal: &Vector3<f64>) -> Vec<Vec<Vector3<f64>>> {
        let mut consumed = vec![[false; 2]; self.segments.len()];
        let mut loops = Vec::new();

        for segment in 0..self.segments.len() {
            for reversed in [false, true] {
                let start = Arc { segment, reversed };
                if consumed[segment][start.orientation()] {
                    continue;
                }
                let Some(arcs) = self.walk(start, normal, &consumed) else {
                    continue;
                };
                for arc in &arcs {
                    consumed[arc.segment][arc.orientation()] = true;
                }

                let mut points = vec![self.endpoints[self.tail(start)].position];
                points.extend(arcs.iter().map(|&arc| self.endpoints[self.head(arc)].position));
                // Clockwise walks trace the outside of a region, not a region
                if points.len() > 1 && loop_signed_area(&points, normal) > 0.0 {
                    loops.push(points);
                }
            }
        }
        loops
    }

    /// Follow the sharpest anticlockwise turn from `start` until back at its tail.
    ///
    /// Gives up when no unused arc leaves the current endpoint or when the walk would
    /// run along a segment it has already used.
    fn walk(&self, start: Arc, normal: &Vector3<f64>, consumed: &[[bool; 2]]) -> Option<Vec<Arc>> {
        let origin = self.tail(start);
        let mut used = vec![false; self.segments.len()];
        used[start.segment] = true;

        let mut arcs = vec![start];
        let mut current = start;
        loop {
            let vertex = self.head(current);
            if vertex == origin {
                return Some(arcs);
            }

            let incoming = self.direction(current);
            let endpoint = &self.endpoints[vertex];
            let candidates = endpoint
                .start_of_segments
                .iter()
                .map(|&segment| Arc { segment, reversed: false })
                .chain(
                    endpoint
                        .end_of_segments
                        .iter()
                        .map(|&segment| Arc { segment, reversed: true }),
                )
                .filter(|arc| !consumed[arc.segment][arc.orientation()]);

            let next = candidates.min_by(|x, y| {
                let angle_x = turning_angle(&incoming, &self.direction(*x), normal);
                let angle_y = turning_angle(&incoming, &self.direction(*y), normal);
                angle_x.total_cmp(&angle_y)
            });
            let Some(next) = next else {
                trace!("Loop walk from segment {} hit a dead end", start.segment);
                return None;
            };
            if used[next.segment] {
                trace!("Loop walk from segment {} crossed itself", start.segment);
                return None;
            }

            used[next.segment] = true;
            arcs.push(next);
            current = next;
        }
    }
}

// ======================== HELPER FUNCTIONS ========================

/// Angle swept anticlockwise (about `normal`) from `outgoing` to the reversed `incoming`.
///
/// A sharp left turn is close to 0, going straight is π, a right turn is above π.
/// Doubling back along the incoming direction counts as a full turn so that it is
/// the last choice.
fn turning_angle(incoming: &Vector3<f64>, outgoing: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    let back = -incoming;
    let sine = normal.dot(&outgoing.cross(&back));
    let cosine = outgoing.dot(&back);
    let angle = sine.atan2(cosine);
    if angle < EPSILON {
        angle + 2.0 * PI
    } else {
        angle
    }
}
