// Geometries module: vector primitives and plane-local frames used by the zone engine
// This module provides the checked slice arithmetic at the API boundary and 2D face coordinates

// ======================== MODULE DECLARATIONS ========================
pub mod face_frame;
pub mod vector_ops;


// ======================== VECTOR PRIMITIVES ========================
pub use vector_ops::{
    add,                   // fn(a: &[f64], b: &[f64]) -> Result<Vec<f64>> - component sum, DimensionMismatch on length mismatch
    approx_equal,          // fn(x: f64, y: f64) -> bool - |x - y| < EPSILON
    cross,                 // fn(a: &[f64], b: &[f64]) -> Result<Vec<f64>> - 3D cross product, InvalidDimension otherwise
    distance,              // fn(a: &[f64], b: &[f64]) -> Result<f64> - Euclidean distance
    dot,                   // fn(a: &[f64], b: &[f64]) -> Result<f64> - scalar product, DimensionMismatch on length mismatch
    lattice_from_rows,     // fn(rows: &[Vec<f64>]) -> Result<[Vector3<f64>; 3]> - validates three 3-component rows
    points_approx_equal,   // fn(a: &Vector3<f64>, b: &Vector3<f64>) -> bool - tolerance equality for static vectors
    scale,                 // fn(v: &[f64], s: f64) -> Vec<f64> - scalar multiple
    to_vector3,            // fn(v: &[f64]) -> Result<Vector3<f64>> - checked conversion
    vectors_approx_equal,  // fn(a: &[f64], b: &[f64]) -> Result<bool> - component-wise tolerance equality
};

// ======================== FACE FRAMES ========================
pub use face_frame::{
    FaceFrame,        // struct - orthonormal (u, w, normal) frame of a face plane
    loop_signed_area, // fn(points: &[Vector3<f64>], normal: &Vector3<f64>) -> f64 - positive for anticlockwise loops
};
// FaceFrame impl methods:
//   new(normal: Vector3<f64>) -> Self                          - builds the in-plane basis
//   project(&self, point: &Vector3<f64>) -> Vector2<f64>       - plane coordinates of a point
//   lift(&self, coords: &Vector2<f64>, offset: f64) -> Vector3<f64> - back onto the plane x·n = offset
//   transform(&self, offset: f64) -> Matrix4<f64>              - homogeneous placement matrix
//   project_loop(&self, points: &[Vector3<f64>]) -> Vec<Vector2<f64>> - projects a whole loop
