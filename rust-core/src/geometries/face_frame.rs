// Plane-local coordinate frames for zone faces
//
// Loops come out of the engine as 3D points on a face plane. Triangulators work in
// 2D, so a face gets an orthonormal in-plane basis to project into and lift out of.

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::config::EPSILON;

/// Orthonormal frame `(u, w, normal)` attached to a face plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceFrame {
    pub u: Vector3<f64>,
    pub w: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl FaceFrame {
    /// Build the frame for a unit normal.
    ///
    /// `u` is `e_i × normal` for the first cartesian axis `e_i` not parallel to the
    /// normal, `w = normal × u`. Both are normalised.
    pub fn new(normal: Vector3<f64>) -> Self {
        let u = Vector3::<f64>::x_axis()
            .cross(&normal)
            .try_normalize(EPSILON)
            .or_else(|| Vector3::<f64>::y_axis().cross(&normal).try_normalize(EPSILON))
            .or_else(|| Vector3::<f64>::z_axis().cross(&normal).try_normalize(EPSILON))
            .unwrap_or_else(|| Vector3::new(1.0, 0.0, 0.0));
        let w = normal.cross(&u).normalize();
        Self { u, w, normal }
    }

    /// In-plane coordinates of a point (the normal component is dropped).
    pub fn project(&self, point: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(point.dot(&self.u), point.dot(&self.w))
    }

    /// Map plane coordinates back onto the plane `x · normal = offset`.
    pub fn lift(&self, coords: &Vector2<f64>, offset: f64) -> Vector3<f64> {
        self.u * coords.x + self.w * coords.y + self.normal * offset
    }

    /// Homogeneous placement matrix taking plane coordinates `(x, y, 0, 1)` to space.
    pub fn transform(&self, offset: f64) -> Matrix4<f64> {
        let translation = self.normal * offset;
        Matrix4::from_columns(&[
            self.u.push(0.0),
            self.w.push(0.0),
            self.normal.push(0.0),
            Vector4::new(translation.x, translation.y, translation.z, 1.0),
        ])
    }

    pub fn project_loop(&self, points: &[Vector3<f64>]) -> Vec<Vector2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

/// Signed area enclosed by a loop, measured about `normal`.
///
/// Positive when the loop runs anticlockwise seen from the side the normal points to.
/// A repeated closing point contributes nothing.
pub fn loop_signed_area(points: &[Vector3<f64>], normal: &Vector3<f64>) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| normal.dot(&a.cross(b)))
        .sum();
    0.5 * twice_area
}
