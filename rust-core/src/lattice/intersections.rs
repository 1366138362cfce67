// Plane/plane and edge/edge intersection predicates
//
// Both return `None` for the routine geometric non-events of the construction
// (parallel or coincident planes, skew or parallel lines). Every decision is gated
// by the crate-wide tolerance.

// ======================== IMPORTS ========================
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

use crate::geometries::vector_ops::{approx_equal, points_approx_equal};
use crate::lattice::polyhedron::{Edge, Plane};

// ======================== PLANE ∩ PLANE ========================

/// Intersection line of two planes.
///
/// The tangent is `n_a × n_b` normalised. A point on the line is found by adding
/// the constraint `x_i = 0` for the first axis `i` that keeps the 3×3 system
/// regular; a fixed axis would fail whenever the line runs parallel to that axis.
pub fn plane_intersection(plane_a: &Plane, plane_b: &Plane) -> Option<Edge> {
    let tangent = plane_a.normal.cross(&plane_b.normal);
    let tangent_length = tangent.norm();
    if approx_equal(tangent_length, 0.0) {
        return None; // Parallel or coincident
    }

    let rhs = Vector3::new(plane_a.offset, plane_b.offset, 0.0);
    let point = (0..3).find_map(|axis| {
        let mut axis_row = Vector3::<f64>::zeros();
        axis_row[axis] = 1.0;
        let system = Matrix3::from_rows(&[
            plane_a.normal.transpose(),
            plane_b.normal.transpose(),
            axis_row.transpose(),
        ]);
        if approx_equal(system.determinant(), 0.0) {
            return None;
        }
        system.lu().solve(&rhs)
    })?;

    Some(Edge::new(tangent / tangent_length, point))
}

// ======================== EDGE ∩ EDGE ========================

/// Crossing point of two edges, if their lines meet.
///
/// Solves `t_a s - t_b u = p_b - p_a` using two independent component rows. Rows
/// with vanishing coefficients are dropped when their right-hand side vanishes
/// too, and prove the lines apart otherwise. The points reached from both lines
/// must agree within tolerance.
pub fn edge_intersection(edge_a: &Edge, edge_b: &Edge) -> Option<Vector3<f64>> {
    let offset = edge_b.point - edge_a.point;

    let mut rows: Vec<(Vector2<f64>, f64)> = Vec::with_capacity(2);
    for i in 0..3 {
        let row = Vector2::new(edge_a.tangent[i], -edge_b.tangent[i]);
        if approx_equal(row.norm_squared(), 0.0) {
            if !approx_equal(offset[i], 0.0) {
                return None;
            }
            continue;
        }
        match rows.first() {
            None => rows.push((row, offset[i])),
            Some(&(first, _)) => {
                let minor = Matrix2::from_rows(&[first.transpose(), row.transpose()]);
                if !approx_equal(minor.determinant(), 0.0) {
                    rows.push((row, offset[i]));
                    break;
                }
            }
        }
    }
    if rows.len() < 2 {
        return None;
    }

    let system = Matrix2::from_rows(&[rows[0].0.transpose(), rows[1].0.transpose()]);
    let parameters = system.lu().solve(&Vector2::new(rows[0].1, rows[1].1))?;

    let point_a = edge_a.point + edge_a.tangent * parameters[0];
    let point_b = edge_b.point + edge_b.tangent * parameters[1];
    if !points_approx_equal(&point_a, &point_b) {
        return None; // Skew lines
    }
    Some(point_a)
}
