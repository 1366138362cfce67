// Bragg plane generation for zone construction
//
// Every reciprocal lattice point in a bounded neighbourhood of the origin yields the
// perpendicular bisector between the origin and that point. The planes are handed
// to the zone builder nearest first.

// ======================== IMPORTS ========================
use nalgebra::Vector3;

use crate::config::{MAX_NEIGHBOUR_SHELL, MAX_ZONE_NUMBER};
use crate::error::BrillouinError;
use crate::geometries::vector_ops::approx_equal;
use crate::lattice::polyhedron::Plane;
use crate::Result;

// ======================== SINGLE PLANE ========================

/// Bragg plane of a reciprocal lattice point `p`.
///
/// Unit normal `p / |p|` and offset `|p| / 2`, so the origin lies inside the
/// half-space and `p` lies on its mirror image. Fails with `DegeneratePoint` for
/// the zero vector.
pub fn bragg_plane(point: &Vector3<f64>) -> Result<Plane> {
    let distance = point.norm();
    if approx_equal(distance, 0.0) {
        return Err(BrillouinError::DegeneratePoint);
    }
    Ok(Plane::new(point / distance, 0.5 * distance))
}

// ======================== NEIGHBOURHOOD ========================

/// Validate a zone number against the supported range `1..=MAX_ZONE_NUMBER`.
pub fn check_zone_number(zone_number: u32) -> Result<()> {
    if zone_number == 0 || zone_number > MAX_ZONE_NUMBER {
        return Err(BrillouinError::UnsupportedZoneNumber(zone_number));
    }
    Ok(())
}

/// Index range `L` searched for zone `n`: `min(n + 1, MAX_NEIGHBOUR_SHELL)`.
///
/// This is a heuristic cutoff that works for zones 1 to 3 of ordinary lattices; it
/// is not a completeness bound, which is why larger zone numbers are rejected.
pub fn neighbour_shell(zone_number: u32) -> u32 {
    (zone_number + 1).min(MAX_NEIGHBOUR_SHELL)
}

/// Generate reciprocal lattice points within specified shell index
///
/// Returns all integer combinations i·b₀ + j·b₁ + k·b₂ where |i|, |j|, |k| ≤ max_shell
/// (excluding the origin), in lexicographic (i, j, k) order. Shells beyond
/// `MAX_NEIGHBOUR_SHELL` are clamped to it.
pub fn generate_lattice_points_by_shell(
    basis: &[Vector3<f64>; 3],
    max_shell: u32,
) -> Vec<Vector3<f64>> {
    let shell_limit = max_shell.min(MAX_NEIGHBOUR_SHELL) as i32;

    let mut lattice_points = Vec::new();
    for i in -shell_limit..=shell_limit {
        for j in -shell_limit..=shell_limit {
            for k in -shell_limit..=shell_limit {
                if i == 0 && j == 0 && k == 0 {
                    continue; // Skip origin
                }
                let point =
                    (i as f64) * basis[0] + (j as f64) * basis[1] + (k as f64) * basis[2];
                lattice_points.push(point);
            }
        }
    }
    lattice_points
}

// ======================== ORDERED PLANE STREAM ========================

/// All Bragg planes needed for zone `zone_number`, nearest first.
///
/// The order is part of the algorithm: the zone builder's membership counting is
/// only correct when nearer planes are folded in before farther ones. Ties keep
/// their lexicographic enumeration order.
pub fn sorted_bragg_planes(
    reciprocal_vectors: &[Vector3<f64>; 3],
    zone_number: u32,
) -> Result<Vec<Plane>> {
    check_zone_number(zone_number)?;

    let mut tagged = generate_lattice_points_by_shell(reciprocal_vectors, neighbour_shell(zone_number))
        .iter()
        .map(|point| Ok((bragg_plane(point)?, point.norm_squared())))
        .collect::<Result<Vec<(Plane, f64)>>>()?;
    tagged.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(tagged.into_iter().map(|(plane, _)| plane).collect())
}

/// Re-establish nearest-first order on an arbitrary plane list (stable).
pub fn sort_by_distance(planes: &mut [Plane]) {
    planes.sort_by(|a, b| a.offset.total_cmp(&b.offset));
}
