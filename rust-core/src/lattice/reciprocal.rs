use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::config::EPSILON;
use crate::error::BrillouinError;
use crate::Result;

/// Scalar triple product `a0 · (a1 × a2)`, the signed cell volume.
pub fn triple_product(vectors: &[Vector3<f64>; 3]) -> f64 {
    vectors[0].dot(&vectors[1].cross(&vectors[2]))
}

/// Triple product divided by the product of the three vector lengths.
///
/// Equals `±1` for orthogonal vectors and `0` for dependent ones, whatever the length
/// scale of the lattice. A zero-length vector gives `0`.
pub fn normalized_triple_product(vectors: &[Vector3<f64>; 3]) -> f64 {
    let lengths: f64 = vectors.iter().map(|v| v.norm()).product();
    if lengths == 0.0 {
        return 0.0;
    }
    triple_product(vectors) / lengths
}

/// Reject linearly dependent vectors; returns the signed cell volume otherwise.
///
/// Independence is judged on [`normalized_triple_product`], so lattices of any
/// overall scale pass while flat or collinear ones fail with `DegenerateLattice`.
pub fn check_independent(vectors: &[Vector3<f64>; 3]) -> Result<f64> {
    let volume = triple_product(vectors);
    if normalized_triple_product(vectors).abs() < EPSILON {
        return Err(BrillouinError::DegenerateLattice {
            triple_product: volume,
        });
    }
    Ok(volume)
}

/// Reciprocal basis of three primitive lattice vectors.
///
/// `b_i = (a_j × a_k) / V` with `(i, j, k)` cyclic and `V = a0 · (a1 × a2)`.
/// The 2π factor is left out, so the result is in inverse length units without it.
///
/// Fails with `DegenerateLattice` when the vectors are dependent within tolerance
/// (see [`check_independent`]).
pub fn reciprocal_lattice(lattice: &[Vector3<f64>; 3]) -> Result<[Vector3<f64>; 3]> {
    let volume = check_independent(lattice)?;

    Ok([
        lattice[1].cross(&lattice[2]) / volume,
        lattice[2].cross(&lattice[0]) / volume,
        lattice[0].cross(&lattice[1]) / volume,
    ])
}

/// Radius of the free-electron Fermi sphere for a reciprocal basis.
///
/// The sphere holds `valence / 2` zone volumes (two spin states per k-point).
/// The zone volume is taken unsigned, so left-handed bases give the same radius.
pub fn fermi_sphere_radius(reciprocal_vectors: &[Vector3<f64>; 3], valence: f64) -> f64 {
    let zone_volume = triple_product(reciprocal_vectors).abs();
    let sphere_volume = zone_volume * 0.5 * valence;
    (sphere_volume / ((4.0 / 3.0) * PI)).cbrt()
}
