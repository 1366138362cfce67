// Vector primitives on dynamically sized coordinate slices
//
// These are the checked entry points for coordinates that arrive from outside the
// crate (command line, JSON). Once validated, everything is converted to
// `nalgebra::Vector3<f64>` and the engine works on static dimensions.

// ======================== IMPORTS ========================
use nalgebra::{DVector, Vector3};

use crate::config::EPSILON;
use crate::error::BrillouinError;
use crate::Result;

// ======================== TOLERANCE COMPARISONS ========================

/// `|x - y| < ε` with the crate-wide tolerance.
pub fn approx_equal(x: f64, y: f64) -> bool {
    (x - y).abs() < EPSILON
}

/// Component-wise [`approx_equal`] on two slices of equal length.
pub fn vectors_approx_equal(a: &[f64], b: &[f64]) -> Result<bool> {
    check_same_dimension(a, b)?;
    Ok(a.iter().zip(b).all(|(x, y)| approx_equal(*x, *y)))
}

/// Component-wise [`approx_equal`] for the static 3-vectors used by the engine.
pub fn points_approx_equal(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    (0..3).all(|i| approx_equal(a[i], b[i]))
}

// ======================== ARITHMETIC ========================

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    check_same_dimension(a, b)?;
    Ok(DVector::from_column_slice(a).dot(&DVector::from_column_slice(b)))
}

/// Cross product; both operands must have exactly three components.
pub fn cross(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let product = to_vector3(a)?.cross(&to_vector3(b)?);
    Ok(product.iter().copied().collect())
}

pub fn scale(v: &[f64], s: f64) -> Vec<f64> {
    (DVector::from_column_slice(v) * s).iter().copied().collect()
}

pub fn add(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_same_dimension(a, b)?;
    let sum = DVector::from_column_slice(a) + DVector::from_column_slice(b);
    Ok(sum.iter().copied().collect())
}

/// Euclidean distance between two points of equal dimension.
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_same_dimension(a, b)?;
    Ok((DVector::from_column_slice(a) - DVector::from_column_slice(b)).norm())
}

// ======================== CONVERSIONS ========================

/// Convert a coordinate slice into a 3-vector, rejecting any other length.
pub fn to_vector3(v: &[f64]) -> Result<Vector3<f64>> {
    check_dimension(v, 3)?;
    Ok(Vector3::new(v[0], v[1], v[2]))
}

/// Convert three coordinate rows into the three primitive vectors of a lattice.
///
/// Fails with `InvalidDimension` unless there are exactly three rows of three
/// components each.
pub fn lattice_from_rows(rows: &[Vec<f64>]) -> Result<[Vector3<f64>; 3]> {
    if rows.len() != 3 {
        return Err(BrillouinError::InvalidDimension {
            expected: 3,
            found: rows.len(),
        });
    }
    Ok([
        to_vector3(&rows[0])?,
        to_vector3(&rows[1])?,
        to_vector3(&rows[2])?,
    ])
}

// ======================== HELPER FUNCTIONS ========================

fn check_same_dimension(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(BrillouinError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

fn check_dimension(v: &[f64], expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(BrillouinError::InvalidDimension {
            expected,
            found: v.len(),
        });
    }
    Ok(())
}
