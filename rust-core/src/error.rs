//! Error taxonomy for lattice and zone construction.
//!
//! Expected geometric non-events (parallel planes, edges that never cross,
//! loop walks that cannot close) are modelled as `Option`/empty results and
//! never show up here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrillouinError {
    /// Two vectors that must share a dimension do not.
    #[error("dimension mismatch: vectors have {left} and {right} components")]
    DimensionMismatch { left: usize, right: usize },

    /// A vector does not have the number of components the operation requires.
    #[error("invalid dimension: expected {expected} components, found {found}")]
    InvalidDimension { expected: usize, found: usize },

    /// The primitive vectors are (numerically) linearly dependent.
    #[error("degenerate lattice: triple product {triple_product:e} is zero within tolerance")]
    DegenerateLattice { triple_product: f64 },

    /// A Bragg plane was requested for the origin.
    #[error("degenerate point: cannot build a Bragg plane for the zero vector")]
    DegeneratePoint,

    /// Zone numbers outside 1..=MAX_ZONE_NUMBER are not supported.
    #[error("unsupported zone number {0}: only zones 1 to 3 can be constructed")]
    UnsupportedZoneNumber(u32),
}
