//! Brillouin zone construction library
//!
//! Builds the n-th Brillouin zone of a crystal lattice by incrementally clipping
//! reciprocal space with Bragg planes, and decomposes every face of the result
//! into simple closed polygon loops ready for triangulation.
//!
//! Pipeline: [`lattice::reciprocal_lattice`] → [`lattice::build_zone`] →
//! [`lattice::extract_loops`] (or [`lattice::Polyhedron::face_loops`] for all faces).

pub mod config;
pub mod error;
pub mod geometries;
pub mod lattice;

pub use error::BrillouinError;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, BrillouinError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
