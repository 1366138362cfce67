// Constants

// Tolerances
pub const EPSILON: f64 = 1e-6; // Single tolerance for every geometric decision (intersections, coincidence, zone membership, loop closure)

// Zone construction limits
pub const MAX_ZONE_NUMBER: u32 = 3; // Above this the neighbour shell heuristic is no longer trusted
pub const MAX_NEIGHBOUR_SHELL: u32 = 3; // Cap on |i|, |j|, |k| when enumerating reciprocal lattice points
