#[cfg(test)]
mod tests_loops {
    use super::super::loops::*;
    use super::super::polyhedron::{Edge, Plane, Polyhedron, Vertex};
    use super::super::bragg_planes::sorted_bragg_planes;
    use super::super::reciprocal::{reciprocal_lattice, triple_product};
    use super::super::zone_builder::{build_zone, nth_brillouin_zone};
    use crate::geometries::face_frame::loop_signed_area;
    use crate::geometries::vector_ops::points_approx_equal;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn unit_cube() -> [Vector3<f64>; 3] {
        [Vector3::x(), Vector3::y(), Vector3::z()]
    }

    /// A single face on z = 0 whose edges run through the given vertex chains.
    ///
    /// Each chain is one straight edge; its points become that edge's vertices.
    fn flat_face(chains: &[Vec<[f64; 2]>], extra_faces: Vec<Plane>) -> Polyhedron {
        let mut poly = Polyhedron::new(1);
        let mut face = Plane::new(Vector3::z(), 0.0);

        for chain in chains {
            let points: Vec<Vector3<f64>> =
                chain.iter().map(|p| Vector3::new(p[0], p[1], 0.0)).collect();
            let tangent = (points[points.len() - 1] - points[0]).normalize();
            let mut edge = Edge::new(tangent, points[0]);
            for point in points {
                poly.vertices.push(Vertex::new(point));
                edge.vertices.push(poly.vertices.len() - 1);
            }
            poly.edges.push(edge);
            face.edges.push(poly.edges.len() - 1);
        }

        poly.faces.push(face);
        poly.faces.extend(extra_faces);
        poly
    }

    fn square_chains(x0: f64, y0: f64, side: f64) -> Vec<Vec<[f64; 2]>> {
        let (x1, y1) = (x0 + side, y0 + side);
        vec![
            vec![[x0, y0], [x1, y0]],
            vec![[x1, y0], [x1, y1]],
            vec![[x1, y1], [x0, y1]],
            vec![[x0, y1], [x0, y0]],
        ]
    }

    fn assert_closed(points: &[Vector3<f64>]) {
        assert!(points.len() >= 4, "A closed loop needs at least three corners");
        assert!(
            points_approx_equal(&points[0], &points[points.len() - 1]),
            "Loop must end on its first point"
        );
    }

    // ======================== CUBE TESTS ========================

    #[test]
    fn test_cube_face_is_one_square() {
        let zone = build_zone(&unit_cube(), 1).unwrap();
        for face in &zone.faces {
            let loops = extract_loops(face, &zone);
            assert_eq!(loops.len(), 1, "Cube face {:?} should give one loop", face.normal);

            let points = &loops[0];
            assert_eq!(points.len(), 5, "Four corners plus the closing point");
            assert_closed(points);
            assert_abs_diff_eq!(loop_signed_area(points, &face.normal), 1.0, epsilon = 1e-9);
            for point in points {
                assert_abs_diff_eq!(point.dot(&face.normal), face.offset, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_polyhedron_loops_cover_every_face() {
        let zone = build_zone(&unit_cube(), 1).unwrap();
        let all = polyhedron_loops(&zone);

        assert_eq!(all.len(), 6);
        for (expected_index, face_loops) in all.iter().enumerate() {
            assert_eq!(face_loops.face, expected_index);
            assert_eq!(face_loops.normal, zone.faces[expected_index].normal);
            assert_eq!(face_loops.offset, zone.faces[expected_index].offset);
        }
        assert_eq!(zone.face_loops(), all);
    }

    #[test]
    fn test_fcc_faces_are_squares_and_hexagons() {
        let fcc = [
            Vector3::new(0.0, 0.5, 0.5),
            Vector3::new(0.5, 0.0, 0.5),
            Vector3::new(0.5, 0.5, 0.0),
        ];
        let zone = nth_brillouin_zone(&fcc, 1).unwrap();

        let mut corner_counts = Vec::new();
        for face_loops in zone.face_loops() {
            assert_eq!(face_loops.loops.len(), 1);
            let points = &face_loops.loops[0];
            assert_closed(points);
            assert!(loop_signed_area(points, &face_loops.normal) > 0.0);
            corner_counts.push(points.len() - 1);
        }
        corner_counts.sort_unstable();
        eprintln!("DEBUG: FCC loop corner counts: {:?}", corner_counts);

        assert_eq!(corner_counts.len(), 14);
        assert_eq!(corner_counts.iter().filter(|&&c| c == 4).count(), 6);
        assert_eq!(corner_counts.iter().filter(|&&c| c == 6).count(), 8);
    }

    #[test]
    fn test_second_zone_loops_are_closed_and_anticlockwise() {
        let zone = build_zone(&unit_cube(), 2).unwrap();
        let all = zone.face_loops();
        assert!(!all.is_empty());

        for face_loops in &all {
            for points in &face_loops.loops {
                assert_closed(points);
                assert!(loop_signed_area(points, &face_loops.normal) > 0.0);
                for point in points {
                    assert!(zone.zone_contains(point));
                }
            }
        }
    }

    // ======================== ZONE VOLUME TESTS ========================

    fn face_centered_cubic() -> [Vector3<f64>; 3] {
        [
            Vector3::new(0.0, 0.5, 0.5),
            Vector3::new(0.5, 0.0, 0.5),
            Vector3::new(0.5, 0.5, 0.0),
        ]
    }

    /// Points with exactly `zone - 1` violated Bragg planes belong to the n-th zone proper.
    fn in_zone_shell(point: &Vector3<f64>, planes: &[Plane], zone: u32) -> bool {
        let violations = planes.iter().filter(|p| p.is_violated_by(point)).count();
        violations == zone as usize - 1
    }

    /// Volume enclosed by the face loops, by the divergence theorem.
    ///
    /// A loop bounds the zone when exactly one side of it lies in the zone; it then
    /// adds `offset * area / 3` with the sign of the outward direction.
    fn enclosed_volume(direct: &[Vector3<f64>; 3], zone: u32) -> (f64, f64) {
        let reciprocal = reciprocal_lattice(direct).unwrap();
        let planes = sorted_bragg_planes(&reciprocal, zone).unwrap();
        let poly = nth_brillouin_zone(direct, zone).unwrap();

        let mut volume = 0.0;
        for face_loops in poly.face_loops() {
            let normal = face_loops.normal;
            for points in &face_loops.loops {
                assert_closed(points);
                let area = loop_signed_area(points, &normal);
                assert!(area > 0.0, "Loop on face {} has area {}", face_loops.face, area);

                // Step off the first side towards the interior, which lies to the left
                let along = points[1] - points[0];
                let inward = normal.cross(&along).normalize();
                let sample = (points[0] + points[1]) * 0.5 + inward * 1e-4;
                let below = in_zone_shell(&(sample - normal * 1e-5), &planes, zone);
                let above = in_zone_shell(&(sample + normal * 1e-5), &planes, zone);

                match (below, above) {
                    (true, false) => volume += face_loops.offset * area / 3.0,
                    (false, true) => volume -= face_loops.offset * area / 3.0,
                    _ => {}
                }
            }
        }
        (volume, triple_product(&reciprocal).abs())
    }

    fn assert_vertices_and_loops(poly: &Polyhedron) {
        assert!(!poly.is_empty());
        for vertex in &poly.vertices {
            assert!(
                poly.zone_contains(&vertex.position),
                "Vertex {:?} is outside zone {}",
                vertex.position,
                poly.zone_number
            );
        }
        for face_loops in poly.face_loops() {
            for points in &face_loops.loops {
                assert_closed(points);
                assert!(loop_signed_area(points, &face_loops.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_simple_cubic_zone_volumes() {
        for zone in 1..=3 {
            let (volume, expected) = enclosed_volume(&unit_cube(), zone);
            eprintln!("DEBUG: simple cubic zone {} volume {:.6} (expected {:.6})", zone, volume, expected);
            assert_abs_diff_eq!(volume, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_simple_cubic_third_zone() {
        let zone = build_zone(&unit_cube(), 3).unwrap();
        eprintln!(
            "DEBUG: simple cubic zone 3 counts: {:?}",
            (zone.faces.len(), zone.edges.len(), zone.vertices.len())
        );
        assert_eq!(zone.zone_number, 3);
        assert_vertices_and_loops(&zone);
    }

    #[test]
    fn test_fcc_third_zone() {
        let zone = nth_brillouin_zone(&face_centered_cubic(), 3).unwrap();
        eprintln!(
            "DEBUG: FCC zone 3 counts: {:?}",
            (zone.faces.len(), zone.edges.len(), zone.vertices.len())
        );
        assert_vertices_and_loops(&zone);

        let (volume, expected) = enclosed_volume(&face_centered_cubic(), 3);
        eprintln!("DEBUG: FCC zone 3 volume {:.6} (expected {:.6})", volume, expected);
        assert_abs_diff_eq!(expected, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(volume, expected, epsilon = 1e-6);
    }

    // ======================== HAND-BUILT FACE TESTS ========================

    #[test]
    fn test_two_disjoint_squares() {
        let mut chains = square_chains(0.0, 0.0, 1.0);
        chains.extend(square_chains(2.0, 0.0, 1.0));
        let poly = flat_face(&chains, Vec::new());

        let loops = extract_loops(&poly.faces[0], &poly);
        assert_eq!(loops.len(), 2);
        for points in &loops {
            assert_eq!(points.len(), 5);
            assert_abs_diff_eq!(loop_signed_area(points, &Vector3::z()), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_edges_are_split_at_inner_vertices() {
        // The bottom edge carries a vertex in its middle; the loop gets a fifth corner
        let chains = vec![
            vec![[0.0, 0.0], [0.5, 0.0], [1.0, 0.0]],
            vec![[1.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [0.0, 1.0]],
            vec![[0.0, 1.0], [0.0, 0.0]],
        ];
        let poly = flat_face(&chains, Vec::new());

        let loops = extract_loops(&poly.faces[0], &poly);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 6);
        assert_abs_diff_eq!(loop_signed_area(&loops[0], &Vector3::z()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dangling_segment_is_ignored() {
        let mut chains = square_chains(0.0, 0.0, 1.0);
        chains.push(vec![[1.0, 1.0], [2.0, 2.0]]);
        let poly = flat_face(&chains, Vec::new());

        let loops = extract_loops(&poly.faces[0], &poly);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 5);
    }

    #[test]
    fn test_segments_outside_zone_are_dropped() {
        // The bottom edge runs on to x = 1.5, past the face at x = 1
        let chains = vec![
            vec![[0.0, 0.0], [1.0, 0.0], [1.5, 0.0]],
            vec![[1.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [0.0, 1.0]],
            vec![[0.0, 1.0], [0.0, 0.0]],
        ];
        let boundary = Plane::new(Vector3::x(), 1.0);
        let poly = flat_face(&chains, vec![boundary]);

        let loops = extract_loops(&poly.faces[0], &poly);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 5);
        assert!(loops[0].iter().all(|p| p.x <= 1.0 + 1e-12));
    }

    #[test]
    fn test_too_few_segments_gives_nothing() {
        let chains = vec![vec![[0.0, 0.0], [1.0, 0.0]], vec![[1.0, 0.0], [1.0, 1.0]]];
        let poly = flat_face(&chains, Vec::new());
        assert!(extract_loops(&poly.faces[0], &poly).is_empty());
        assert!(polyhedron_loops(&poly).is_empty());
    }

    #[test]
    fn test_open_chain_gives_nothing() {
        let chains = vec![
            vec![[0.0, 0.0], [1.0, 0.0]],
            vec![[1.0, 0.0], [1.0, 1.0]],
            vec![[1.0, 1.0], [0.0, 1.0]],
        ];
        let poly = flat_face(&chains, Vec::new());
        assert!(extract_loops(&poly.faces[0], &poly).is_empty());
    }
}
