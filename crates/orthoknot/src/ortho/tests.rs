use super::*;
use crate::bends::{optimize_bends, MicroLpSolver};
use crate::cfg::OrthoCfg;
use crate::diagram::{Braid, Port};
use crate::faces::FaceSet;
use crate::test_util::{capture_logs, figure_eight, trefoil, two_loops};

fn optimal(diagram: &PlanarDiagram, exterior: Option<usize>) -> (Option<usize>, Vec<Turn>) {
    let faces = FaceSet::extract(diagram);
    let ext = faces.exterior_faces(exterior);
    let bends = optimize_bends(diagram, &faces, &ext, &mut MicroLpSolver, &OrthoCfg::default())
        .unwrap();
    (ext.primary(), bends.values().to_vec())
}

/// Every directed edge stored at a vertex leaves it in the slot's direction.
fn assert_slots_consistent(repr: &OrthoRepr) {
    for (v, vertex) in repr.vertices().iter().enumerate() {
        for dir in Dir::ALL {
            let Some(de) = vertex.edge(dir) else {
                continue;
            };
            let e = repr.edge(de.edge).unwrap();
            match de.toward {
                End::Head => {
                    assert_eq!(e.tail(), v);
                    assert_eq!(e.dir, dir);
                }
                End::Tail => {
                    assert_eq!(e.head(), v);
                    assert_eq!(e.dir.opposite(), dir);
                }
            }
        }
    }
}

#[test]
fn dir_arithmetic() {
    assert_eq!(Dir::East.rotate(1), Dir::North);
    assert_eq!(Dir::East.rotate(-1), Dir::South);
    assert_eq!(Dir::South.rotate(7), Dir::West);
    assert_eq!(Dir::West.opposite(), Dir::East);
    assert_eq!(Dir::South.turns_from(Dir::West), 1);
    assert_eq!(Dir::East.turns_from(Dir::North), 3);
    let sum: Vector2<i64> = Dir::ALL.iter().map(|d| d.unit()).sum();
    assert_eq!(sum, Vector2::zeros());
    assert_eq!(Dir::North.unit(), Vector2::new(0, 1));
    assert_eq!(Dir::from_index(6).as_str(), "west");
}

#[test]
fn vertex_state_mirrors_crossing_state() {
    assert_eq!(VertexState::from(CrossingState::RightHanded), VertexState::RightHanded);
    assert_eq!(VertexState::from(CrossingState::LeftHanded), VertexState::LeftHanded);
    assert_eq!(VertexState::from(CrossingState::Inactive), VertexState::Inactive);
}

#[test]
fn figure_eight_subdivision() {
    let g = figure_eight();
    let mut scratch = Scratch::for_diagram(&g, 6);
    let repr = subdivide(&g, Some(0), &[0, 0, 3, -3], &mut scratch).unwrap();

    assert_eq!(repr.vertex_count(), 7);
    assert_eq!(repr.edge_count(), 10);
    assert_eq!(repr.active_edge_count(), 8);
    assert_eq!(repr.bend_count(), 6);
    assert_eq!(repr.exterior_face(), Some(0));
    assert_eq!(repr.bends(), &[0, 0, 3, -3]);
    assert_eq!(repr.crossing_orientation(0), Some(Dir::East));

    assert_eq!(repr.arc_vertices(2), &[0, 1, 2, 3, 0]);
    assert_eq!(repr.arc_edges(2), &[2, 4, 5, 6]);
    assert_eq!(repr.arc_vertices(3), &[0, 4, 5, 6, 0]);
    assert_eq!(repr.arc_edges(3), &[3, 7, 8, 9]);
    assert!(repr.arc_vertices(0).is_empty());
    assert!(repr.arc_edges(1).is_empty());
    assert!(repr.edge(0).is_none());

    let dirs: Vec<Dir> = repr.arc_edges(2).iter().map(|&e| repr.edge(e).unwrap().dir).collect();
    assert_eq!(dirs, vec![Dir::North, Dir::West, Dir::South, Dir::East]);
    let dirs: Vec<Dir> = repr.arc_edges(3).iter().map(|&e| repr.edge(e).unwrap().dir).collect();
    assert_eq!(dirs, vec![Dir::East, Dir::South, Dir::West, Dir::North]);

    assert_eq!(
        repr.edge(2),
        Some(&GridEdge {
            arc: 2,
            dir: Dir::North,
            ends: [0, 1],
            turns: [1, 1],
            state: EdgeState::Active,
        })
    );
    assert_eq!(
        repr.edge(6),
        Some(&GridEdge {
            arc: 2,
            dir: Dir::East,
            ends: [3, 0],
            turns: [-1, 1],
            state: EdgeState::Virtual,
        })
    );
    // Right turns on arc 3.
    assert_eq!(repr.edge(7).map(|e| e.turns), Some([1, -1]));
    assert_eq!(repr.edge(3).map(|e| e.turns), Some([1, -1]));

    let crossing = repr.vertex(0);
    assert_eq!(crossing.state, VertexState::RightHanded);
    assert_eq!(crossing.degree(), 4);
    assert_eq!(crossing.edge(Dir::East), Some(DirectedEdge::new(3, End::Head)));
    assert_eq!(crossing.edge(Dir::North), Some(DirectedEdge::new(2, End::Head)));
    assert_eq!(crossing.edge(Dir::West), Some(DirectedEdge::new(6, End::Tail)));
    assert_eq!(crossing.edge(Dir::South), Some(DirectedEdge::new(9, End::Tail)));

    let corner = repr.vertex(1);
    assert_eq!(corner.state, VertexState::Corner);
    assert_eq!(corner.degree(), 2);
    assert_eq!(corner.edge(Dir::South), Some(DirectedEdge::new(2, End::Tail)));
    assert_eq!(corner.edge(Dir::West), Some(DirectedEdge::new(4, End::Head)));

    assert!(repr.arc_over(3, End::Tail));
    assert!(repr.arc_over(2, End::Head));
    assert!(!repr.arc_over(2, End::Tail));

    assert_eq!(repr.arc_displacement(2), Vector2::zeros());
    assert!(repr.port_mismatches(&g).is_empty());
    assert_slots_consistent(&repr);
}

#[test]
fn length_mismatch_is_fatal_and_logged() {
    let g = figure_eight();
    let mut scratch = Scratch::new();
    let (res, logs) = capture_logs(|| subdivide(&g, None, &[0, 0, 3], &mut scratch));
    assert_eq!(
        res.unwrap_err(),
        SubdivideError::BendLengthMismatch {
            expected: 4,
            found: 3
        }
    );
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("not subdividing"), "{logs}");
}

#[test]
fn inconsistent_bends_are_reported() {
    let g = figure_eight();
    let mut scratch = Scratch::new();
    let (res, logs) = capture_logs(|| subdivide(&g, None, &[0; 4], &mut scratch));
    let repr = res.unwrap();
    assert_eq!(repr.port_mismatches(&g), vec![2, 3]);
    assert!(logs.contains("WARN"), "{logs}");
}

#[test]
fn zero_bends_keep_the_slot_counts() {
    let g = trefoil();
    let mut scratch = Scratch::new();
    let zero = vec![0; g.arc_slots()];
    let repr = subdivide(&g, None, &zero, &mut scratch).unwrap();
    assert_eq!(repr.vertex_count(), g.crossing_slots());
    assert_eq!(repr.edge_count(), g.arc_slots());
    assert_eq!(repr.bend_count(), 0);
    for a in 0..g.arc_slots() {
        let Some([tail, _]) = g.arc_ends(a) else {
            continue;
        };
        let orient = repr.crossing_orientation(tail.crossing).unwrap();
        let e = repr.edge(a).unwrap();
        assert_eq!(e.dir, tail.port.standard_dir().rotate(orient.index() as Turn));
        assert_eq!(e.state, EdgeState::Active);
        assert_eq!(repr.arc_vertices(a).len(), 2);
    }
}

#[test]
fn trefoil_optimal_layout_docks_every_arc() {
    let g = trefoil();
    let (exterior, bends) = optimal(&g, None);
    let mut scratch = Scratch::new();
    let repr = subdivide(&g, exterior, &bends, &mut scratch).unwrap();

    let total: usize = bends.iter().map(|b| b.unsigned_abs() as usize).sum();
    assert_eq!(repr.vertex_count(), g.crossing_slots() + total);
    assert_eq!(repr.edge_count(), g.arc_slots() + total);
    assert_eq!(repr.active_edge_count(), g.arc_count() + total);
    assert!(repr.port_mismatches(&g).is_empty());
    assert_slots_consistent(&repr);

    for c in 0..g.crossing_slots() {
        assert_eq!(repr.vertex(c).degree(), 4);
    }
    for v in g.crossing_slots()..repr.vertex_count() {
        assert_eq!(repr.vertex(v).state, VertexState::Corner);
        assert_eq!(repr.vertex(v).degree(), 2);
    }
    for a in 0..g.arc_slots() {
        let edges = repr.arc_edges(a);
        assert_eq!(edges.len(), 1 + bends[a].unsigned_abs() as usize);
        assert_eq!(repr.arc_vertices(a).len(), edges.len() + 1);
        let [tail, head] = g.arc_ends(a).unwrap();
        assert_eq!(repr.arc_vertices(a).first(), Some(&tail.crossing));
        assert_eq!(repr.arc_vertices(a).last(), Some(&head.crossing));
        // Port directions agree with the crossing orientation at both ends.
        let head_orient = repr.crossing_orientation(head.crossing).unwrap();
        let head_port = head.port.standard_dir().rotate(head_orient.index() as Turn);
        let last = repr.edge(*edges.last().unwrap()).unwrap();
        assert_eq!(last.dir.opposite(), head_port);
        assert!(matches!(head.port, Port::InLeft | Port::InRight));
    }
}

#[test]
fn scratch_is_reusable() {
    let g = figure_eight();
    let mut scratch = Scratch::new();
    let a = subdivide(&g, Some(0), &[0, 0, 3, -3], &mut scratch).unwrap();
    let t = trefoil();
    let (exterior, bends) = optimal(&t, None);
    subdivide(&t, exterior, &bends, &mut scratch).unwrap();
    let b = subdivide(&g, Some(0), &[0, 0, 3, -3], &mut scratch).unwrap();
    assert_eq!(a, b);
}

/// Full pipeline on a diagram with one exterior face per component.
fn assert_split_layout(g: &PlanarDiagram, requested: Option<usize>) -> OrthoRepr {
    let faces = FaceSet::extract(g);
    assert!(faces.component_count() > 1);
    let ext = faces.exterior_faces(requested);
    assert_eq!(ext.per_component().len(), faces.component_count());
    if let Some(f) = requested {
        assert!(ext.is_exterior(f));
    }

    let bends =
        optimize_bends(g, &faces, &ext, &mut MicroLpSolver, &OrthoCfg::default()).unwrap();
    assert!(!bends.degraded());
    for f in 0..faces.face_count() {
        let expected = if ext.is_exterior(f) { -4 } else { 4 };
        assert_eq!(faces.rotation(f, bends.values()), expected, "face {f}");
    }

    let mut scratch = Scratch::for_diagram(g, bends.total() as usize);
    let repr = subdivide(g, ext.primary(), bends.values(), &mut scratch).unwrap();
    assert!(repr.port_mismatches(g).is_empty());
    assert_slots_consistent(&repr);
    for c in 0..g.crossing_slots() {
        assert!(repr.crossing_orientation(c).is_some(), "crossing {c} unoriented");
    }
    assert_eq!(repr.bend_count() as u64, bends.total());
    repr
}

#[test]
fn disconnected_diagram_layout() {
    let g = two_loops();
    assert_split_layout(&g, None);

    let faces = FaceSet::extract(&g);
    let default_second = faces.exterior_faces(None).per_component()[1];
    let inner = (0..faces.face_count())
        .find(|&f| faces.face_component(f) == 1 && f != default_second)
        .unwrap();
    let repr = assert_split_layout(&g, Some(inner));
    assert_eq!(repr.exterior_face(), Some(inner));
}

#[test]
fn braid_with_unused_generator_splits() {
    // σ2 never occurs: two figure-eight curves side by side.
    let g = Braid::new(4, vec![1, 3]).unwrap().closure().unwrap();
    assert_eq!(g.components().1, 2);
    assert_split_layout(&g, None);
    assert_split_layout(&g, Some(0));
}
