//! Serializable views of layout results.

use orthoknot::bends::Bends;
use orthoknot::diagram::End;
use orthoknot::faces::FaceSet;
use orthoknot::ortho::{EdgeState, OrthoRepr, Turn, VertexState};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BendsDoc {
    pub bends: Vec<Turn>,
    pub total: u64,
    pub degraded: bool,
    pub status: String,
}

impl From<&Bends> for BendsDoc {
    fn from(b: &Bends) -> Self {
        Self {
            bends: b.values().to_vec(),
            total: b.total(),
            degraded: b.degraded(),
            status: format!("{:?}", b.status()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlotDoc {
    pub edge: usize,
    pub toward: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VertexDoc {
    pub state: &'static str,
    /// East, north, west, south.
    pub edges: [Option<SlotDoc>; 4],
}

#[derive(Debug, Serialize)]
pub struct EdgeDoc {
    pub arc: usize,
    pub dir: &'static str,
    pub tail: usize,
    pub head: usize,
    pub turns: [Turn; 2],
    pub virtual_edge: bool,
}

#[derive(Debug, Serialize)]
pub struct ArcDoc {
    pub bend: Turn,
    pub vertices: Vec<usize>,
    pub edges: Vec<usize>,
    pub over: [bool; 2],
    pub displacement: [i64; 2],
}

#[derive(Debug, Serialize)]
pub struct OrthoDoc {
    pub exterior_face: Option<usize>,
    pub bend_count: usize,
    pub orientations: Vec<Option<&'static str>>,
    pub vertices: Vec<VertexDoc>,
    pub edges: Vec<Option<EdgeDoc>>,
    pub arcs: Vec<ArcDoc>,
}

fn vertex_state(s: VertexState) -> &'static str {
    match s {
        VertexState::Corner => "corner",
        VertexState::RightHanded => "right_handed",
        VertexState::LeftHanded => "left_handed",
        VertexState::Inactive => "inactive",
    }
}

impl OrthoDoc {
    /// `crossing_slots` bounds the orientation list (corners have none).
    pub fn new(repr: &OrthoRepr, crossing_slots: usize) -> Self {
        let vertices = repr
            .vertices()
            .iter()
            .map(|v| VertexDoc {
                state: vertex_state(v.state),
                edges: v.edges.map(|slot| {
                    slot.map(|de| SlotDoc {
                        edge: de.edge,
                        toward: de.toward.as_str(),
                    })
                }),
            })
            .collect();
        let edges = repr
            .edges()
            .iter()
            .map(|e| {
                e.as_ref().map(|e| EdgeDoc {
                    arc: e.arc,
                    dir: e.dir.as_str(),
                    tail: e.tail(),
                    head: e.head(),
                    turns: e.turns,
                    virtual_edge: e.state == EdgeState::Virtual,
                })
            })
            .collect();
        let arcs = (0..repr.bends().len())
            .map(|a| {
                let d = repr.arc_displacement(a);
                ArcDoc {
                    bend: repr.bends()[a],
                    vertices: repr.arc_vertices(a).to_vec(),
                    edges: repr.arc_edges(a).to_vec(),
                    over: [repr.arc_over(a, End::Tail), repr.arc_over(a, End::Head)],
                    displacement: [d.x, d.y],
                }
            })
            .collect();
        Self {
            exterior_face: repr.exterior_face(),
            bend_count: repr.bend_count(),
            orientations: (0..crossing_slots)
                .map(|c| repr.crossing_orientation(c).map(|d| d.as_str()))
                .collect(),
            vertices,
            edges,
            arcs,
        }
    }
}

/// One `face_string` per line.
pub fn face_lines(faces: &FaceSet) -> Vec<String> {
    (0..faces.face_count()).map(|f| faces.face_string(f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthoknot::diagram::Braid;
    use orthoknot::{Layout, OrthoCfg};

    #[test]
    fn figure_eight_document() {
        let g = Braid::new(2, vec![1]).unwrap().closure().unwrap();
        let mut layout = Layout::new(g, OrthoCfg::default());
        assert_eq!(
            face_lines(layout.faces()),
            vec!["face 0 = [4, 7]", "face 1 = [5]", "face 2 = [6]"]
        );
        let bends = BendsDoc::from(layout.bends().unwrap());
        assert_eq!(bends.bends, vec![0, 0, 3, -3]);
        assert_eq!(bends.total, 6);
        assert!(!bends.degraded);

        let doc = OrthoDoc::new(layout.ortho().unwrap(), 1);
        assert_eq!(doc.orientations, vec![Some("east")]);
        assert_eq!(doc.vertices.len(), 7);
        assert_eq!(doc.edges.len(), 10);
        assert!(doc.edges[0].is_none());
        assert_eq!(doc.arcs[2].vertices, vec![0, 1, 2, 3, 0]);
        assert_eq!(doc.arcs[3].over, [true, false]);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["vertices"][0]["state"], "right_handed");
        assert_eq!(json["vertices"][0]["edges"][1]["edge"], 2);
        assert_eq!(json["vertices"][0]["edges"][1]["toward"], "head");
        assert_eq!(json["edges"][6]["dir"], "east");
        assert_eq!(json["edges"][6]["virtual_edge"], true);
        assert_eq!(json["arcs"][2]["displacement"], serde_json::json!([0, 0]));
    }
}
