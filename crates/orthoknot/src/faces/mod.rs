//! Face boundary cycles of a planar diagram.
//!
//! Faces are found by walking [`PlanarDiagram::next_dart_on_face`] from the first unvisited
//! dart until the cycle closes; face ids follow discovery order. The boundary cycles are
//! stored CSR-style: `face_ptr[f]..face_ptr[f + 1]` indexes into the flat dart array.
//!
//! For a disconnected diagram every connected component contributes its own boundary cycles,
//! so there are `crossing_count + 2 * components` faces.

use tracing::{debug, debug_span, warn};

use crate::diagram::{Dart, PlanarDiagram};
use crate::ortho::Turn;

/// Face cycles plus dart→face and face→component maps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceSet {
    face_ptr: Vec<usize>,
    face_darts: Vec<Dart>,
    dart_face: Vec<Option<usize>>,
    face_component: Vec<usize>,
    component_count: usize,
}

/// Exterior face choice: one face per connected component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExteriorFaces {
    primary: Option<usize>,
    per_component: Vec<usize>,
    mask: Vec<bool>,
}

impl ExteriorFaces {
    /// The requested (or default) exterior face; `None` for an empty diagram.
    pub fn primary(&self) -> Option<usize> {
        self.primary
    }

    pub fn per_component(&self) -> &[usize] {
        &self.per_component
    }

    #[inline]
    pub fn is_exterior(&self, f: usize) -> bool {
        self.mask.get(f).copied().unwrap_or(false)
    }
}

impl FaceSet {
    /// Walk all face cycles of `diagram`. Darts of inactive arcs are skipped.
    pub fn extract(diagram: &PlanarDiagram) -> Self {
        let _span = debug_span!("extract_faces", arcs = diagram.arc_count()).entered();

        let dart_slots = diagram.dart_slots();
        let mut dart_face: Vec<Option<usize>> = vec![None; dart_slots];
        let mut face_darts = Vec::with_capacity(2 * diagram.arc_count());
        // Exact for connected diagrams; grows for split ones.
        let mut face_ptr = Vec::with_capacity(diagram.crossing_count() + 3);
        face_ptr.push(0);

        let mut finder = 0;
        loop {
            while finder < dart_slots
                && (dart_face[finder].is_some() || !diagram.arc_active(finder >> 1))
            {
                finder += 1;
            }
            if finder >= dart_slots {
                break;
            }

            let f = face_ptr.len() - 1;
            let mut d = Dart(finder);
            while dart_face[d.index()].is_none() {
                dart_face[d.index()] = Some(f);
                face_darts.push(d);
                match diagram.next_dart_on_face(d) {
                    Some(next) => d = next,
                    None => break,
                }
            }
            face_ptr.push(face_darts.len());
        }

        let (crossing_component, component_count) = diagram.components();
        let face_component = face_ptr
            .windows(2)
            .map(|w| {
                diagram
                    .dart_start(face_darts[w[0]])
                    .and_then(|at| crossing_component[at.crossing])
                    .unwrap_or(0)
            })
            .collect();

        debug!(
            faces = face_ptr.len() - 1,
            darts = face_darts.len(),
            components = component_count,
            "faces extracted"
        );
        Self {
            face_ptr,
            face_darts,
            dart_face,
            face_component,
            component_count,
        }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_ptr.len() - 1
    }

    /// Pointer array into [`all_darts`](Self::all_darts), length `face_count + 1`.
    pub fn face_pointers(&self) -> &[usize] {
        &self.face_ptr
    }

    pub fn all_darts(&self) -> &[Dart] {
        &self.face_darts
    }

    #[inline]
    pub fn face_darts(&self, f: usize) -> &[Dart] {
        &self.face_darts[self.face_ptr[f]..self.face_ptr[f + 1]]
    }

    /// Number of boundary darts, which is also the number of corners.
    #[inline]
    pub fn face_size(&self, f: usize) -> usize {
        self.face_ptr[f + 1] - self.face_ptr[f]
    }

    pub fn max_face_size(&self) -> usize {
        (0..self.face_count())
            .map(|f| self.face_size(f))
            .max()
            .unwrap_or(0)
    }

    /// First discovered face among those with the most boundary darts.
    pub fn largest_face(&self) -> Option<usize> {
        self.largest_face_where(|_| true)
    }

    fn largest_face_where(&self, keep: impl Fn(usize) -> bool) -> Option<usize> {
        let mut best: Option<usize> = None;
        for f in (0..self.face_count()).filter(|&f| keep(f)) {
            if best.map_or(true, |b| self.face_size(f) > self.face_size(b)) {
                best = Some(f);
            }
        }
        best
    }

    #[inline]
    pub fn dart_face(&self, d: Dart) -> Option<usize> {
        self.dart_face.get(d.index()).copied().flatten()
    }

    /// `[right face, left face]` of an active arc.
    pub fn arc_faces(&self, a: usize) -> Option<[usize; 2]> {
        Some([
            self.dart_face(Dart::new(a, false))?,
            self.dart_face(Dart::new(a, true))?,
        ])
    }

    pub fn face_component(&self, f: usize) -> usize {
        self.face_component[f]
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// `face f = [d0, d1, ...]` with dart indices.
    pub fn face_string(&self, f: usize) -> String {
        let darts: Vec<usize> = self.face_darts(f).iter().map(|d| d.index()).collect();
        format!("face {f} = {darts:?}")
    }

    /// Total turning of the boundary of `f` in quarter turns: corners plus signed bends.
    ///
    /// With consistent bends this is `+4` for interior and `-4` for exterior faces.
    pub fn rotation(&self, f: usize, bends: &[Turn]) -> i64 {
        let signed: i64 = self
            .face_darts(f)
            .iter()
            .map(|d| {
                let b = i64::from(bends[d.arc()]);
                if d.forward() {
                    b
                } else {
                    -b
                }
            })
            .sum();
        self.face_size(f) as i64 + signed
    }

    /// Pick one exterior face per connected component.
    ///
    /// `requested` is honored for its own component when it is a valid face id; otherwise a
    /// warning is logged. All other components use their largest face.
    pub fn exterior_faces(&self, requested: Option<usize>) -> ExteriorFaces {
        let requested = match requested {
            Some(f) if f < self.face_count() => Some(f),
            Some(f) => {
                warn!(
                    requested = f,
                    faces = self.face_count(),
                    "exterior face out of range; using a largest face"
                );
                None
            }
            None => None,
        };

        let mut per_component = Vec::with_capacity(self.component_count);
        for comp in 0..self.component_count {
            let pick = match requested {
                Some(f) if self.face_component[f] == comp => Some(f),
                _ => self.largest_face_where(|f| self.face_component[f] == comp),
            };
            if let Some(f) = pick {
                per_component.push(f);
            }
        }

        let mut mask = vec![false; self.face_count()];
        for &f in &per_component {
            mask[f] = true;
        }
        ExteriorFaces {
            primary: requested.or_else(|| self.largest_face()),
            per_component,
            mask,
        }
    }
}
