//! Iterative depth-first traversal over the crossing adjacency.
//!
//! The traversal keeps an explicit stack of `(crossing, next port)` frames, so the depth is
//! bounded by the heap and not by the call stack.

use super::{Dart, PlanarDiagram, Port};

/// One step of [`PlanarDiagram::depth_first_search`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DartVisit {
    /// Dart that discovered `head`; `None` for the root of a component.
    pub dart: Option<Dart>,
    pub tail: usize,
    pub head: usize,
}

impl DartVisit {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.dart.is_none()
    }
}

impl PlanarDiagram {
    /// Visit every active crossing once, one root per connected component.
    ///
    /// Roots are taken in ascending crossing order. For every non-root crossing, `visit`
    /// receives the dart along which it was discovered; its tail crossing has been visited
    /// before.
    pub fn depth_first_search<F: FnMut(DartVisit)>(&self, visit: F) {
        let mut stack = Vec::new();
        let mut seen = Vec::new();
        self.depth_first_search_with(&mut stack, &mut seen, visit);
    }

    /// Same as [`depth_first_search`](Self::depth_first_search) with caller-owned buffers.
    pub fn depth_first_search_with<F: FnMut(DartVisit)>(
        &self,
        stack: &mut Vec<(usize, usize)>,
        seen: &mut Vec<bool>,
        mut visit: F,
    ) {
        stack.clear();
        seen.clear();
        seen.resize(self.crossing_slots(), false);

        for root in 0..self.crossing_slots() {
            if !self.crossing_active(root) || seen[root] {
                continue;
            }
            seen[root] = true;
            visit(DartVisit {
                dart: None,
                tail: root,
                head: root,
            });
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (c, next_port) = *top;
                if next_port == Port::ALL.len() {
                    stack.pop();
                    continue;
                }
                top.1 += 1;

                let port = Port::from_index(next_port);
                let d = Dart::new(self.port_arc(c, port), port.is_out());
                let Some(to) = self.dart_finish(d) else {
                    continue;
                };
                if seen[to.crossing] {
                    continue;
                }
                seen[to.crossing] = true;
                visit(DartVisit {
                    dart: Some(d),
                    tail: c,
                    head: to.crossing,
                });
                stack.push((to.crossing, 0));
            }
        }
    }

    /// Connected component of every crossing slot (`None` for inactive slots) and the
    /// number of components.
    pub fn components(&self) -> (Vec<Option<usize>>, usize) {
        let mut component = vec![None; self.crossing_slots()];
        let mut count = 0;
        self.depth_first_search(|v| {
            if v.is_root() {
                count += 1;
            }
            component[v.head] = Some(count - 1);
        });
        (component, count)
    }
}
