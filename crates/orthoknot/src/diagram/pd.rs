//! Planar diagram (PD) codes.
//!
//! `X[i,j,k,l]` lists the incoming under-edge first and then the other edges
//! counterclockwise, so `k` is the outgoing under-edge. Edge labels are assumed to increase
//! along each component (cyclically), which decides the direction of the over-strand.

use super::{ArcState, Crossing, CrossingState, PlanarDiagram, Port};
use crate::error::DiagramError;

impl PlanarDiagram {
    /// Build a diagram from a PD code.
    ///
    /// Labels are compacted to arc indices `0..n` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::PdCode`] if a label does not occur exactly twice or the
    /// resulting port tables are inconsistent.
    pub fn from_pd_code(code: &[[i64; 4]]) -> Result<Self, DiagramError> {
        let mut labels: Vec<i64> = code.iter().flatten().copied().collect();
        labels.sort_unstable();
        for run in labels.chunk_by(|x, y| x == y) {
            if run.len() != 2 {
                return Err(DiagramError::PdCode(format!(
                    "label {} occurs {} times",
                    run[0],
                    run.len()
                )));
            }
        }
        labels.dedup();
        let arc_of = |x: i64| labels.partition_point(|&y| y < x);

        let mut crossings = Vec::with_capacity(code.len());
        for &[i, j, k, l] in code {
            let mut arcs = [0; 4];
            // Over-strand runs j → l. Labels span all of i64, so compare in i128.
            let (jw, lw) = (i128::from(j), i128::from(l));
            let state = if lw == jw + 1 || jw - lw > 1 {
                arcs[Port::InLeft.index()] = arc_of(i);
                arcs[Port::InRight.index()] = arc_of(j);
                arcs[Port::OutRight.index()] = arc_of(k);
                arcs[Port::OutLeft.index()] = arc_of(l);
                CrossingState::LeftHanded
            } else {
                arcs[Port::InRight.index()] = arc_of(i);
                arcs[Port::OutRight.index()] = arc_of(j);
                arcs[Port::OutLeft.index()] = arc_of(k);
                arcs[Port::InLeft.index()] = arc_of(l);
                CrossingState::RightHanded
            };
            crossings.push(Crossing::new(arcs, state));
        }

        let arc_states = vec![ArcState::Active; labels.len()];
        Self::new(crossings, arc_states).map_err(|e| DiagramError::PdCode(e.to_string()))
    }
}

/// Read a PD code from text: every run of integers is grouped into quadruples.
///
/// Accepts `PD[X[1,4,2,5], X[3,6,4,1], X[5,2,6,3]]` as well as JSON `[[1,4,2,5], ...]`.
///
/// # Errors
///
/// Returns [`DiagramError::PdCode`] when the number of integers is not a multiple of four
/// or a number does not parse.
pub fn parse_pd_code(text: &str) -> Result<Vec<[i64; 4]>, DiagramError> {
    let mut numbers = Vec::new();
    let mut token = String::new();
    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() || (ch == '-' && token.is_empty()) {
            token.push(ch);
        } else if !token.is_empty() {
            let x = token
                .parse::<i64>()
                .map_err(|e| DiagramError::PdCode(format!("bad number {token:?}: {e}")))?;
            numbers.push(x);
            token.clear();
        }
    }
    if numbers.len() % 4 != 0 {
        return Err(DiagramError::PdCode(format!(
            "{} labels do not form quadruples",
            numbers.len()
        )));
    }
    Ok(numbers
        .chunks_exact(4)
        .map(|q| [q[0], q[1], q[2], q[3]])
        .collect())
}
