//! Shared fixtures and a log capture helper for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use crate::diagram::{ArcState, Braid, Crossing, CrossingState, PlanarDiagram};

/// Closure of `σ1` on two strands: one crossing, arcs 2 and 3 active, faces `[4, 7]`, `[5]`, `[6]`.
pub(crate) fn figure_eight() -> PlanarDiagram {
    Braid::new(2, vec![1]).unwrap().closure().unwrap()
}

pub(crate) fn trefoil() -> PlanarDiagram {
    PlanarDiagram::from_pd_code(&[[1, 4, 2, 5], [3, 6, 4, 1], [5, 2, 6, 3]]).unwrap()
}

/// Two disjoint figure-eight curves, one right-handed and one left-handed crossing.
pub(crate) fn two_loops() -> PlanarDiagram {
    PlanarDiagram::new(
        vec![
            Crossing::new([1, 0, 0, 1], CrossingState::RightHanded),
            Crossing::new([3, 2, 2, 3], CrossingState::LeftHanded),
        ],
        vec![ArcState::Active; 4],
    )
    .unwrap()
}

#[derive(Clone, Default)]
struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local fmt subscriber and return its result plus the log text.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = LogBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (out, text)
}
