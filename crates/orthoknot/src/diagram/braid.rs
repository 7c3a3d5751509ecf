//! Braid closures and a reproducible random braid generator.
//!
//! A braid on `n` strands is a word of letters `±i` (`1 ≤ i < n`); `+i` crosses position
//! `i-1` over position `i`, `-i` under. The closure is drawn with strands running upward and
//! the closing strands returning on one side, which gives a plane embedding without further
//! crossings.
//!
//! Generators follow the stream/replay pattern: every sample carries the params snapshot and
//! the seed that regenerates it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use super::{ArcState, Crossing, CrossingState, PlanarDiagram, Port};
use crate::error::DiagramError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Braid {
    strands: usize,
    word: Vec<i32>,
}

impl Braid {
    /// # Errors
    ///
    /// Rejects zero strands and letters outside `±1..strands`.
    pub fn new(strands: usize, word: Vec<i32>) -> Result<Self, DiagramError> {
        if strands == 0 {
            return Err(DiagramError::NoStrands);
        }
        if let Some(&letter) = word
            .iter()
            .find(|&&x| x == 0 || x.unsigned_abs() as usize >= strands)
        {
            return Err(DiagramError::BraidLetter { letter, strands });
        }
        Ok(Self { strands, word })
    }

    /// Parse letters separated by commas or whitespace, e.g. `"1 -2 1"`.
    ///
    /// Without an explicit strand count, the smallest count that fits every letter is used.
    ///
    /// # Errors
    ///
    /// Unparsable letters are reported as [`DiagramError::BraidLetter`] with `letter = 0`.
    pub fn parse(strands: Option<usize>, text: &str) -> Result<Self, DiagramError> {
        let mut word = Vec::new();
        for tok in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if tok.is_empty() {
                continue;
            }
            let letter = tok.parse::<i32>().map_err(|_| DiagramError::BraidLetter {
                letter: 0,
                strands: strands.unwrap_or(0),
            })?;
            word.push(letter);
        }
        let fit = word
            .iter()
            .map(|x| x.unsigned_abs() as usize + 1)
            .max()
            .unwrap_or(1);
        Self::new(strands.unwrap_or(fit), word)
    }

    pub fn strands(&self) -> usize {
        self.strands
    }

    pub fn word(&self) -> &[i32] {
        &self.word
    }

    /// Diagram of the closed braid.
    ///
    /// Arc slots `0..strands` are the arcs entering the braid from below; they are merged into
    /// the closing arcs and remain as inactive slots. One crossing per letter, in word order.
    ///
    /// # Errors
    ///
    /// [`DiagramError::FreeStrand`] if some position takes part in no crossing.
    pub fn closure(&self) -> Result<PlanarDiagram, DiagramError> {
        let n = self.strands;
        let mut touched = vec![false; n];
        for &x in &self.word {
            let i = x.unsigned_abs() as usize;
            touched[i - 1] = true;
            touched[i] = true;
        }
        if let Some(strand) = touched.iter().position(|&t| !t) {
            return Err(DiagramError::FreeStrand { strand });
        }

        // Arc currently occupying each position.
        let mut position: Vec<usize> = (0..n).collect();
        let mut arc_slots = n;
        let mut crossings = Vec::with_capacity(self.word.len());
        for &x in &self.word {
            let i = x.unsigned_abs() as usize - 1;
            let mut arcs = [0; 4];
            arcs[Port::InLeft.index()] = position[i];
            arcs[Port::InRight.index()] = position[i + 1];
            arcs[Port::OutLeft.index()] = arc_slots;
            arcs[Port::OutRight.index()] = arc_slots + 1;
            position[i] = arc_slots;
            position[i + 1] = arc_slots + 1;
            arc_slots += 2;
            let state = if x > 0 {
                CrossingState::RightHanded
            } else {
                CrossingState::LeftHanded
            };
            crossings.push(Crossing::new(arcs, state));
        }

        // Close up: the top arc at position p takes over the head of the bottom arc p.
        let mut arc_states = vec![ArcState::Active; arc_slots];
        for state in arc_states.iter_mut().take(n) {
            *state = ArcState::Inactive;
        }
        for crossing in &mut crossings {
            for port in [Port::InLeft, Port::InRight] {
                let a = crossing.arcs[port.index()];
                if a < n {
                    crossing.arcs[port.index()] = position[a];
                }
            }
        }
        PlanarDiagram::new(crossings, arc_states)
    }
}

/// Parameters of [`RandomBraidGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBraidParams {
    pub strands: usize,
    /// Word length; at least `strands - 1` so every generator can occur.
    pub length: usize,
    /// Probability of a positive letter.
    pub positive_probability: f64,
}

impl RandomBraidParams {
    fn validate(&self) -> Result<(), DiagramError> {
        if self.strands < 2 {
            return Err(DiagramError::InvalidParams("need at least two strands".into()));
        }
        if self.length + 1 < self.strands {
            return Err(DiagramError::InvalidParams(format!(
                "length {} cannot cover {} generators",
                self.length,
                self.strands - 1
            )));
        }
        if !(0.0..=1.0).contains(&self.positive_probability) {
            return Err(DiagramError::InvalidParams(
                "positive_probability must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Replay token storing the seed that regenerates the same braid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedReplay {
    pub seed: u64,
}

/// A single braid plus replay metadata.
#[derive(Clone, Debug)]
pub struct BraidSample {
    pub braid: Braid,
    pub params: RandomBraidParams,
    pub replay: SeedReplay,
}

/// Seeded stream of random braids whose closures are connected diagrams.
pub struct RandomBraidGenerator {
    params: RandomBraidParams,
    master_rng: StdRng,
}

impl RandomBraidGenerator {
    /// # Errors
    ///
    /// [`DiagramError::InvalidParams`] for invalid `params`.
    pub fn new(params: RandomBraidParams, seed: u64) -> Result<Self, DiagramError> {
        params.validate()?;
        Ok(Self {
            params,
            master_rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &RandomBraidParams {
        &self.params
    }

    /// Draw one braid from `seed`. Every generator occurs at least once.
    ///
    /// # Errors
    ///
    /// [`DiagramError::InvalidParams`] for invalid `params`.
    pub fn generate_single(params: &RandomBraidParams, seed: u64) -> Result<Braid, DiagramError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let top = params.strands as i32;
        let mut word: Vec<i32> = (1..top).collect();
        while word.len() < params.length {
            word.push(rng.gen_range(1..top));
        }
        word.shuffle(&mut rng);
        for letter in &mut word {
            if !rng.gen_bool(params.positive_probability) {
                *letter = -*letter;
            }
        }
        Braid::new(params.strands, word)
    }

    /// # Errors
    ///
    /// Propagates [`generate_single`](Self::generate_single) errors.
    pub fn generate_next(&mut self) -> Result<BraidSample, DiagramError> {
        let seed = self.master_rng.next_u64();
        let braid = Self::generate_single(&self.params, seed)?;
        Ok(BraidSample {
            braid,
            params: self.params.clone(),
            replay: SeedReplay { seed },
        })
    }

    /// # Errors
    ///
    /// Propagates [`generate_single`](Self::generate_single) errors.
    pub fn regenerate(&self, replay: &SeedReplay) -> Result<Braid, DiagramError> {
        Self::generate_single(&self.params, replay.seed)
    }
}
