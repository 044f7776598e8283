//! One-shot star field generation and the per-star pulse curve.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::random::{uniform, RandomSource};

/// Stars above this draw are placed near an edge.
const EDGE_THRESHOLD: f32 = 0.6;
const SHINY_THRESHOLD: f32 = 0.5;
/// Width of the edge band, in percent of the viewport.
const EDGE_BAND: f32 = 15.0;
const PERCENT: f32 = 100.0;
/// Peak scale reached at the top of a pulse.
const PULSE_SCALE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    fn pick(rng: &mut impl RandomSource) -> Self {
        let index = (rng.next_f32() * Self::ALL.len() as f32) as usize;
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// `(left, top)` with one axis pinned to this edge's band.
    fn place(self, rng: &mut impl RandomSource) -> (f32, f32) {
        let far = PERCENT - EDGE_BAND;
        match self {
            Edge::Top => {
                let left = uniform(rng, 0.0, PERCENT);
                (left, uniform(rng, 0.0, EDGE_BAND))
            }
            Edge::Right => {
                let left = uniform(rng, far, PERCENT);
                (left, uniform(rng, 0.0, PERCENT))
            }
            Edge::Bottom => {
                let left = uniform(rng, 0.0, PERCENT);
                (left, uniform(rng, far, PERCENT))
            }
            Edge::Left => {
                let left = uniform(rng, 0.0, EDGE_BAND);
                (left, uniform(rng, 0.0, PERCENT))
            }
        }
    }
}

/// A background star. Coordinates are percentages of the viewport, timing in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarDescriptor {
    pub id: usize,
    pub size: f32,
    pub left: f32,
    pub top: f32,
    pub delay: f32,
    pub duration: f32,
    pub is_edge: bool,
    pub is_shiny: bool,
}

impl StarDescriptor {
    /// Opacity and scale at `elapsed` seconds since the field was shown.
    ///
    /// Invisible until `delay`, then a triangular `0 -> 1 -> 0` pulse repeating
    /// every `duration`.
    pub fn pulse_at(&self, elapsed: f32) -> (f32, f32) {
        let local = elapsed - self.delay;
        if local < 0.0 || self.duration <= 0.0 {
            return (0.0, 1.0);
        }
        let phase = (local % self.duration) / self.duration;
        let opacity = 1.0 - (2.0 * phase - 1.0).abs();
        (opacity, 1.0 + PULSE_SCALE * opacity)
    }
}

/// Generates `count` stars with ids `0..count`.
pub fn generate(count: usize, rng: &mut impl RandomSource) -> Vec<StarDescriptor> {
    let stars: Vec<StarDescriptor> = (0..count).map(|id| generate_star(id, rng)).collect();
    debug!(
        count,
        edge = stars.iter().filter(|s| s.is_edge).count(),
        "generated star field"
    );
    stars
}

fn generate_star(id: usize, rng: &mut impl RandomSource) -> StarDescriptor {
    let is_edge = rng.next_f32() > EDGE_THRESHOLD;
    let (left, top) = if is_edge {
        Edge::pick(rng).place(rng)
    } else {
        let left = uniform(rng, 0.0, PERCENT);
        (left, uniform(rng, 0.0, PERCENT))
    };
    let size = if is_edge {
        uniform(rng, 2.0, 6.0)
    } else {
        uniform(rng, 1.0, 4.0)
    };
    let delay = uniform(rng, 0.0, 2.0);
    let duration = uniform(rng, 2.0, 5.0);
    let is_shiny = is_edge && rng.next_f32() > SHINY_THRESHOLD;

    StarDescriptor {
        id,
        size,
        left,
        top,
        delay,
        duration,
        is_edge,
        is_shiny,
    }
}

/// Holds a generated field; regenerates only when the requested count changes.
#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<StarDescriptor>,
}

impl StarField {
    pub fn new(count: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            stars: generate(count, rng),
        }
    }

    /// Returns `true` when the field was replaced.
    pub fn ensure_count(&mut self, count: usize, rng: &mut impl RandomSource) -> bool {
        if self.stars.len() == count {
            return false;
        }
        self.stars = generate(count, rng);
        true
    }

    pub fn stars(&self) -> &[StarDescriptor] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
