//! Faint background grid of horizontal, vertical and diagonal lines.

use crate::config::LinePreset;
use crate::random::{uniform, RandomSource};

const GRID_STEP: f32 = 10.0;
const GRID_JITTER: f32 = 5.0;
const DIAGONAL_STEP: f32 = 20.0;
const DIAGONAL_JITTER: f32 = 10.0;
const DIAGONAL_TOP_RANGE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Full-width line; `offset` is the distance from the top.
    Horizontal,
    /// Full-height line; `offset` is the distance from the left.
    Vertical,
    /// 45 degree line rising to the right from (`offset`, `top`).
    Diagonal,
}

/// Positions are percentages of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub offset: f32,
    pub top: f32,
}

pub fn generate(preset: &LinePreset, rng: &mut impl RandomSource) -> Vec<Line> {
    let mut lines = Vec::with_capacity(preset.horizontal + preset.vertical + preset.diagonal);
    for i in 0..preset.horizontal {
        lines.push(Line {
            kind: LineKind::Horizontal,
            offset: i as f32 * GRID_STEP + uniform(rng, 0.0, GRID_JITTER),
            top: 0.0,
        });
    }
    for i in 0..preset.vertical {
        lines.push(Line {
            kind: LineKind::Vertical,
            offset: i as f32 * GRID_STEP + uniform(rng, 0.0, GRID_JITTER),
            top: 0.0,
        });
    }
    for i in 0..preset.diagonal {
        let offset = i as f32 * DIAGONAL_STEP + uniform(rng, 0.0, DIAGONAL_JITTER);
        lines.push(Line {
            kind: LineKind::Diagonal,
            offset,
            top: uniform(rng, 0.0, DIAGONAL_TOP_RANGE),
        });
    }
    lines
}
