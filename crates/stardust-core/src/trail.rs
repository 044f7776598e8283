//! Cursor trail: pointer-driven particle spawning with tick-based decay.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::TrailPreset;
use crate::random::{centered, uniform, RandomSource};

/// Half-width of the drift start offset.
const DRIFT_START: f32 = 15.0;
/// Half-width of the drift end offset.
const DRIFT_END: f32 = 30.0;
/// Extra downward pull applied to the drift end.
const DRIFT_FALL: f32 = 20.0;

/// Clock milliseconds at spawn plus a per-millisecond index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId {
    pub millis: u64,
    pub index: u32,
}

/// One-shot render offset, played from `from` to `to` after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub from: Vec2,
    pub to: Vec2,
}

impl Drift {
    fn sample(rng: &mut impl RandomSource) -> Self {
        let from_x = centered(rng, DRIFT_START);
        let to_x = centered(rng, DRIFT_END);
        let from_y = centered(rng, DRIFT_START);
        let to_y = centered(rng, DRIFT_END) + DRIFT_FALL;
        Self {
            from: Vec2::new(from_x, from_y),
            to: Vec2::new(to_x, to_y),
        }
    }

    /// Offset at `progress` in `[0, 1]`, eased out.
    pub fn offset_at(&self, progress: f32) -> Vec2 {
        self.from.lerp(self.to, ease_out(progress))
    }
}

pub fn ease_out(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustParticle {
    pub id: ParticleId,
    /// Pixel position at spawn.
    pub pos: Vec2,
    pub size: f32,
    /// Remaining ticks, always positive while held by the engine.
    pub life: u32,
    /// Host clock time at spawn.
    pub born: Duration,
    pub drift: Drift,
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct TrailSnapshot<'a> {
    pub pointer: Vec2,
    pub particles: &'a [DustParticle],
    pub max_life: u32,
}

impl TrailSnapshot<'_> {
    pub fn opacity(&self, particle: &DustParticle) -> f32 {
        particle.life as f32 / self.max_life as f32
    }
}

/// Single-owner trail state. Every mutation goes through `handle_move` or `handle_tick`.
pub struct TrailEngine<R> {
    preset: TrailPreset,
    rng: R,
    pointer: Vec2,
    particles: Vec<DustParticle>,
    last_stamp: Option<ParticleId>,
    ticks: u64,
}

impl<R: RandomSource> TrailEngine<R> {
    pub fn new(preset: TrailPreset, rng: R) -> Self {
        Self {
            preset,
            rng,
            pointer: Vec2::ZERO,
            particles: Vec::new(),
            last_stamp: None,
            ticks: 0,
        }
    }

    pub fn preset(&self) -> &TrailPreset {
        &self.preset
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    /// Ticks processed since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Records the pointer and spawns `spawn_per_move` particles around it.
    pub fn handle_move(&mut self, pos: Vec2, now: Duration) {
        self.pointer = pos;
        self.particles.reserve(self.preset.spawn_per_move);
        for _ in 0..self.preset.spawn_per_move {
            let id = self.next_id(now);
            let jitter_x = centered(&mut self.rng, self.preset.jitter);
            let jitter_y = centered(&mut self.rng, self.preset.jitter);
            let size = uniform(&mut self.rng, self.preset.size_min, self.preset.size_max);
            let drift = Drift::sample(&mut self.rng);
            self.particles.push(DustParticle {
                id,
                pos: pos + Vec2::new(jitter_x, jitter_y),
                size,
                life: self.preset.max_life,
                born: now,
                drift,
            });
        }
    }

    /// Ages every particle by one tick, then drops the expired ones.
    pub fn handle_tick(&mut self) {
        self.ticks += 1;
        for particle in &mut self.particles {
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|particle| particle.life > 0);
    }

    pub fn snapshot(&self) -> TrailSnapshot<'_> {
        TrailSnapshot {
            pointer: self.pointer,
            particles: &self.particles,
            max_life: self.preset.max_life,
        }
    }

    /// Back to the freshly constructed state; the random source is kept.
    pub fn reset(&mut self) {
        self.pointer = Vec2::ZERO;
        self.particles.clear();
        self.last_stamp = None;
        self.ticks = 0;
    }

    fn next_id(&mut self, now: Duration) -> ParticleId {
        let millis = now.as_millis() as u64;
        let id = match self.last_stamp {
            // A clock that stalls or steps backwards keeps counting on the last stamp.
            Some(last) if millis <= last.millis => ParticleId {
                millis: last.millis,
                index: last.index + 1,
            },
            _ => ParticleId { millis, index: 0 },
        };
        self.last_stamp = Some(id);
        id
    }
}
