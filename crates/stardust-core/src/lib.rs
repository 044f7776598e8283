//! Stardust core engine: platform-agnostic star field, cursor trail and frame composition.

pub mod config;
pub mod field;
pub mod light;
pub mod lines;
pub mod random;
pub mod render;
pub mod trail;

pub use config::{ConfigError, EngineConfig, FieldPreset, LinePreset, Palette, TrailPreset};
pub use field::{StarDescriptor, StarField};
pub use light::{LightBeam, LIGHT_BEAMS};
pub use lines::{Line, LineKind};
pub use random::{EntropySource, RandomSource, SequenceSource};
pub use render::{Frame, Geometry, Layer, Scene, Shape, ShapeInstance};
pub use trail::{DustParticle, ParticleId, TrailEngine, TrailSnapshot};

/// Everything generated once per display: the star field and the background grid.
pub struct Backdrop {
    pub field: StarField,
    pub lines: Vec<Line>,
}

impl Backdrop {
    pub fn generate(config: &EngineConfig, rng: &mut impl RandomSource) -> Self {
        Self {
            field: StarField::new(config.field.star_count, rng),
            lines: lines::generate(&config.lines, rng),
        }
    }

    /// The fixed light beams are drawn under the generated backdrop.
    pub fn scene<'a>(&'a self, config: &'a EngineConfig, viewport: glam::Vec2) -> Scene<'a> {
        Scene {
            stars: self.field.stars(),
            light: &LIGHT_BEAMS,
            lines: &self.lines,
            palette: &config.palette,
            trail: &config.trail,
            viewport,
        }
    }
}
