//! Pure frame composition. Turns generated state into an ordered shape list.

use std::f32::consts::FRAC_1_SQRT_2;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use serde::Serialize;

use crate::config::{Palette, TrailPreset};
use crate::field::StarDescriptor;
use crate::light::{LightBeam, GLOW_BLUR};
use crate::lines::{Line, LineKind};
use crate::trail::{ease_out, TrailSnapshot};

const HALO_SCALE: f32 = 3.0;
const HALO_ALPHA: f32 = 0.3;
const LINE_WIDTH: f32 = 1.0;
/// Diagonal lines are twice the viewport height long.
const DIAGONAL_LENGTH: f32 = 2.0;

/// Draw order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Layer {
    Light,
    Line,
    Star,
    Halo,
    Glow,
    Dust,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Geometry {
    Disc { center: Vec2, diameter: f32 },
    Line { from: Vec2, to: Vec2, width: f32 },
    /// Rotated rectangle filled from `color` at the start of `fade` to transparent,
    /// feathered by `blur` pixels.
    Gradient {
        center: Vec2,
        size: Vec2,
        rotation: f32,
        fade: Vec2,
        blur: f32,
    },
}

/// Corners of a gradient rectangle in viewport pixels, clockwise from its own
/// top-left, each with its share of the gradient colour.
pub fn gradient_corners(center: Vec2, size: Vec2, rotation: f32, fade: Vec2) -> [(Vec2, f32); 4] {
    let turn = Vec2::from_angle(rotation);
    let steps = fade.x.abs() + fade.y.abs();
    [
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ]
    .map(|corner| {
        let along = if steps > 0.0 {
            (corner.dot(fade) / steps + 1.0) / 2.0
        } else {
            0.0
        };
        (center + turn.rotate(corner * size / 2.0), 1.0 - along)
    })
}

/// A drawable primitive in viewport pixels. `color.w` already carries the opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shape {
    pub layer: Layer,
    pub geometry: Geometry,
    pub color: Vec4,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub shapes: Vec<Shape>,
}

impl Frame {
    pub fn count(&self, layer: Layer) -> usize {
        self.shapes.iter().filter(|s| s.layer == layer).count()
    }

    pub fn instances(&self) -> Vec<ShapeInstance> {
        self.shapes.iter().map(ShapeInstance::from).collect()
    }
}

/// Flat per-instance record for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// Disc or gradient centre, or line start.
    pub a: [f32; 2],
    /// Line end, or gradient size; zero for discs.
    pub b: [f32; 2],
    /// Gradient fade direction.
    pub c: [f32; 2],
    pub color: [f32; 4],
    /// Disc diameter, line width or gradient rotation in radians.
    pub param: f32,
    pub blur: f32,
    /// 0 = disc, 1 = line, 2 = gradient.
    pub kind: u32,
    pub layer: u32,
}

impl From<&Shape> for ShapeInstance {
    fn from(shape: &Shape) -> Self {
        let (a, b, c, param, blur, kind) = match shape.geometry {
            Geometry::Disc { center, diameter } => {
                (center, Vec2::ZERO, Vec2::ZERO, diameter, 0.0, 0)
            }
            Geometry::Line { from, to, width } => (from, to, Vec2::ZERO, width, 0.0, 1),
            Geometry::Gradient {
                center,
                size,
                rotation,
                fade,
                blur,
            } => (center, size, fade, rotation, blur, 2),
        };
        Self {
            a: a.to_array(),
            b: b.to_array(),
            c: c.to_array(),
            color: shape.color.to_array(),
            param,
            blur,
            kind,
            layer: shape.layer as u32,
        }
    }
}

pub fn instance_bytes(instances: &[ShapeInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Static inputs of a frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub stars: &'a [StarDescriptor],
    pub light: &'a [LightBeam],
    pub lines: &'a [Line],
    pub palette: &'a Palette,
    pub trail: &'a TrailPreset,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

/// Composes a frame at host time `now`; `elapsed` drives the star pulse.
pub fn compose(scene: &Scene<'_>, trail: TrailSnapshot<'_>, now: Duration, elapsed: Duration) -> Frame {
    let mut frame = Frame {
        shapes: Vec::with_capacity(
            scene.light.len()
                + scene.lines.len()
                + scene.stars.len() * 2
                + trail.particles.len()
                + 1,
        ),
    };
    push_light(&mut frame, scene);
    push_lines(&mut frame, scene);
    push_stars(&mut frame, scene, elapsed.as_secs_f32());
    push_trail(&mut frame, scene, trail, now);
    frame
}

fn percent_to_px(viewport: Vec2, left: f32, top: f32) -> Vec2 {
    Vec2::new(left, top) / 100.0 * viewport
}

fn with_alpha(color: Vec4, opacity: f32) -> Vec4 {
    Vec4::new(color.x, color.y, color.z, color.w * opacity.clamp(0.0, 1.0))
}

fn push_light(frame: &mut Frame, scene: &Scene<'_>) {
    for beam in scene.light {
        frame.shapes.push(Shape {
            layer: Layer::Light,
            geometry: Geometry::Gradient {
                center: beam.center(scene.viewport),
                size: beam.size,
                rotation: beam.rotation(),
                fade: beam.fade,
                blur: GLOW_BLUR,
            },
            color: beam.color,
        });
    }
}

fn push_lines(frame: &mut Frame, scene: &Scene<'_>) {
    let Vec2 { x: width, y: height } = scene.viewport;
    for line in scene.lines {
        let (from, to) = match line.kind {
            LineKind::Horizontal => {
                let y = line.offset / 100.0 * height;
                (Vec2::new(0.0, y), Vec2::new(width, y))
            }
            LineKind::Vertical => {
                let x = line.offset / 100.0 * width;
                (Vec2::new(x, 0.0), Vec2::new(x, height))
            }
            LineKind::Diagonal => {
                let length = DIAGONAL_LENGTH * height;
                let anchor = percent_to_px(scene.viewport, line.offset, line.top);
                let from = anchor + Vec2::new(0.0, length);
                (from, from + Vec2::new(1.0, -1.0) * length * FRAC_1_SQRT_2)
            }
        };
        frame.shapes.push(Shape {
            layer: Layer::Line,
            geometry: Geometry::Line {
                from,
                to,
                width: LINE_WIDTH,
            },
            color: scene.palette.line,
        });
    }
}

fn push_stars(frame: &mut Frame, scene: &Scene<'_>, elapsed: f32) {
    for star in scene.stars {
        let (opacity, scale) = star.pulse_at(elapsed);
        let center = percent_to_px(scene.viewport, star.left, star.top);
        let diameter = star.size * scale;
        frame.shapes.push(Shape {
            layer: Layer::Star,
            geometry: Geometry::Disc { center, diameter },
            color: with_alpha(scene.palette.star, opacity),
        });
        if star.is_shiny {
            frame.shapes.push(Shape {
                layer: Layer::Halo,
                geometry: Geometry::Disc {
                    center,
                    diameter: diameter * HALO_SCALE,
                },
                color: with_alpha(scene.palette.star, opacity * HALO_ALPHA),
            });
        }
    }
}

fn push_trail(frame: &mut Frame, scene: &Scene<'_>, trail: TrailSnapshot<'_>, now: Duration) {
    frame.shapes.push(Shape {
        layer: Layer::Glow,
        geometry: Geometry::Disc {
            center: trail.pointer,
            diameter: scene.trail.glow_diameter,
        },
        color: scene.palette.glow,
    });
    for particle in trail.particles {
        let age = now.saturating_sub(particle.born).as_secs_f32();
        let progress = age / scene.trail.drift_seconds;
        let fade = 1.0 - ease_out(progress);
        frame.shapes.push(Shape {
            layer: Layer::Dust,
            geometry: Geometry::Disc {
                center: particle.pos + particle.drift.offset_at(progress),
                diameter: particle.size,
            },
            color: with_alpha(scene.palette.dust, trail.opacity(particle) * fade),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LIGHT_BEAMS;
    use crate::trail::{DustParticle, Drift, ParticleId};

    fn star(shiny: bool) -> StarDescriptor {
        StarDescriptor {
            id: 0,
            size: 4.0,
            left: 50.0,
            top: 25.0,
            delay: 0.0,
            duration: 2.0,
            is_edge: shiny,
            is_shiny: shiny,
        }
    }

    fn particle(life: u32) -> DustParticle {
        DustParticle {
            id: ParticleId { millis: 0, index: 0 },
            pos: Vec2::new(10.0, 10.0),
            size: 2.0,
            life,
            born: Duration::ZERO,
            drift: Drift {
                from: Vec2::ZERO,
                to: Vec2::new(0.0, 20.0),
            },
        }
    }

    fn scene<'a>(
        stars: &'a [StarDescriptor],
        lines: &'a [Line],
        palette: &'a Palette,
        trail: &'a TrailPreset,
    ) -> Scene<'a> {
        Scene {
            stars,
            light: &[],
            lines,
            palette,
            trail,
            viewport: Vec2::new(800.0, 400.0),
        }
    }

    #[test]
    fn star_maps_percentages_to_pixels_and_pulses() {
        let stars = [star(false)];
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&stars, &[], &palette, &preset);
        let snapshot = TrailSnapshot {
            pointer: Vec2::ZERO,
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::from_secs(1));
        let shape = frame.shapes.iter().find(|s| s.layer == Layer::Star).unwrap();
        assert_eq!(
            shape.geometry,
            Geometry::Disc {
                center: Vec2::new(400.0, 100.0),
                diameter: 4.8
            }
        );
        assert_eq!(shape.color.w, 1.0);
    }

    #[test]
    fn shiny_stars_get_a_halo() {
        let stars = [star(true), star(false)];
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&stars, &[], &palette, &preset);
        let snapshot = TrailSnapshot {
            pointer: Vec2::ZERO,
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        assert_eq!(frame.count(Layer::Star), 2);
        assert_eq!(frame.count(Layer::Halo), 1);
    }

    #[test]
    fn glow_is_drawn_without_particles() {
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&[], &[], &palette, &preset);
        let snapshot = TrailSnapshot {
            pointer: Vec2::new(5.0, 6.0),
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        assert_eq!(frame.shapes.len(), 1);
        assert_eq!(
            frame.shapes[0].geometry,
            Geometry::Disc {
                center: Vec2::new(5.0, 6.0),
                diameter: 40.0
            }
        );
        assert_eq!(frame.shapes[0].color, palette.glow);
    }

    #[test]
    fn dust_opacity_combines_life_and_drift_fade() {
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&[], &[], &palette, &preset);
        let particles = [particle(10)];
        let snapshot = TrailSnapshot {
            pointer: Vec2::ZERO,
            particles: &particles,
            max_life: 20,
        };

        let fresh = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        let dust = fresh.shapes.iter().find(|s| s.layer == Layer::Dust).unwrap();
        assert!((dust.color.w - palette.dust.w * 0.5).abs() < 1e-6);
        assert_eq!(
            dust.geometry,
            Geometry::Disc {
                center: Vec2::new(10.0, 10.0),
                diameter: 2.0
            }
        );

        let settled = compose(&scene, snapshot, Duration::from_secs(2), Duration::ZERO);
        let dust = settled.shapes.iter().find(|s| s.layer == Layer::Dust).unwrap();
        assert_eq!(dust.color.w, 0.0);
        assert_eq!(
            dust.geometry,
            Geometry::Disc {
                center: Vec2::new(10.0, 30.0),
                diameter: 2.0
            }
        );
    }

    #[test]
    fn lines_span_the_viewport() {
        let lines = [
            Line {
                kind: LineKind::Horizontal,
                offset: 50.0,
                top: 0.0,
            },
            Line {
                kind: LineKind::Vertical,
                offset: 25.0,
                top: 0.0,
            },
        ];
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&[], &lines, &palette, &preset);
        let snapshot = TrailSnapshot {
            pointer: Vec2::ZERO,
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        assert_eq!(frame.count(Layer::Line), 2);
        assert_eq!(
            frame.shapes[0].geometry,
            Geometry::Line {
                from: Vec2::new(0.0, 200.0),
                to: Vec2::new(800.0, 200.0),
                width: 1.0
            }
        );
        assert_eq!(
            frame.shapes[1].geometry,
            Geometry::Line {
                from: Vec2::new(200.0, 0.0),
                to: Vec2::new(200.0, 400.0),
                width: 1.0
            }
        );
    }

    #[test]
    fn instances_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 56);
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = scene(&[], &[], &palette, &preset);
        let snapshot = TrailSnapshot {
            pointer: Vec2::new(1.0, 2.0),
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        let instances = frame.instances();
        assert_eq!(instance_bytes(&instances).len(), 56);
        assert_eq!(instances[0].a, [1.0, 2.0]);
        assert_eq!(instances[0].param, 40.0);
        assert_eq!(instances[0].kind, 0);
        assert_eq!(instances[0].layer, Layer::Glow as u32);
    }

    #[test]
    fn light_beams_are_drawn_behind_the_grid() {
        let lines = [Line {
            kind: LineKind::Horizontal,
            offset: 10.0,
            top: 0.0,
        }];
        let stars = [star(true)];
        let palette = Palette::default();
        let preset = TrailPreset::default();
        let scene = Scene {
            light: &LIGHT_BEAMS,
            ..scene(&stars, &lines, &palette, &preset)
        };
        let snapshot = TrailSnapshot {
            pointer: Vec2::ZERO,
            particles: &[],
            max_life: 20,
        };
        let frame = compose(&scene, snapshot, Duration::ZERO, Duration::ZERO);
        assert_eq!(frame.count(Layer::Light), 6);
        let layers: Vec<Layer> = frame.shapes.iter().map(|s| s.layer).collect();
        assert!(layers[..6].iter().all(|layer| *layer == Layer::Light));
        assert_eq!(layers[6], Layer::Line);

        assert_eq!(
            frame.shapes[0].geometry,
            Geometry::Gradient {
                center: Vec2::new(70.0, 170.0),
                size: Vec2::new(300.0, 500.0),
                rotation: 45f32.to_radians(),
                fade: Vec2::new(1.0, 1.0),
                blur: 64.0,
            }
        );
        assert_eq!(frame.shapes[0].color.w, 0.2);

        let instance = ShapeInstance::from(&frame.shapes[4]);
        assert_eq!(instance.kind, 2);
        assert_eq!(instance.b, [200.0, 700.0]);
        assert_eq!(instance.c, [-1.0, 0.0]);
        assert_eq!(instance.blur, 64.0);
    }

    #[test]
    fn corner_gradient_is_full_at_the_start_and_clear_at_the_end() {
        let corners = gradient_corners(Vec2::ZERO, Vec2::new(4.0, 2.0), 0.0, Vec2::new(1.0, 1.0));
        let opacity: Vec<f32> = corners.iter().map(|(_, o)| *o).collect();
        assert_eq!(opacity, vec![1.0, 0.5, 0.0, 0.5]);
        assert_eq!(corners[0].0, Vec2::new(-2.0, -1.0));
        assert_eq!(corners[2].0, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn side_gradient_fades_across_one_axis() {
        let corners = gradient_corners(Vec2::ZERO, Vec2::new(2.0, 2.0), 0.0, Vec2::new(-1.0, 0.0));
        let opacity: Vec<f32> = corners.iter().map(|(_, o)| *o).collect();
        // fades towards the left edge
        assert_eq!(opacity, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn gradient_corners_turn_clockwise_on_screen() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let corners = gradient_corners(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), quarter, Vec2::X);
        // own top-left (-2, -1) lands at (+1, -2) after a clockwise quarter turn
        let top_left = corners[0].0;
        assert!((top_left - Vec2::new(11.0, 8.0)).length() < 1e-5, "{top_left}");
    }
}
