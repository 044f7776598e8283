//! Windowless run: scripted pointer, real tick thread, per-frame composition.

use std::time::Duration;

use glam::Vec2;
use serde::Serialize;
use stardust_core::render::{self, instance_bytes, Frame, Layer};
use stardust_core::{Backdrop, EngineConfig, EntropySource, TrailEngine};
use stardust_platform::{
    Forwarder, HostEvent, IntervalTicker, MonotonicClock, Result, TrailSession,
};
use tracing::{debug, info};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
/// Radians the scripted pointer advances per frame.
const POINTER_STEP: f32 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub frame: usize,
    pub elapsed_ms: u64,
    pub ticks: u64,
    pub pointer: Vec2,
    pub particles: usize,
    pub stars: usize,
    pub halos: usize,
    pub light_beams: usize,
    pub lines: usize,
    pub instance_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: usize,
    pub peak_particles: usize,
    pub last: Option<FrameSummary>,
    /// Every shape of the final frame, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
}

fn pointer_at(frame: usize) -> Vec2 {
    let radius = VIEWPORT.min_element() / 3.0;
    let angle = frame as f32 * POINTER_STEP;
    VIEWPORT / 2.0 + Vec2::new(angle.cos(), angle.sin()) * radius
}

pub fn run(config: &EngineConfig, frames: usize, dump_frame: bool) -> Result<RunSummary> {
    let mut rng = EntropySource::from_seed_option(config.seed);
    let backdrop = Backdrop::generate(config, &mut rng);
    let scene = backdrop.scene(config, VIEWPORT);

    let pointer = Forwarder::new();
    let engine = TrailEngine::new(
        config.trail.clone(),
        EntropySource::from_seed_option(config.seed.map(|seed| seed.wrapping_add(1))),
    );
    let mut session = TrailSession::new(
        engine,
        pointer.clone(),
        IntervalTicker::new(config.trail.tick_period()),
        MonotonicClock::new(),
    );
    session.start()?;
    info!(frames, stars = backdrop.field.len(), "headless run started");

    let mut summary = RunSummary {
        frames,
        peak_particles: 0,
        last: None,
        frame: None,
    };
    for frame in 0..frames {
        pointer.forward(HostEvent::moved(pointer_at(frame), session.now()));
        std::thread::sleep(FRAME_INTERVAL);
        session.pump();

        let now = session.now();
        let snapshot = session.snapshot();
        let composed = render::compose(&scene, snapshot, now, now);
        let instances = composed.instances();
        let frame_summary = FrameSummary {
            frame,
            elapsed_ms: now.as_millis() as u64,
            ticks: session.engine().ticks(),
            pointer: snapshot.pointer,
            particles: composed.count(Layer::Dust),
            stars: composed.count(Layer::Star),
            halos: composed.count(Layer::Halo),
            light_beams: composed.count(Layer::Light),
            lines: composed.count(Layer::Line),
            instance_bytes: instance_bytes(&instances).len(),
        };
        debug!(frame, particles = frame_summary.particles, "frame composed");
        summary.peak_particles = summary.peak_particles.max(frame_summary.particles);
        summary.last = Some(frame_summary);
        if dump_frame && frame + 1 == frames {
            summary.frame = Some(composed);
        }
    }

    session.stop()?;
    info!(peak_particles = summary.peak_particles, "headless run finished");
    Ok(summary)
}
