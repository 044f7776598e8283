use glam::{Vec2, Vec4};
use stardust_core::render::{self, gradient_corners, Frame, Geometry};
use stardust_core::{Backdrop, EngineConfig, EntropySource, TrailEngine};
use stardust_platform::{Forwarder, HostEvent, IntervalTicker, MonotonicClock, TrailSession};
use tracing::info;

/// Opens the background window and blocks until it is closed.
pub fn run_window(config: EngineConfig) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Stardust",
        native_options,
        Box::new(move |_creation_context| {
            let app = StardustApp::new(config)?;
            Ok(Box::new(app))
        }),
    )
}

pub struct StardustApp {
    config: EngineConfig,
    backdrop: Backdrop,
    session: TrailSession<EntropySource>,
    pointer: Forwarder,
}

impl StardustApp {
    pub fn new(config: EngineConfig) -> stardust_platform::Result<Self> {
        let mut rng = EntropySource::from_seed_option(config.seed);
        let backdrop = Backdrop::generate(&config, &mut rng);
        let engine = TrailEngine::new(
            config.trail.clone(),
            EntropySource::from_seed_option(config.seed.map(|seed| seed.wrapping_add(1))),
        );
        let pointer = Forwarder::new();
        let mut session = TrailSession::new(
            engine,
            pointer.clone(),
            IntervalTicker::new(config.trail.tick_period()),
            MonotonicClock::new(),
        );
        session.start()?;
        info!(
            stars = backdrop.field.len(),
            lines = backdrop.lines.len(),
            "stardust window ready"
        );
        Ok(Self {
            config,
            backdrop,
            session,
            pointer,
        })
    }

    /// Forwards every pointer move egui saw this frame, not just the last one.
    fn forward_pointer(&mut self, context: &egui::Context) {
        let origin = context.available_rect().min;
        let at = self.session.now();
        let events = context.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::PointerMoved(pos) = event {
                let local = pos - origin;
                self.pointer
                    .forward(HostEvent::moved(Vec2::new(local.x, local.y), at));
            }
        }
    }
}

impl eframe::App for StardustApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        self.forward_pointer(context);
        self.session.pump();

        let background = to_color32(self.config.palette.background);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(context, |ui| {
                let rect = ui.max_rect();
                let scene = self
                    .backdrop
                    .scene(&self.config, Vec2::new(rect.width(), rect.height()));
                let now = self.session.now();
                let frame = render::compose(&scene, self.session.snapshot(), now, now);
                paint(ui.painter(), rect.min, &frame);
            });

        // The trail and star pulse animate continuously.
        context.request_repaint();
    }
}

fn paint(painter: &egui::Painter, origin: egui::Pos2, frame: &Frame) {
    let at = |p: Vec2| origin + egui::vec2(p.x, p.y);
    for shape in &frame.shapes {
        let color = to_color32(shape.color);
        if color.a() == 0 {
            continue;
        }
        match shape.geometry {
            Geometry::Disc { center, diameter } => {
                painter.circle_filled(at(center), diameter / 2.0, color);
            }
            Geometry::Line { from, to, width } => {
                painter.line_segment([at(from), at(to)], egui::Stroke::new(width, color));
            }
            Geometry::Gradient {
                center,
                size,
                rotation,
                fade,
                blur,
            } => {
                let corners = gradient_corners(center, size, rotation, fade);
                painter.add(egui::Shape::mesh(gradient_mesh(
                    &corners,
                    center,
                    blur,
                    shape.color,
                    at,
                )));
            }
        }
    }
}

/// Inner quad carries the gradient; an outer ring fades it to nothing over `blur`.
fn gradient_mesh(
    corners: &[(Vec2, f32); 4],
    center: Vec2,
    blur: f32,
    color: Vec4,
    at: impl Fn(Vec2) -> egui::Pos2,
) -> egui::Mesh {
    let mut mesh = egui::Mesh::default();
    for &(pos, share) in corners {
        let tint = Vec4::new(color.x, color.y, color.z, color.w * share);
        mesh.colored_vertex(at(pos), to_color32(tint));
    }
    for &(pos, _) in corners {
        let outward = (pos - center).normalize_or_zero() * blur;
        mesh.colored_vertex(at(pos + outward), egui::Color32::TRANSPARENT);
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    for i in 0..4 {
        let j = (i + 1) % 4;
        mesh.add_triangle(i, j, j + 4);
        mesh.add_triangle(i, j + 4, i + 4);
    }
    mesh
}

fn to_color32(color: Vec4) -> egui::Color32 {
    let [r, g, b, a] = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round().to_array();
    egui::Color32::from_rgba_unmultiplied(r as u8, g as u8, b as u8, a as u8)
}
