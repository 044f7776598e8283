//! Six fixed, rotated gradient glows that sit behind the background grid.

use glam::{Vec2, Vec4};

/// Blur radius shared by every glow, in pixels.
pub const GLOW_BLUR: f32 = 64.0;

const VIOLET: [f32; 3] = [0.616, 0.306, 0.867]; // #9d4edd
const PURPLE: [f32; 3] = [0.482, 0.173, 0.749]; // #7b2cbf
const LILAC: [f32; 3] = [0.78, 0.49, 1.0]; // #c77dff

/// Distance from a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inset {
    Px(f32),
    /// Share of the viewport extent along the same axis.
    Fraction(f32),
}

impl Inset {
    fn resolve(self, extent: f32) -> f32 {
        match self {
            Inset::Px(px) => px,
            Inset::Fraction(share) => share * extent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HAnchor {
    Left(Inset),
    Right(Inset),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VAnchor {
    Top(Inset),
    Bottom(Inset),
}

/// A blurred rectangle filled with a linear gradient from `color` to transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBeam {
    pub horizontal: HAnchor,
    pub vertical: VAnchor,
    /// Unrotated width and height in pixels.
    pub size: Vec2,
    /// Clockwise on screen, around the rectangle's centre.
    pub rotation_degrees: f32,
    /// Direction the gradient runs towards, in the rectangle's own frame.
    /// Components are -1, 0 or 1: `(1, 1)` fades towards the bottom-right corner.
    pub fade: Vec2,
    pub color: Vec4,
}

impl LightBeam {
    const fn new(
        horizontal: HAnchor,
        vertical: VAnchor,
        size: Vec2,
        rotation_degrees: f32,
        fade: Vec2,
        rgb: [f32; 3],
        alpha: f32,
    ) -> Self {
        Self {
            horizontal,
            vertical,
            size,
            rotation_degrees,
            fade,
            color: Vec4::new(rgb[0], rgb[1], rgb[2], alpha),
        }
    }

    /// Top-left corner of the unrotated rectangle.
    pub fn origin(&self, viewport: Vec2) -> Vec2 {
        let x = match self.horizontal {
            HAnchor::Left(inset) => inset.resolve(viewport.x),
            HAnchor::Right(inset) => viewport.x - inset.resolve(viewport.x) - self.size.x,
        };
        let y = match self.vertical {
            VAnchor::Top(inset) => inset.resolve(viewport.y),
            VAnchor::Bottom(inset) => viewport.y - inset.resolve(viewport.y) - self.size.y,
        };
        Vec2::new(x, y)
    }

    pub fn center(&self, viewport: Vec2) -> Vec2 {
        self.origin(viewport) + self.size / 2.0
    }

    pub fn rotation(&self) -> f32 {
        self.rotation_degrees.to_radians()
    }
}

/// Back to front; the corner glows first, then the two side glows.
pub const LIGHT_BEAMS: [LightBeam; 6] = [
    LightBeam::new(
        HAnchor::Left(Inset::Px(-80.0)),
        VAnchor::Top(Inset::Px(-80.0)),
        Vec2::new(300.0, 500.0),
        45.0,
        Vec2::new(1.0, 1.0),
        VIOLET,
        0.2,
    ),
    LightBeam::new(
        HAnchor::Right(Inset::Px(0.0)),
        VAnchor::Top(Inset::Px(-160.0)),
        Vec2::new(400.0, 600.0),
        -30.0,
        Vec2::new(-1.0, 1.0),
        PURPLE,
        0.15,
    ),
    LightBeam::new(
        HAnchor::Left(Inset::Px(-80.0)),
        VAnchor::Bottom(Inset::Px(0.0)),
        Vec2::new(300.0, 400.0),
        -15.0,
        Vec2::new(1.0, -1.0),
        LILAC,
        0.1,
    ),
    LightBeam::new(
        HAnchor::Right(Inset::Px(0.0)),
        VAnchor::Bottom(Inset::Px(40.0)),
        Vec2::new(500.0, 400.0),
        15.0,
        Vec2::new(-1.0, -1.0),
        VIOLET,
        0.15,
    ),
    LightBeam::new(
        HAnchor::Right(Inset::Px(0.0)),
        VAnchor::Top(Inset::Fraction(1.0 / 3.0)),
        Vec2::new(200.0, 700.0),
        0.0,
        Vec2::new(-1.0, 0.0),
        LILAC,
        0.1,
    ),
    LightBeam::new(
        HAnchor::Left(Inset::Px(-80.0)),
        VAnchor::Top(Inset::Fraction(2.0 / 3.0)),
        Vec2::new(300.0, 500.0),
        0.0,
        Vec2::new(1.0, 0.0),
        PURPLE,
        0.1,
    ),
];
