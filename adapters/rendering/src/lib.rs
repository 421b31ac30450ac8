#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hillside adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use hillside_core::{EntityShade, FrameInput, TileKind};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// World-space window presented on screen.
///
/// The viewport's origin is its lower-left corner; screen space grows
/// downward, so projection flips the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// World-space x coordinate of the window's left edge.
    pub left: f32,
    /// World-space y coordinate of the window's bottom edge.
    pub bottom: f32,
    /// Width of the window in world units.
    pub width: f32,
    /// Height of the window in world units.
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    ///
    /// Returns an error when either dimension is not strictly positive.
    pub fn new(
        left: f32,
        bottom: f32,
        width: f32,
        height: f32,
    ) -> std::result::Result<Self, RenderingError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(RenderingError::InvalidViewport { width, height });
        }
        Ok(Self {
            left,
            bottom,
            width,
            height,
        })
    }

    /// World-space x coordinate of the window's right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// World-space y coordinate of the window's top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    /// Reports whether a square of the given size at (left, bottom) is
    /// at least partially visible.
    #[must_use]
    pub fn intersects(&self, left: f32, bottom: f32, size: f32) -> bool {
        left < self.right()
            && self.left < left + size
            && bottom < self.top()
            && self.bottom < bottom + size
    }

    /// Scale factors converting world units to screen pixels.
    #[must_use]
    pub fn scale(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x / self.width, screen.y / self.height)
    }

    /// Projects a world-space point to screen space, flipping the y axis.
    #[must_use]
    pub fn project(&self, point: Vec2, screen: Vec2) -> Vec2 {
        let scale = self.scale(screen);
        Vec2::new(
            (point.x - self.left) * scale.x,
            screen.y - (point.y - self.bottom) * scale.y,
        )
    }
}

/// Terrain tile scheduled for drawing, positioned in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSprite {
    /// Kind of tile; backends map kinds to colors or textures.
    pub kind: TileKind,
    /// World-space x coordinate of the tile's left edge.
    pub left: f32,
    /// World-space y coordinate of the tile's bottom edge.
    pub bottom: f32,
    /// Side length of the square tile in world units.
    pub size: f32,
}

impl TileSprite {
    /// Creates a new tile sprite descriptor.
    #[must_use]
    pub const fn new(kind: TileKind, left: f32, bottom: f32, size: f32) -> Self {
        Self {
            kind,
            left,
            bottom,
            size,
        }
    }
}

/// Entity scheduled for drawing, positioned by its center in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySprite {
    /// Visual variant; backends map shades to colors or textures.
    pub shade: EntityShade,
    /// World-space x coordinate of the entity's center.
    pub center_x: f32,
    /// World-space y coordinate of the entity's center.
    pub center_y: f32,
    /// Side length of the square bounding box in world units.
    pub size: f32,
}

impl EntitySprite {
    /// Creates a new entity sprite descriptor.
    #[must_use]
    pub const fn new(shade: EntityShade, center_x: f32, center_y: f32, size: f32) -> Self {
        Self {
            shade,
            center_x,
            center_y,
            size,
        }
    }
}

/// Scene description combining the viewport and everything visible in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// World-space window selected by the camera.
    pub viewport: Viewport,
    /// Terrain tiles in generation order.
    pub tiles: Vec<TileSprite>,
    /// Entities drawn above the terrain.
    pub entities: Vec<EntitySprite>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(viewport: Viewport, tiles: Vec<TileSprite>, entities: Vec<EntitySprite>) -> Self {
        Self {
            viewport,
            tiles,
            entities,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hillside scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// key edges captured by the adapter, and may mutate the scene before it
    /// is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be positive to avoid a degenerate window.
    InvalidViewport {
        /// Provided viewport width that failed validation.
        width: f32,
        /// Provided viewport height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_creation_rejects_degenerate_dimensions() {
        let error = Viewport::new(0.0, 0.0, 0.0, 600.0).expect_err("zero width must be rejected");
        assert!(matches!(error, RenderingError::InvalidViewport { .. }));
        assert!(Viewport::new(0.0, 0.0, 800.0, -1.0).is_err());
    }

    #[test]
    fn viewport_edges_derive_from_origin() {
        let viewport = Viewport::new(100.0, 50.0, 800.0, 600.0).expect("valid viewport");
        assert_eq!(viewport.right(), 900.0);
        assert_eq!(viewport.top(), 650.0);
    }

    #[test]
    fn intersection_excludes_fully_offscreen_boxes() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0).expect("valid viewport");

        assert!(viewport.intersects(10.0, 10.0, 48.0));
        assert!(viewport.intersects(-20.0, -20.0, 48.0));
        assert!(!viewport.intersects(900.0, 10.0, 48.0));
        assert!(!viewport.intersects(10.0, 700.0, 48.0));
        assert!(!viewport.intersects(-60.0, 10.0, 48.0));
    }

    #[test]
    fn projection_flips_the_vertical_axis() {
        let viewport = Viewport::new(100.0, 200.0, 800.0, 600.0).expect("valid viewport");
        let screen = Vec2::new(800.0, 600.0);

        let origin = viewport.project(Vec2::new(100.0, 200.0), screen);
        assert_eq!(origin, Vec2::new(0.0, 600.0));

        let top_right = viewport.project(Vec2::new(900.0, 800.0), screen);
        assert_eq!(top_right, Vec2::new(800.0, 0.0));
    }

    #[test]
    fn projection_scales_with_screen_resolution() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0).expect("valid viewport");
        let screen = Vec2::new(1_600.0, 1_200.0);

        let center = viewport.project(Vec2::new(400.0, 300.0), screen);
        assert_eq!(center, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn color_from_bytes_normalizes_channels() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < 1e-6);
        assert_eq!(color.alpha, 1.0);
    }
}
