#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Hillside.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in containerised CI environments. To
//! keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature; Hillside has no sound to play anyway.
//!
//! Tiles and entities are drawn as flat rectangles colored by a [`Palette`];
//! the scene's viewport selects the visible world window and projection
//! flips the vertical axis into screen space.

mod theme;

pub use theme::Palette;

use anyhow::Result;
use glam::Vec2;
use hillside_core::FrameInput;
use hillside_rendering::{Color, Presentation, RenderingBackend, Scene};
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use std::{collections::VecDeque, time::Duration};

/// Snapshot of edge-triggered keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Simulation-facing key edges forwarded to the session.
    input: FrameInput,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let input = FrameInput {
            jump_pressed: is_key_pressed(KeyCode::Up),
            left_pressed: is_key_pressed(KeyCode::Left),
            left_released: is_key_released(KeyCode::Left),
            right_pressed: is_key_pressed(KeyCode::Right),
            right_released: is_key_released(KeyCode::Right),
            descend_pressed: is_key_pressed(KeyCode::Down),
            camera_toggle_pressed: is_key_pressed(KeyCode::Space),
        };

        Self {
            quit_requested,
            input,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    palette: Palette,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            palette: Palette::default(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the
    /// platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per
    /// second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the palette used for tiles, entities and the background.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;

        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            palette,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 800,
            window_height: 600,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                update_scene(frame_dt, keyboard.input, &mut scene);
                draw_scene(&scene, &palette, screen);

                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                    }) = fps_counter.record_frame(frame_dt)
                    {
                        println!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, palette: &Palette, screen: Vec2) {
    let viewport = scene.viewport;
    let scale = viewport.scale(screen);

    for tile in &scene.tiles {
        if !viewport.intersects(tile.left, tile.bottom, tile.size) {
            continue;
        }
        let top_left = viewport.project(Vec2::new(tile.left, tile.bottom + tile.size), screen);
        macroquad::shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            tile.size * scale.x,
            tile.size * scale.y,
            to_macroquad_color(palette.tile_color(tile.kind)),
        );
    }

    for entity in &scene.entities {
        let half = entity.size / 2.0;
        if !viewport.intersects(entity.center_x - half, entity.center_y - half, entity.size) {
            continue;
        }
        let top_left = viewport.project(
            Vec2::new(entity.center_x - half, entity.center_y + half),
            screen,
        );
        macroquad::shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            entity.size * scale.x,
            entity.size * scale.y,
            to_macroquad_color(palette.entity_color(entity.shade)),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_waits_for_a_full_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }
        let metrics = counter
            .record_frame(Duration::from_millis(64))
            .expect("one second elapsed");
        assert!(metrics.per_second > 0.0);
        assert!(metrics.trailing_ten_seconds > 0.0);
    }

    #[test]
    fn color_conversion_preserves_channels() {
        let converted = to_macroquad_color(Color::new(0.25, 0.5, 0.75, 1.0));
        assert_eq!(converted.r, 0.25);
        assert_eq!(converted.g, 0.5);
        assert_eq!(converted.b, 0.75);
        assert_eq!(converted.a, 1.0);
    }
}
