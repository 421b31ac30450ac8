//! Session loop wiring the world, pure systems and scene population.

use std::time::Duration;

use anyhow::Result;
use hillside_core::{Command, Event, FrameInput, TerrainLayout};
use hillside_rendering::{
    Color, EntitySprite, Presentation, RenderingBackend, Scene, TileSprite, Viewport,
};
use hillside_rendering_macroquad::MacroquadBackend;
use hillside_system_camera::CameraFollow;
use hillside_system_control::Control;
use hillside_world::{apply, query, World, WorldConfig, FRAME_QUANTUM};

pub(crate) const WINDOW_TITLE: &str = "Hillside";

/// Owns the world and the pure systems and drives the per-frame update
/// order: input commands first, then the simulation tick, then the
/// follow camera, and finally scene population for the renderer.
pub(crate) struct Session {
    world: World,
    control: Control,
    follow: CameraFollow,
}

impl Session {
    pub(crate) fn new(config: WorldConfig, layout: TerrainLayout) -> Self {
        let mut world = World::new(config);
        let mut events = Vec::new();
        apply(&mut world, Command::InstallTerrain { layout }, &mut events);
        Self {
            world,
            control: Control::default(),
            follow: CameraFollow,
        }
    }

    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    fn advance(&mut self, dt: Duration, input: FrameInput) {
        let mut events = Vec::new();

        let camera = query::camera(&self.world);
        let mut commands = Vec::new();
        self.control.handle(&input, camera, &mut commands);
        for command in commands {
            apply(&mut self.world, command, &mut events);
        }

        let tick_start = events.len();
        apply(&mut self.world, Command::Tick { dt }, &mut events);
        let tick_events: Vec<Event> = events[tick_start..].to_vec();

        let camera = query::camera(&self.world);
        let player = query::player(&self.world);
        let mut camera_commands = Vec::new();
        self.follow
            .handle(&tick_events, camera, player.as_ref(), &mut camera_commands);
        for command in camera_commands {
            apply(&mut self.world, command, &mut events);
        }
    }

    fn viewport(&self) -> Result<Viewport> {
        let camera = query::camera(&self.world);
        let viewport = Viewport::new(
            camera.left,
            camera.bottom,
            camera.viewport_width,
            camera.viewport_height,
        )?;
        Ok(viewport)
    }

    /// Builds the initial scene; tiles never change after installation, so
    /// the per-frame update only refreshes the viewport origin and entities.
    fn scene(&self) -> Result<Scene> {
        let tile_length = query::config(&self.world).tile_length();
        let tiles = query::tiles(&self.world)
            .iter()
            .map(|placement| {
                TileSprite::new(
                    placement.kind,
                    placement.left,
                    placement.bottom,
                    tile_length,
                )
            })
            .collect();
        Ok(Scene::new(self.viewport()?, tiles, self.entity_sprites()))
    }

    fn entity_sprites(&self) -> Vec<EntitySprite> {
        query::entity_view(&self.world)
            .iter()
            .map(|snapshot| {
                EntitySprite::new(
                    snapshot.shade,
                    snapshot.center_x,
                    snapshot.center_y,
                    snapshot.half_extent * 2.0,
                )
            })
            .collect()
    }

    pub(crate) fn run_windowed(
        mut self,
        backend: MacroquadBackend,
        clear_color: Color,
    ) -> Result<()> {
        let presentation = Presentation::new(WINDOW_TITLE, clear_color, self.scene()?);
        backend.run(presentation, move |dt, input, scene| {
            self.advance(dt, input);
            let camera = query::camera(&self.world);
            scene.viewport.left = camera.left;
            scene.viewport.bottom = camera.bottom;
            scene.entities = self.entity_sprites();
        })
    }

    pub(crate) fn run_headless(&mut self, frames: u32) -> String {
        for _ in 0..frames {
            self.advance(FRAME_QUANTUM, FrameInput::default());
        }

        let view = query::entity_view(&self.world);
        let grounded = view.iter().filter(|snapshot| snapshot.grounded).count();
        let total = view.iter().count();
        let camera = query::camera(&self.world);
        match query::player(&self.world) {
            Some(player) => format!(
                "simulated {} frames: player at ({:.1}, {:.1}), {grounded} of {total} entities grounded, viewport at ({:.1}, {:.1})",
                query::simulated_frames(&self.world),
                player.center_x,
                player.center_y,
                camera.left,
                camera.bottom,
            ),
            None => format!(
                "simulated {} frames over an empty world",
                query::simulated_frames(&self.world)
            ),
        }
    }
}
