#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hillside.
//!
//! The world owns the installed terrain, every entity and its physics
//! state, the camera, and the pipe-teleport state machine. Adapters and
//! systems mutate it exclusively through [`apply`] and observe it through
//! the [`query`] module.

mod motion;
mod terrain;

use std::time::Duration;

use hillside_core::{
    CameraMode, Command, EntityId, EntityKind, EntityShade, EntitySnapshot, Event, Steering,
    TerrainLayout, TileCoord, WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::motion::{Body, Mover};
use crate::terrain::Terrain;

/// Fixed slice of simulated time consumed per discrete physics frame.
///
/// Ticks accumulate elapsed time and run one integration frame per quantum,
/// so velocities remain expressed in units per frame and a zero-length tick
/// never moves anything.
pub const FRAME_QUANTUM: Duration = Duration::from_micros(16_667);

const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
const DEFAULT_NON_PLAYER_COUNT: u32 = 5;
const SPAWN_BOTTOM: f32 = 1_000.0;

/// Errors reported when a world configuration fails validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The world must span at least one tile column.
    #[error("world must span at least one tile column")]
    EmptyWorld,
    /// Tile side lengths must be strictly positive.
    #[error("tile length must be positive (received {tile_length})")]
    InvalidTileLength {
        /// Rejected tile length.
        tile_length: f32,
    },
    /// Viewport dimensions must be strictly positive.
    #[error("viewport dimensions must be positive (received {width}x{height})")]
    InvalidViewport {
        /// Rejected viewport width.
        width: f32,
        /// Rejected viewport height.
        height: f32,
    },
}

/// Validated construction parameters for a [`World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    columns: TileCoord,
    tile_length: f32,
    viewport_width: f32,
    viewport_height: f32,
    free_camera_enabled: bool,
    non_player_count: u32,
    seed: u64,
}

impl WorldConfig {
    /// Creates a configuration with the default viewport and entity count.
    ///
    /// Fails fast with a descriptive error before any world state exists
    /// when the dimensions are degenerate.
    pub fn new(columns: TileCoord, tile_length: f32, seed: u64) -> Result<Self, ConfigError> {
        if columns.get() == 0 {
            return Err(ConfigError::EmptyWorld);
        }
        if !(tile_length > 0.0) {
            return Err(ConfigError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            tile_length,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            free_camera_enabled: false,
            non_player_count: DEFAULT_NON_PLAYER_COUNT,
            seed,
        })
    }

    /// Overrides the viewport dimensions expressed in world units.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        self.viewport_width = width;
        self.viewport_height = height;
        Ok(self)
    }

    /// Grants or withholds the free-camera capability fixed at setup time.
    #[must_use]
    pub fn with_free_camera(mut self, enabled: bool) -> Self {
        self.free_camera_enabled = enabled;
        self
    }

    /// Overrides how many non-player entities spawn with the terrain.
    #[must_use]
    pub fn with_non_player_count(mut self, count: u32) -> Self {
        self.non_player_count = count;
        self
    }

    /// Number of tile columns the world spans.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Side length of a single square tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Width of the viewport in world units.
    #[must_use]
    pub const fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Height of the viewport in world units.
    #[must_use]
    pub const fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Whether the camera toggle is honored at runtime.
    #[must_use]
    pub const fn free_camera_enabled(&self) -> bool {
        self.free_camera_enabled
    }

    /// Number of non-player entities spawned per terrain installation.
    #[must_use]
    pub const fn non_player_count(&self) -> u32 {
        self.non_player_count
    }

    /// Seed feeding the world's random draws.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PipeTransit {
    Idle,
    Pending,
}

#[derive(Clone, Copy, Debug)]
struct CameraState {
    mode: CameraMode,
    left: f32,
    bottom: f32,
}

#[derive(Clone, Debug)]
struct Entity {
    id: EntityId,
    kind: EntityKind,
    shade: EntityShade,
    mover: Mover,
}

impl Entity {
    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind: self.kind,
            shade: self.shade,
            center_x: self.mover.center_x,
            center_y: self.mover.center_y,
            half_extent: self.mover.half_extent,
            velocity_x: self.mover.body.velocity_x,
            velocity_y: self.mover.body.velocity_y,
            grounded: self.mover.body.grounded,
            airborne_frames: self.mover.body.airborne_frames,
        }
    }
}

/// Represents the authoritative Hillside world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    terrain: Terrain,
    entities: Vec<Entity>,
    camera: CameraState,
    transit: PipeTransit,
    accumulator: Duration,
    frame_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world ready to receive a terrain installation.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed());
        let terrain = Terrain::empty(config.tile_length());
        Self {
            banner: WELCOME_BANNER,
            camera: CameraState {
                mode: CameraMode::Followed,
                left: 0.0,
                bottom: 0.0,
            },
            entities: Vec::new(),
            transit: PipeTransit::Idle,
            accumulator: Duration::ZERO,
            frame_index: 0,
            rng,
            terrain,
            config,
        }
    }

    fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|entity| entity.kind == EntityKind::Player)
    }

    fn player(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.kind == EntityKind::Player)
    }

    fn install_terrain(&mut self, layout: TerrainLayout, out_events: &mut Vec<Event>) {
        self.terrain = Terrain::from_layout(&layout);
        self.entities.clear();
        self.transit = PipeTransit::Idle;
        self.accumulator = Duration::ZERO;
        self.frame_index = 0;

        let width = self.terrain.width();
        let half = self.config.tile_length() / 2.0;
        let player = Entity {
            id: EntityId::new(0),
            kind: EntityKind::Player,
            shade: EntityShade::Explorer,
            mover: Mover {
                center_x: width / 2.0,
                center_y: SPAWN_BOTTOM + half,
                half_extent: half,
                body: Body::new(true),
            },
        };

        self.camera.mode = CameraMode::Followed;
        self.camera.left = player.mover.center_x - self.config.viewport_width() / 2.0;
        self.camera.bottom = player.mover.center_y - self.config.viewport_height() / 2.0;
        self.entities.push(player);

        for index in 0..self.config.non_player_count() {
            let center_x = self.rng.gen_range(0.0..=width.max(0.0));
            let shade = if self.rng.gen_bool(0.5) {
                EntityShade::Moss
            } else {
                EntityShade::Umber
            };
            self.entities.push(Entity {
                id: EntityId::new(index + 1),
                kind: EntityKind::NonPlayer,
                shade,
                mover: Mover {
                    center_x,
                    center_y: SPAWN_BOTTOM + half,
                    half_extent: half,
                    body: Body::new(false),
                },
            });
        }

        out_events.push(Event::TerrainInstalled {
            columns: self.terrain.columns(),
            tile_count: self.terrain.tiles().len(),
            pipe_count: self.terrain.pipe_sites().len(),
        });
    }

    fn request_pipe_entry(&mut self, out_events: &mut Vec<Event>) {
        let tile_length = self.terrain.tile_length();
        let Some(player) = self.player() else {
            return;
        };
        let snapshot = player.snapshot();

        for site in self.terrain.pipe_sites() {
            let site_right = site.left + tile_length;
            if site_right > snapshot.left()
                && site.left < snapshot.right()
                && site.bottom < snapshot.top()
            {
                let column = site.column;
                self.transit = PipeTransit::Pending;
                out_events.push(Event::PipeEntered { column });
                break;
            }
        }
    }

    /// Relocates the player to a random pipe site if a teleport is pending.
    ///
    /// Returns the player's id when the teleport fired so the frame step can
    /// skip its normal integration exactly once.
    fn resolve_pending_teleport(&mut self, out_events: &mut Vec<Event>) -> Option<EntityId> {
        if self.transit != PipeTransit::Pending {
            return None;
        }
        self.transit = PipeTransit::Idle;

        let sites = self.terrain.pipe_sites();
        if sites.is_empty() {
            return None;
        }
        let site = sites[self.rng.gen_range(0..sites.len())];

        let player = self.player_mut()?;
        player.mover.center_x = site.left + player.mover.half_extent;
        player.mover.center_y = site.bottom + player.mover.half_extent;
        let id = player.id;
        out_events.push(Event::PlayerTeleported {
            left: site.left,
            bottom: site.bottom,
        });
        Some(id)
    }

    fn step_frame(&mut self, out_events: &mut Vec<Event>) {
        self.frame_index = self.frame_index.wrapping_add(1);

        let teleported = self.resolve_pending_teleport(out_events);
        let width = self.terrain.width();

        for entity in &mut self.entities {
            if teleported == Some(entity.id) {
                continue;
            }
            let was_grounded = entity.mover.body.grounded;
            let clamp = (entity.kind == EntityKind::Player).then_some(width);
            let landed = motion::step(&mut entity.mover, self.terrain.grid(), clamp);
            if landed && !was_grounded {
                out_events.push(Event::EntityLanded { entity: entity.id });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InstallTerrain { layout } => {
            world.install_terrain(layout, out_events);
        }
        Command::Tick { dt } => {
            world.accumulator = world.accumulator.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            while world.accumulator >= FRAME_QUANTUM {
                world.accumulator -= FRAME_QUANTUM;
                world.step_frame(out_events);
            }
        }
        Command::SteerPlayer { steering } => {
            if let Some(player) = world.player_mut() {
                player.mover.body.velocity_x = match steering {
                    Steering::Left => -motion::MOVEMENT_SPEED,
                    Steering::Right => motion::MOVEMENT_SPEED,
                    Steering::Halt => 0.0,
                };
            }
        }
        Command::Jump => {
            if let Some(player) = world.player_mut() {
                let airborne_frames = player.mover.body.airborne_frames;
                if airborne_frames < motion::JUMP_GRACE_FRAMES {
                    player.mover.body.velocity_y = motion::JUMP_SPEED;
                    player.mover.body.grounded = false;
                    out_events.push(Event::PlayerJumped { airborne_frames });
                } else {
                    out_events.push(Event::JumpDenied { airborne_frames });
                }
            }
        }
        Command::EnterPipe => {
            world.request_pipe_entry(out_events);
        }
        Command::ToggleCameraMode => {
            if world.config.free_camera_enabled() {
                world.camera.mode = match world.camera.mode {
                    CameraMode::Followed => CameraMode::Free,
                    CameraMode::Free => CameraMode::Followed,
                };
                out_events.push(Event::CameraModeChanged {
                    mode: world.camera.mode,
                });
            }
        }
        Command::NudgeCamera { dx, dy } => {
            world.camera.left += dx;
            world.camera.bottom += dy;
            out_events.push(Event::ViewportMoved {
                left: world.camera.left,
                bottom: world.camera.bottom,
            });
        }
        Command::MoveCameraTo { left, bottom } => {
            world.camera.left = left;
            world.camera.bottom = bottom;
            out_events.push(Event::ViewportMoved { left, bottom });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use hillside_core::{
        CameraSnapshot, EntitySnapshot, EntityView, PipeSite, TilePlacement,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the validated world configuration.
    #[must_use]
    pub fn config(world: &World) -> &super::WorldConfig {
        &world.config
    }

    /// Captures a read-only view of every entity, sorted by identifier.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(
            world
                .entities
                .iter()
                .map(super::Entity::snapshot)
                .collect(),
        )
    }

    /// Captures the player's snapshot if the world has been populated.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        world.player().map(super::Entity::snapshot)
    }

    /// Captures the camera state alongside the configured viewport size.
    #[must_use]
    pub fn camera(world: &World) -> CameraSnapshot {
        CameraSnapshot {
            mode: world.camera.mode,
            left: world.camera.left,
            bottom: world.camera.bottom,
            viewport_width: world.config.viewport_width(),
            viewport_height: world.config.viewport_height(),
        }
    }

    /// Pipe sites available as teleport destinations.
    #[must_use]
    pub fn pipe_sites(world: &World) -> &[PipeSite] {
        world.terrain.pipe_sites()
    }

    /// Tiles composing the installed terrain, in generation order.
    #[must_use]
    pub fn tiles(world: &World) -> &[TilePlacement] {
        world.terrain.tiles()
    }

    /// Total width of the installed terrain in world units.
    #[must_use]
    pub fn world_width(world: &World) -> f32 {
        world.terrain.width()
    }

    /// Number of discrete physics frames simulated so far.
    #[must_use]
    pub fn simulated_frames(world: &World) -> u64 {
        world.frame_index
    }
}
