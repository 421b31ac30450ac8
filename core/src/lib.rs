#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hillside engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hillside.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a generated terrain layout and (re)spawns every entity.
    InstallTerrain {
        /// Tile layout the world should adopt.
        layout: TerrainLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the player's input-driven horizontal velocity.
    SteerPlayer {
        /// Direction of travel requested by the latest key edge.
        steering: Steering,
    },
    /// Requests that the player leave the ground if still eligible.
    Jump,
    /// Requests that the player drop into a pipe underneath its feet.
    EnterPipe,
    /// Requests a switch between the followed and free camera modes.
    ToggleCameraMode,
    /// Translates the free camera viewport by a fixed offset.
    NudgeCamera {
        /// Horizontal translation in world units.
        dx: f32,
        /// Vertical translation in world units.
        dy: f32,
    },
    /// Moves the viewport origin to an absolute world-space position.
    MoveCameraTo {
        /// World-space x coordinate of the viewport's left edge.
        left: f32,
        /// World-space y coordinate of the viewport's bottom edge.
        bottom: f32,
    },
}

/// Horizontal steering intents that the control system may issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Steering {
    /// Move toward decreasing x at the configured movement speed.
    Left,
    /// Move toward increasing x at the configured movement speed.
    Right,
    /// Stop all input-driven horizontal movement.
    Halt,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a terrain layout was installed and entities spawned.
    TerrainInstalled {
        /// Number of tile columns spanned by the installed terrain.
        columns: TileCoord,
        /// Total number of tiles contained in the layout.
        tile_count: usize,
        /// Number of pipe sites available for teleportation.
        pipe_count: usize,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player left the ground.
    PlayerJumped {
        /// Airborne frame count observed when the jump was accepted.
        airborne_frames: u32,
    },
    /// Reports that a jump request arrived outside the grace window.
    JumpDenied {
        /// Airborne frame count observed when the jump was refused.
        airborne_frames: u32,
    },
    /// Reports that an entity settled onto solid ground this frame.
    EntityLanded {
        /// Identifier of the entity that landed.
        entity: EntityId,
    },
    /// Confirms that the player dropped into a pipe opening.
    PipeEntered {
        /// Column of the pipe the player entered.
        column: TileCoord,
    },
    /// Confirms that the player was relocated to a pipe site.
    PlayerTeleported {
        /// World-space x coordinate of the destination's left edge.
        left: f32,
        /// World-space y coordinate of the destination's bottom edge.
        bottom: f32,
    },
    /// Announces that the camera switched between follow and free modes.
    CameraModeChanged {
        /// Mode that became active after processing the toggle.
        mode: CameraMode,
    },
    /// Reports the viewport origin after a camera mutation.
    ViewportMoved {
        /// World-space x coordinate of the viewport's left edge.
        left: f32,
        /// World-space y coordinate of the viewport's bottom edge.
        bottom: f32,
    },
}

/// Kinds of terrain tiles produced by generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Indestructible floor row spanning the bottom of the world.
    Bedrock,
    /// Surface tile produced by the terrain height walk.
    Grass,
    /// Interior fill tile stacked beneath the surface.
    Dirt,
    /// Teleport trigger placed one tile above the surface.
    Pipe,
}

impl TileKind {
    /// Reports whether the tile belongs to the terrain proper.
    ///
    /// Terrain tiles block every entity; pipes block only the player and
    /// additionally act as teleport triggers.
    #[must_use]
    pub const fn is_terrain(self) -> bool {
        !matches!(self, Self::Pipe)
    }
}

/// Index within the tile grid measured in whole tile columns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord(u32);

impl TileCoord {
    /// Creates a new tile coordinate wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavioral classification of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The single input-driven actor.
    Player,
    /// A passive actor that falls and lands but receives no input.
    NonPlayer,
}

/// Visual variant assigned to an entity at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityShade {
    /// The player's appearance.
    Explorer,
    /// Green-tinted non-player variant.
    Moss,
    /// Brown-tinted non-player variant.
    Umber,
}

/// Camera behavior selected for the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Viewport recenters on the player every simulated tick.
    Followed,
    /// Viewport accumulates fixed-step translations from direct input.
    Free,
}

/// Single tile placement within a terrain layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Kind of tile occupying the placement.
    pub kind: TileKind,
    /// World-space x coordinate of the tile's left edge.
    pub left: f32,
    /// World-space y coordinate of the tile's bottom edge.
    pub bottom: f32,
}

impl TilePlacement {
    /// Creates a new tile placement descriptor.
    #[must_use]
    pub const fn new(kind: TileKind, left: f32, bottom: f32) -> Self {
        Self { kind, left, bottom }
    }
}

/// Complete tile layout produced by terrain generation.
///
/// Layouts are immutable once generated and serve both as the payload of
/// [`Command::InstallTerrain`] and as the serialized form used for terrain
/// sharing between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayout {
    columns: TileCoord,
    tile_length: f32,
    tiles: Vec<TilePlacement>,
}

impl TerrainLayout {
    /// Creates a new layout from generated placements.
    #[must_use]
    pub fn new(columns: TileCoord, tile_length: f32, tiles: Vec<TilePlacement>) -> Self {
        Self {
            columns,
            tile_length,
            tiles,
        }
    }

    /// Number of tile columns spanned by the layout.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Tiles composing the layout in generation order.
    #[must_use]
    pub fn tiles(&self) -> &[TilePlacement] {
        &self.tiles
    }

    /// Total width of the layout measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns.get() as f32 * self.tile_length
    }
}

/// Snapshot of the discrete key edges observed by an adapter this frame.
///
/// Only edges are reported; a key held across several frames contributes a
/// single press and a single release, and the latest velocity-setting effect
/// persists in the world until the matching release arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Jump / camera-up key was pressed this frame.
    pub jump_pressed: bool,
    /// Left key was pressed this frame.
    pub left_pressed: bool,
    /// Left key was released this frame.
    pub left_released: bool,
    /// Right key was pressed this frame.
    pub right_pressed: bool,
    /// Right key was released this frame.
    pub right_released: bool,
    /// Down / pipe-entry key was pressed this frame.
    pub descend_pressed: bool,
    /// Camera mode toggle key was pressed this frame.
    pub camera_toggle_pressed: bool,
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Behavioral classification of the entity.
    pub kind: EntityKind,
    /// Visual variant assigned at spawn time.
    pub shade: EntityShade,
    /// World-space x coordinate of the entity's center.
    pub center_x: f32,
    /// World-space y coordinate of the entity's center.
    pub center_y: f32,
    /// Half of the entity's square bounding box edge.
    pub half_extent: f32,
    /// Horizontal velocity in world units per simulated frame.
    pub velocity_x: f32,
    /// Vertical velocity in world units per simulated frame.
    pub velocity_y: f32,
    /// Whether the entity rested on solid ground at the end of the frame.
    pub grounded: bool,
    /// Number of consecutive frames the entity has been airborne.
    pub airborne_frames: u32,
}

impl EntitySnapshot {
    /// World-space x coordinate of the bounding box's left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.center_x - self.half_extent
    }

    /// World-space x coordinate of the bounding box's right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.center_x + self.half_extent
    }

    /// World-space y coordinate of the bounding box's bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.center_y - self.half_extent
    }

    /// World-space y coordinate of the bounding box's top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center_y + self.half_extent
    }
}

/// Read-only snapshot describing all entities within the world.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the single player snapshot if one exists.
    #[must_use]
    pub fn player(&self) -> Option<&EntitySnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.kind == EntityKind::Player)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// A generated pipe placement usable as a teleport source or destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipeSite {
    /// Column of the tile grid that hosts the pipe.
    pub column: TileCoord,
    /// World-space x coordinate of the pipe's left edge.
    pub left: f32,
    /// World-space y coordinate of the pipe's bottom edge.
    pub bottom: f32,
}

impl PipeSite {
    /// Creates a new pipe site descriptor.
    #[must_use]
    pub const fn new(column: TileCoord, left: f32, bottom: f32) -> Self {
        Self {
            column,
            left,
            bottom,
        }
    }
}

/// Immutable description of the camera state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    /// Active camera behavior.
    pub mode: CameraMode,
    /// World-space x coordinate of the viewport's left edge.
    pub left: f32,
    /// World-space y coordinate of the viewport's bottom edge.
    pub bottom: f32,
    /// Width of the viewport in world units.
    pub viewport_width: f32,
    /// Height of the viewport in world units.
    pub viewport_height: f32,
}

#[cfg(test)]
mod tests {
    use super::{TileCoord, TileKind, TilePlacement};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_kind_round_trips_through_bincode() {
        assert_round_trip(&TileKind::Pipe);
    }

    #[test]
    fn tile_coord_round_trips_through_bincode() {
        assert_round_trip(&TileCoord::new(69));
    }

    #[test]
    fn tile_placement_round_trips_through_bincode() {
        let placement = TilePlacement::new(TileKind::Grass, 96.0, 576.0);
        assert_round_trip(&placement);
    }

    #[test]
    fn terrain_layout_round_trips_through_bincode() {
        let layout = super::TerrainLayout::new(
            TileCoord::new(2),
            48.0,
            vec![
                TilePlacement::new(TileKind::Bedrock, 0.0, -48.0),
                TilePlacement::new(TileKind::Grass, 0.0, 576.0),
                TilePlacement::new(TileKind::Pipe, 0.0, 624.0),
            ],
        );
        assert_round_trip(&layout);
    }

    #[test]
    fn only_pipes_are_excluded_from_terrain() {
        assert!(TileKind::Bedrock.is_terrain());
        assert!(TileKind::Grass.is_terrain());
        assert!(TileKind::Dirt.is_terrain());
        assert!(!TileKind::Pipe.is_terrain());
    }

    #[test]
    fn entity_snapshot_edges_derive_from_center() {
        let snapshot = super::EntitySnapshot {
            id: super::EntityId::new(0),
            kind: super::EntityKind::Player,
            shade: super::EntityShade::Explorer,
            center_x: 100.0,
            center_y: 60.0,
            half_extent: 24.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: false,
            airborne_frames: 0,
        };

        assert_eq!(snapshot.left(), 76.0);
        assert_eq!(snapshot.right(), 124.0);
        assert_eq!(snapshot.bottom(), 36.0);
        assert_eq!(snapshot.top(), 84.0);
    }

    #[test]
    fn entity_view_sorts_by_identifier_and_finds_player() {
        let player = super::EntitySnapshot {
            id: super::EntityId::new(0),
            kind: super::EntityKind::Player,
            shade: super::EntityShade::Explorer,
            center_x: 0.0,
            center_y: 0.0,
            half_extent: 24.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: false,
            airborne_frames: 0,
        };
        let drifter = super::EntitySnapshot {
            id: super::EntityId::new(3),
            kind: super::EntityKind::NonPlayer,
            shade: super::EntityShade::Moss,
            ..player
        };

        let view = super::EntityView::from_snapshots(vec![drifter, player]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();

        assert_eq!(ids, vec![0, 3]);
        assert_eq!(view.player().map(|snapshot| snapshot.id), Some(player.id));
    }
}
