//! Per-frame integration shared by the player and non-player entities.

use crate::terrain::{Aabb, CollisionGrid};

/// Downward acceleration applied every simulated frame.
pub(crate) const GRAVITY: f32 = 0.5;
/// Horizontal speed granted by steering input, in units per frame.
pub(crate) const MOVEMENT_SPEED: f32 = 5.0;
/// Instantaneous vertical velocity granted by an accepted jump.
pub(crate) const JUMP_SPEED: f32 = 9.0;
/// Number of airborne frames during which a jump is still accepted.
pub(crate) const JUMP_GRACE_FRAMES: u32 = 3;
/// Airborne counter assigned at spawn so sky-drops cannot jump mid-fall.
pub(crate) const SPAWN_AIRBORNE_FRAMES: u32 = 99;

/// Integration state owned by a single entity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Body {
    pub(crate) velocity_x: f32,
    pub(crate) velocity_y: f32,
    pub(crate) grounded: bool,
    pub(crate) airborne_frames: u32,
    /// Players treat pipes as solid and can stand on them; non-players
    /// pass through pipes entirely.
    pub(crate) collides_with_pipes: bool,
}

impl Body {
    pub(crate) fn new(collides_with_pipes: bool) -> Self {
        Self {
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: false,
            airborne_frames: SPAWN_AIRBORNE_FRAMES,
            collides_with_pipes,
        }
    }
}

/// Positioned square box driven by a [`Body`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mover {
    pub(crate) center_x: f32,
    pub(crate) center_y: f32,
    pub(crate) half_extent: f32,
    pub(crate) body: Body,
}

impl Mover {
    pub(crate) fn bounds(&self) -> Aabb {
        Aabb {
            left: self.center_x - self.half_extent,
            bottom: self.center_y - self.half_extent,
            width: self.half_extent * 2.0,
            height: self.half_extent * 2.0,
        }
    }
}

/// Advances a mover by one discrete frame against the collision grid.
///
/// Returns `true` when the mover ended the frame resting on solid ground.
/// `clamp_width` restricts the horizontal extent to `[0, width]` and is
/// supplied for the player only.
pub(crate) fn step(mover: &mut Mover, grid: &CollisionGrid, clamp_width: Option<f32>) -> bool {
    if mover.body.velocity_x != 0.0 {
        mover.center_x += mover.body.velocity_x;
        resolve_horizontal(mover, grid);
    }
    if let Some(width) = clamp_width {
        let half = mover.half_extent;
        if mover.center_x - half < 0.0 {
            mover.center_x = half;
        } else if mover.center_x + half > width {
            mover.center_x = width - half;
        }
    }

    mover.body.velocity_y -= GRAVITY;
    mover.center_y += mover.body.velocity_y;

    let landed = mover.body.velocity_y < 0.0 && resolve_downward(mover, grid);
    if landed {
        mover.body.velocity_y = 0.0;
        mover.body.grounded = true;
        mover.body.airborne_frames = 0;
    } else {
        mover.body.grounded = false;
        mover.body.airborne_frames = mover.body.airborne_frames.saturating_add(1);
    }

    landed
}

/// Snaps the leading edge back to the trailing edge of any overlapped tile.
/// Velocity is preserved; horizontal collision is purely positional.
fn resolve_horizontal(mover: &mut Mover, grid: &CollisionGrid) {
    let moving_right = mover.body.velocity_x > 0.0;
    let probe = mover.bounds();
    for tile in grid.overlapping(&probe, mover.body.collides_with_pipes) {
        if moving_right {
            let limit = tile.bounds.left - mover.half_extent;
            if mover.center_x > limit {
                mover.center_x = limit;
            }
        } else {
            let limit = tile.bounds.right() + mover.half_extent;
            if mover.center_x < limit {
                mover.center_x = limit;
            }
        }
    }
}

/// Seats the mover on the highest overlapped tile top, if any.
fn resolve_downward(mover: &mut Mover, grid: &CollisionGrid) -> bool {
    let probe = mover.bounds();
    let mut floor: Option<f32> = None;
    for tile in grid.overlapping(&probe, mover.body.collides_with_pipes) {
        let top = tile.bounds.top();
        floor = Some(floor.map_or(top, |current: f32| current.max(top)));
    }

    match floor {
        Some(top) => {
            mover.center_y = top + mover.half_extent;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillside_core::{TileKind, TilePlacement};

    fn floor_grid() -> CollisionGrid {
        let placements: Vec<TilePlacement> = (0..4)
            .map(|column| TilePlacement::new(TileKind::Grass, column as f32 * 48.0, 0.0))
            .collect();
        CollisionGrid::new(48.0, &placements)
    }

    fn mover_at(center_x: f32, center_y: f32) -> Mover {
        Mover {
            center_x,
            center_y,
            half_extent: 24.0,
            body: Body::new(true),
        }
    }

    #[test]
    fn falling_mover_snaps_to_tile_top_and_grounds() {
        let grid = floor_grid();
        let mut mover = mover_at(96.0, 80.0);
        mover.body.velocity_y = -20.0;

        let landed = step(&mut mover, &grid, None);

        assert!(landed);
        assert_eq!(mover.center_y, 48.0 + 24.0);
        assert_eq!(mover.body.velocity_y, 0.0);
        assert_eq!(mover.body.airborne_frames, 0);
        assert!(mover.body.grounded);
    }

    #[test]
    fn grounded_mover_stays_seated_under_gravity() {
        let grid = floor_grid();
        let mut mover = mover_at(96.0, 72.0);
        mover.body.velocity_y = 0.0;

        for _ in 0..10 {
            let landed = step(&mut mover, &grid, None);
            assert!(landed);
            assert_eq!(mover.center_y, 72.0);
        }
        assert_eq!(mover.body.airborne_frames, 0);
    }

    #[test]
    fn airborne_counter_grows_without_support() {
        let grid = CollisionGrid::new(48.0, &[]);
        let mut mover = mover_at(0.0, 500.0);
        mover.body.airborne_frames = 0;

        for expected in 1..=5 {
            let landed = step(&mut mover, &grid, None);
            assert!(!landed);
            assert_eq!(mover.body.airborne_frames, expected);
        }
        assert_eq!(mover.body.velocity_y, -2.5);
    }

    #[test]
    fn rightward_motion_snaps_against_a_wall() {
        let placements = vec![TilePlacement::new(TileKind::Dirt, 96.0, 0.0)];
        let grid = CollisionGrid::new(48.0, &placements);
        let mut mover = mover_at(70.0, 24.0);
        mover.body.velocity_x = 5.0;

        let _ = step(&mut mover, &grid, None);

        assert_eq!(mover.center_x, 96.0 - 24.0);
        // Velocity survives the snap for the next frame.
        assert_eq!(mover.body.velocity_x, 5.0);
    }

    #[test]
    fn leftward_motion_snaps_against_a_wall() {
        let placements = vec![TilePlacement::new(TileKind::Dirt, 0.0, 0.0)];
        let grid = CollisionGrid::new(48.0, &placements);
        let mut mover = mover_at(74.0, 24.0);
        mover.body.velocity_x = -5.0;

        let _ = step(&mut mover, &grid, None);

        assert_eq!(mover.center_x, 48.0 + 24.0);
        assert_eq!(mover.body.velocity_x, -5.0);
    }

    #[test]
    fn clamp_restricts_horizontal_extent() {
        let grid = CollisionGrid::new(48.0, &[]);
        let mut mover = mover_at(20.0, 500.0);
        mover.body.velocity_x = -5.0;

        let _ = step(&mut mover, &grid, Some(480.0));
        assert_eq!(mover.center_x, 24.0);

        mover.center_x = 470.0;
        mover.body.velocity_x = 5.0;
        let _ = step(&mut mover, &grid, Some(480.0));
        assert_eq!(mover.center_x, 480.0 - 24.0);
    }

    #[test]
    fn upward_motion_is_never_blocked() {
        let placements = vec![TilePlacement::new(TileKind::Dirt, 0.0, 96.0)];
        let grid = CollisionGrid::new(48.0, &placements);
        let mut mover = mover_at(24.0, 60.0);
        mover.body.velocity_y = 20.0;

        let landed = step(&mut mover, &grid, None);

        // The risen box overlaps the tile above, yet rising movement passes
        // straight through it.
        assert!(!landed);
        assert_eq!(mover.center_y, 60.0 + 20.0 - GRAVITY);
        assert!(mover.bounds().top() > 96.0);
    }

    #[test]
    fn non_player_bodies_fall_through_pipes() {
        let placements = vec![TilePlacement::new(TileKind::Pipe, 0.0, 0.0)];
        let grid = CollisionGrid::new(48.0, &placements);
        let mut mover = mover_at(24.0, 80.0);
        mover.body = Body::new(false);
        mover.body.velocity_y = -20.0;

        let landed = step(&mut mover, &grid, None);

        assert!(!landed);
        assert!(mover.center_y < 60.0);
    }
}
