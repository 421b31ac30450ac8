#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Follow-camera system that keeps the viewport centered on the player.
//!
//! The system reacts to simulated time and emits absolute viewport moves;
//! the world applies them verbatim. In free mode the viewport is driven by
//! the control system's nudges instead and this system stays silent.

use hillside_core::{CameraMode, CameraSnapshot, Command, EntitySnapshot, Event};

/// Pure system recentering the viewport on the player every simulated tick.
#[derive(Debug, Default)]
pub struct CameraFollow;

impl CameraFollow {
    /// Consumes world events and emits a recenter command when appropriate.
    pub fn handle(
        &self,
        events: &[Event],
        camera: CameraSnapshot,
        player: Option<&EntitySnapshot>,
        out: &mut Vec<Command>,
    ) {
        if camera.mode != CameraMode::Followed {
            return;
        }
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }
        let Some(player) = player else {
            return;
        };

        out.push(Command::MoveCameraTo {
            left: player.center_x - camera.viewport_width / 2.0,
            bottom: player.center_y - camera.viewport_height / 2.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillside_core::{EntityId, EntityKind, EntityShade};
    use std::time::Duration;

    fn camera(mode: CameraMode) -> CameraSnapshot {
        CameraSnapshot {
            mode,
            left: 0.0,
            bottom: 0.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }

    fn player_at(center_x: f32, center_y: f32) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(0),
            kind: EntityKind::Player,
            shade: EntityShade::Explorer,
            center_x,
            center_y,
            half_extent: 24.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: true,
            airborne_frames: 0,
        }
    }

    fn tick_events() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    #[test]
    fn recenters_on_the_player_after_time_advances() {
        let follow = CameraFollow;
        let player = player_at(1_000.0, 500.0);
        let mut out = Vec::new();

        follow.handle(
            &tick_events(),
            camera(CameraMode::Followed),
            Some(&player),
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::MoveCameraTo {
                left: 600.0,
                bottom: 200.0
            }]
        );
    }

    #[test]
    fn stays_silent_in_free_mode() {
        let follow = CameraFollow;
        let player = player_at(1_000.0, 500.0);
        let mut out = Vec::new();

        follow.handle(&tick_events(), camera(CameraMode::Free), Some(&player), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn stays_silent_without_simulated_time() {
        let follow = CameraFollow;
        let player = player_at(1_000.0, 500.0);
        let mut out = Vec::new();

        follow.handle(&[], camera(CameraMode::Followed), Some(&player), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn stays_silent_without_a_player() {
        let follow = CameraFollow;
        let mut out = Vec::new();

        follow.handle(&tick_events(), camera(CameraMode::Followed), None, &mut out);

        assert!(out.is_empty());
    }
}
