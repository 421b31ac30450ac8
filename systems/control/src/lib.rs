#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system that translates key edges into world commands.
//!
//! The system is the player's velocity source: key-down edges set steering
//! or request jumps and pipe entries, key-up edges halt, and in free-camera
//! mode the same keys nudge the viewport instead. Non-player entities have
//! no velocity source and therefore never appear here.

use hillside_core::{CameraMode, CameraSnapshot, Command, FrameInput, Steering};

/// Distance the free camera travels per directional key press.
pub const CAMERA_STEP: f32 = 100.0;

/// Pure system that reacts to per-frame input edges and emits commands.
#[derive(Debug, Default)]
pub struct Control;

impl Control {
    /// Consumes one frame of key edges and emits the matching command batch.
    pub fn handle(&self, input: &FrameInput, camera: CameraSnapshot, out: &mut Vec<Command>) {
        match camera.mode {
            CameraMode::Free => {
                if input.left_pressed {
                    out.push(Command::NudgeCamera {
                        dx: -CAMERA_STEP,
                        dy: 0.0,
                    });
                }
                if input.right_pressed {
                    out.push(Command::NudgeCamera {
                        dx: CAMERA_STEP,
                        dy: 0.0,
                    });
                }
                if input.jump_pressed {
                    out.push(Command::NudgeCamera {
                        dx: 0.0,
                        dy: CAMERA_STEP,
                    });
                }
                if input.descend_pressed {
                    out.push(Command::NudgeCamera {
                        dx: 0.0,
                        dy: -CAMERA_STEP,
                    });
                }
            }
            CameraMode::Followed => {
                if input.left_pressed {
                    out.push(Command::SteerPlayer {
                        steering: Steering::Left,
                    });
                }
                if input.right_pressed {
                    out.push(Command::SteerPlayer {
                        steering: Steering::Right,
                    });
                }
                // Releasing either steering key halts regardless of what is
                // still held.
                if input.left_released || input.right_released {
                    out.push(Command::SteerPlayer {
                        steering: Steering::Halt,
                    });
                }
                if input.jump_pressed {
                    out.push(Command::Jump);
                }
                if input.descend_pressed {
                    out.push(Command::EnterPipe);
                }
            }
        }

        if input.camera_toggle_pressed {
            out.push(Command::ToggleCameraMode);
        }
    }
}
