use hillside_core::{CameraSnapshot, Command, EntitySnapshot, Event, FrameInput, TileCoord};
use hillside_system_camera::CameraFollow;
use hillside_system_control::Control;
use hillside_system_worldgen::{generate, GenerationConfig};
use hillside_world::{apply, query, World, WorldConfig, FRAME_QUANTUM};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEED: u64 = 0x4a3f_9b2c;
const TILE: f32 = 48.0;

#[test]
fn deterministic_replay_produces_identical_transcripts() {
    let first = replay();
    let second = replay();

    assert_eq!(first.entities, second.entities, "entity states diverged");
    assert_eq!(first.camera, second.camera, "camera state diverged");
    assert_eq!(first.events, second.events, "event transcripts diverged");
}

struct ReplayOutcome {
    entities: Vec<EntitySnapshot>,
    camera: CameraSnapshot,
    events: Vec<Event>,
}

fn replay() -> ReplayOutcome {
    let generation = GenerationConfig::new(TileCoord::new(70), TILE).expect("valid generation");
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let layout = generate(&generation, &mut rng);

    let config = WorldConfig::new(TileCoord::new(70), TILE, SEED)
        .expect("valid config")
        .with_free_camera(true);
    let mut world = World::new(config);
    let control = Control::default();
    let follow = CameraFollow;

    let mut log = Vec::new();
    apply(
        &mut world,
        Command::InstallTerrain { layout },
        &mut log,
    );

    for frame in 0..240u32 {
        let input = scripted_input(frame);
        let camera = query::camera(&world);

        let mut commands = Vec::new();
        control.handle(&input, camera, &mut commands);
        for command in commands {
            apply(&mut world, command, &mut log);
        }

        let tick_start = log.len();
        apply(&mut world, Command::Tick { dt: FRAME_QUANTUM }, &mut log);
        let tick_events: Vec<Event> = log[tick_start..].to_vec();

        let camera = query::camera(&world);
        let player = query::player(&world);
        let mut camera_commands = Vec::new();
        follow.handle(&tick_events, camera, player.as_ref(), &mut camera_commands);
        for command in camera_commands {
            apply(&mut world, command, &mut log);
        }
    }

    ReplayOutcome {
        entities: query::entity_view(&world).into_vec(),
        camera: query::camera(&world),
        events: log,
    }
}

fn scripted_input(frame: u32) -> FrameInput {
    match frame {
        10 => FrameInput {
            right_pressed: true,
            ..FrameInput::default()
        },
        90 => FrameInput {
            right_released: true,
            ..FrameInput::default()
        },
        100 => FrameInput {
            jump_pressed: true,
            ..FrameInput::default()
        },
        120 => FrameInput {
            descend_pressed: true,
            ..FrameInput::default()
        },
        160 => FrameInput {
            camera_toggle_pressed: true,
            ..FrameInput::default()
        },
        170 | 180 => FrameInput {
            left_pressed: true,
            ..FrameInput::default()
        },
        200 => FrameInput {
            camera_toggle_pressed: true,
            ..FrameInput::default()
        },
        _ => FrameInput::default(),
    }
}
