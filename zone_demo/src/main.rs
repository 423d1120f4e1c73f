//! Demo entry point: a listener walking out of a reverb zone

mod debug_zones;

use debug_zones::DebugState;
use hecs::World;
use tracing::{error, info};
use zone_audio::prelude::*;

const FRAMES: u32 = 50;

fn main() {
    // Initialize logging
    zone_audio::init_logging();
    info!("Starting audio zone demo");

    let config = match std::env::args().nth(1) {
        Some(path) => match AudioZoneConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read config, using defaults");
                AudioZoneConfig::default()
            }
        },
        None => AudioZoneConfig::default(),
    };

    let mut system = match AudioZoneSystem::new(NullBackend::new(), config) {
        Ok(system) => system,
        Err(e) => {
            error!(error = %e, "Audio zone system failed to start");
            return;
        }
    };

    // Missing manifests only leave the catalogs empty
    system.load_catalogs();
    info!(
        banks = system.banks().len(),
        buses = ?system.buses().names(),
        "Catalogs ready"
    );

    let mut world = World::new();
    create_demo_scene(&mut world);

    let mut bridge = SceneAudioBridge::new();
    let mut debug = DebugState::default();

    for frame in 0..FRAMES {
        // Move emitters one unit along +X per frame
        for (_, (transform, _)) in world.query_mut::<(&mut Transform, &AudioEmitter)>() {
            transform.position.x += 1.0;
        }

        bridge.sync(&mut world, &mut system);
        let stats = system.update();
        debug.update(frame, &system, stats);
    }

    bridge.clear(&mut world, &mut system);
    system.shutdown();
    info!("Audio zone demo finished");
}

/// Create a hall, a cave and a single emitter starting in the hall
fn create_demo_scene(world: &mut World) {
    world.spawn((
        Transform::from_position(Vec3::ZERO),
        ReverbZone::new(20.0, "Hall"),
    ));
    world.spawn((
        Transform::from_position(Vec3::new(40.0, 0.0, 0.0)),
        ReverbZone::new(8.0, "Cave"),
    ));
    world.spawn((Transform::default(), AudioEmitter::default()));
}
