//! Bridge between the ECS world and the audio zone system
//!
//! The scene layer owns the lifecycle: a zone or emitter is attached when
//! its entity first shows up with the component, updated every frame while
//! it stays, and detached once the entity or component is gone.

use crate::audio::{
    backend::AudioBackend,
    components::{AudioEmitter, ReverbZone, Transform},
    objects::ObjectId,
    system::AudioZoneSystem,
    zones::ZoneId,
};
use hecs::{Entity, World};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Object id used for an emitter entity
pub fn emitter_object_id(entity: Entity) -> ObjectId {
    ObjectId(entity.to_bits().get())
}

/// Register a zone component with the system and record its id on the
/// component. Attaching an already attached component is a no-op. Returns
/// `None` when no zone id could be allocated.
pub fn attach_zone<B: AudioBackend>(
    system: &mut AudioZoneSystem<B>,
    zone: &mut ReverbZone,
    transform: &Transform,
) -> Option<ZoneId> {
    let id = system.create_zone(zone.zone_id, transform.position, zone.radius, &zone.bus_name);
    zone.zone_id = id;
    id
}

/// Remove a zone component's zone from the system
pub fn detach_zone<B: AudioBackend>(system: &mut AudioZoneSystem<B>, zone: &mut ReverbZone) {
    if let Some(id) = zone.zone_id.take() {
        system.remove_zone(id);
    }
}

/// Register an emitter and push its initial transform
pub fn attach_emitter<B: AudioBackend>(
    system: &mut AudioZoneSystem<B>,
    id: ObjectId,
    emitter: &mut AudioEmitter,
    transform: &Transform,
) {
    system.set_object_transform(id, transform.position, transform.rotation);
    emitter.attached = true;
}

/// Unregister an emitter
pub fn detach_emitter<B: AudioBackend>(
    system: &mut AudioZoneSystem<B>,
    id: ObjectId,
    emitter: &mut AudioEmitter,
) {
    system.unregister_object(id);
    emitter.attached = false;
}

/// Keeps the audio zone system in step with a [`World`]
#[derive(Debug, Default)]
pub struct SceneAudioBridge {
    zones: HashMap<Entity, ZoneId>,
    emitters: HashSet<Entity>,
}

impl SceneAudioBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach, update and detach zones and emitters to match `world`.
    ///
    /// Call once per frame after transforms are final and before
    /// [`AudioZoneSystem::update`].
    pub fn sync<B: AudioBackend>(&mut self, world: &mut World, system: &mut AudioZoneSystem<B>) {
        self.sync_zones(world, system);
        self.sync_emitters(world, system);
    }

    fn sync_zones<B: AudioBackend>(&mut self, world: &mut World, system: &mut AudioZoneSystem<B>) {
        let mut seen = HashSet::new();

        for (entity, (transform, zone)) in world.query_mut::<(&Transform, &mut ReverbZone)>() {
            seen.insert(entity);

            match (self.zones.get(&entity).copied(), zone.zone_id) {
                (Some(tracked), Some(id)) if tracked == id && system.zones().contains(id) => {
                    system.update_zone(id, transform.position, zone.radius, &zone.bus_name);
                }
                (tracked, _) => {
                    if let Some(old) = tracked {
                        system.remove_zone(old);
                    }
                    // A cloned component may still carry another entity's zone
                    if let Some(id) = zone.zone_id {
                        if self.zones.values().any(|owned| *owned == id) {
                            zone.zone_id = None;
                        }
                    }
                    if let Some(id) = attach_zone(system, zone, transform) {
                        debug!(entity = ?entity, zone = id.0, "Attached reverb zone");
                        self.zones.insert(entity, id);
                    }
                }
            }
        }

        self.zones.retain(|entity, id| {
            if seen.contains(entity) {
                return true;
            }
            system.remove_zone(*id);
            debug!(entity = ?entity, zone = id.0, "Detached reverb zone");
            false
        });
    }

    fn sync_emitters<B: AudioBackend>(
        &mut self,
        world: &mut World,
        system: &mut AudioZoneSystem<B>,
    ) {
        let mut seen = HashSet::new();

        for (entity, (transform, emitter)) in world.query_mut::<(&Transform, &mut AudioEmitter)>() {
            seen.insert(entity);
            let id = emitter_object_id(entity);

            if emitter.attached && self.emitters.contains(&entity) {
                system.set_object_transform(id, transform.position, transform.rotation);
            } else {
                attach_emitter(system, id, emitter, transform);
                debug!(entity = ?entity, object = id.0, "Attached audio emitter");
                self.emitters.insert(entity);
            }
        }

        self.emitters.retain(|entity| {
            if seen.contains(entity) {
                return true;
            }
            system.unregister_object(emitter_object_id(*entity));
            debug!(entity = ?entity, "Detached audio emitter");
            false
        });
    }

    /// Detach everything this bridge attached, e.g. when the scene unloads
    pub fn clear<B: AudioBackend>(&mut self, world: &mut World, system: &mut AudioZoneSystem<B>) {
        for (entity, zone) in world.query_mut::<&mut ReverbZone>() {
            if self.zones.remove(&entity).is_some() {
                detach_zone(system, zone);
            }
        }
        for (entity, emitter) in world.query_mut::<&mut AudioEmitter>() {
            if self.emitters.remove(&entity) {
                detach_emitter(system, emitter_object_id(entity), emitter);
            }
        }

        // Entities already despawned
        for (_, id) in self.zones.drain() {
            system.remove_zone(id);
        }
        for entity in self.emitters.drain() {
            system.unregister_object(emitter_object_id(entity));
        }
    }

    /// Number of zone entities currently attached
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of emitter entities currently attached
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::RecordingBackend;
    use crate::config::AudioZoneConfig;
    use glam::Vec3;

    fn system() -> AudioZoneSystem<RecordingBackend> {
        AudioZoneSystem::new(
            RecordingBackend::new().with_bus("Hall", 1),
            AudioZoneConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_attach_detach_zone() {
        let mut system = system();
        let mut zone = ReverbZone::new(20.0, "Hall");
        let transform = Transform::default();

        let id = attach_zone(&mut system, &mut zone, &transform).unwrap();
        assert_eq!(zone.zone_id, Some(id));
        assert_eq!(attach_zone(&mut system, &mut zone, &transform), Some(id));
        assert_eq!(system.zones().len(), 1);

        detach_zone(&mut system, &mut zone);
        assert!(zone.zone_id.is_none());
        assert!(system.zones().is_empty());
    }

    #[test]
    fn test_sync_follows_world() {
        let mut world = World::new();
        let mut system = system();
        let mut bridge = SceneAudioBridge::new();

        let zone_entity = world.spawn((Transform::default(), ReverbZone::new(20.0, "Hall")));
        let emitter = world.spawn((Transform::default(), AudioEmitter::default()));

        bridge.sync(&mut world, &mut system);
        assert_eq!(bridge.zone_count(), 1);
        assert_eq!(bridge.emitter_count(), 1);
        let object = emitter_object_id(emitter);
        assert_eq!(system.membership()[&object].len(), 1);

        world.get::<&mut Transform>(emitter).unwrap().position = Vec3::new(25.0, 0.0, 0.0);
        bridge.sync(&mut world, &mut system);
        assert!(system.membership()[&object].is_empty());

        world.despawn(zone_entity).unwrap();
        world.despawn(emitter).unwrap();
        bridge.sync(&mut world, &mut system);
        assert!(system.zones().is_empty());
        assert!(system.objects().is_empty());
        assert!(system.backend().registered_objects().is_empty());
    }

    #[test]
    fn test_cloned_component_gets_its_own_zone() {
        let mut world = World::new();
        let mut system = system();
        let mut bridge = SceneAudioBridge::new();

        let original = world.spawn((Transform::default(), ReverbZone::new(5.0, "Hall")));
        bridge.sync(&mut world, &mut system);

        let copy = (*world.get::<&ReverbZone>(original).unwrap()).clone();
        assert!(copy.zone_id.is_some());
        world.spawn((Transform::from_position(Vec3::X * 50.0), copy));
        bridge.sync(&mut world, &mut system);

        assert_eq!(system.zones().len(), 2);
        assert_eq!(bridge.zone_count(), 2);
    }

    #[test]
    fn test_removed_component_detaches() {
        let mut world = World::new();
        let mut system = system();
        let mut bridge = SceneAudioBridge::new();

        let entity = world.spawn((Transform::default(), AudioEmitter::default()));
        bridge.sync(&mut world, &mut system);
        assert_eq!(system.objects().len(), 1);

        world.remove_one::<AudioEmitter>(entity).unwrap();
        bridge.sync(&mut world, &mut system);
        assert!(system.objects().is_empty());
        assert_eq!(bridge.emitter_count(), 0);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut world = World::new();
        let mut system = system();
        let mut bridge = SceneAudioBridge::new();

        let zone_entity = world.spawn((Transform::default(), ReverbZone::new(5.0, "Hall")));
        world.spawn((Transform::default(), AudioEmitter::default()));
        bridge.sync(&mut world, &mut system);

        bridge.clear(&mut world, &mut system);
        assert!(system.zones().is_empty());
        assert!(system.objects().is_empty());
        assert!(world.get::<&ReverbZone>(zone_entity).unwrap().zone_id.is_none());
    }
}
