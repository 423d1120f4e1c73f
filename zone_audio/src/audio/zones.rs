//! Reverb zone registry

use crate::audio::backend::{AudioBackend, GameObjectId};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Name given to zone game objects on the backend
pub const ZONE_OBJECT_NAME: &str = "ReverbZone";

/// Handle of a registered zone. Doubles as its backend game object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub GameObjectId);

/// A spherical volume routing its occupants to an auxiliary bus
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    /// Zone center in world space
    pub position: Vec3,
    /// Always >= 0
    pub radius: f32,
    /// Auxiliary bus the occupants are sent to
    pub bus_name: String,
}

/// Owns every active zone
#[derive(Debug)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, Zone>,
    /// None once the id space is exhausted
    next_zone_id: Option<GameObjectId>,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ZoneRegistry {
    /// Create an empty registry that allocates ids starting at `first_zone_id`
    pub fn new(first_zone_id: GameObjectId) -> Self {
        Self {
            zones: BTreeMap::new(),
            next_zone_id: Some(first_zone_id),
        }
    }

    /// Register a zone and return its id.
    ///
    /// If `requested` names a zone that is already registered nothing happens
    /// and that id is returned. Otherwise a fresh id is allocated; ids are
    /// never reused and ids for which `in_use` returns true are skipped, since
    /// zones share the backend game object id space with audio objects.
    ///
    /// Returns `None` once the id space is exhausted.
    pub fn create_zone(
        &mut self,
        backend: &mut dyn AudioBackend,
        requested: Option<ZoneId>,
        position: Vec3,
        radius: f32,
        bus_name: &str,
        in_use: impl Fn(GameObjectId) -> bool,
    ) -> Option<ZoneId> {
        if let Some(id) = requested {
            if self.zones.contains_key(&id) {
                debug!(zone = id.0, "Zone already registered");
                return Some(id);
            }
        }

        let Some(id) = self.allocate_id(in_use) else {
            warn!(bus = bus_name, "Zone ids exhausted, zone not created");
            return None;
        };

        backend.register_game_object(id.0, ZONE_OBJECT_NAME);
        self.zones.insert(
            id,
            Zone {
                id,
                position,
                radius: sanitize_radius(radius),
                bus_name: bus_name.to_string(),
            },
        );

        debug!(zone = id.0, bus = bus_name, radius, "Created reverb zone");
        Some(id)
    }

    fn allocate_id(&mut self, in_use: impl Fn(GameObjectId) -> bool) -> Option<ZoneId> {
        loop {
            let id = self.next_zone_id?;
            self.next_zone_id = id.checked_add(1);
            if !in_use(id) {
                return Some(ZoneId(id));
            }
            debug!(id, "Skipping zone id held by an audio object");
        }
    }

    /// Overwrite a zone's parameters. Returns false if the id is unknown.
    pub fn update_zone(&mut self, id: ZoneId, position: Vec3, radius: f32, bus_name: &str) -> bool {
        match self.zones.get_mut(&id) {
            Some(zone) => {
                zone.position = position;
                zone.radius = sanitize_radius(radius);
                if zone.bus_name != bus_name {
                    zone.bus_name = bus_name.to_string();
                }
                true
            }
            None => {
                debug!(zone = id.0, "Ignoring update of unknown zone");
                false
            }
        }
    }

    /// Unregister and delete a zone. Returns false if the id is unknown.
    pub fn remove_zone(&mut self, backend: &mut dyn AudioBackend, id: ZoneId) -> bool {
        match self.zones.remove(&id) {
            Some(_) => {
                backend.unregister_game_object(id.0);
                debug!(zone = id.0, "Removed reverb zone");
                true
            }
            None => {
                debug!(zone = id.0, "Ignoring removal of unknown zone");
                false
            }
        }
    }

    /// Unregister and delete every zone
    pub fn remove_all(&mut self, backend: &mut dyn AudioBackend) {
        for id in self.zones.keys() {
            backend.unregister_game_object(id.0);
        }
        let count = self.zones.len();
        self.zones.clear();
        if count > 0 {
            debug!(count, "Removed all reverb zones");
        }
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.contains_key(&id)
    }

    /// Iterate zones in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn sanitize_radius(radius: f32) -> f32 {
    if radius >= 0.0 {
        radius
    } else {
        warn!(radius, "Zone radius must be non-negative, clamping to 0");
        0.0
    }
}

/// Create a zone with a fresh id when no objects are in play
#[cfg(test)]
pub(crate) fn add_zone(
    zones: &mut ZoneRegistry,
    backend: &mut dyn AudioBackend,
    position: Vec3,
    radius: f32,
    bus_name: &str,
) -> ZoneId {
    zones
        .create_zone(backend, None, position, radius, bus_name, |_| false)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::{BackendCall, RecordingBackend};

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::new(1000);

        let a = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let b = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        assert_eq!(a, ZoneId(1000));
        assert_eq!(b, ZoneId(1001));

        zones.remove_zone(&mut backend, b);
        let c = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        assert_eq!(c, ZoneId(1002));
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::default();

        let id = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let again = zones
            .create_zone(&mut backend, Some(id), Vec3::ONE, 9.0, "Cave", |_| false)
            .unwrap();

        assert_eq!(id, again);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones.get(id).unwrap().bus_name, "Hall");
        assert_eq!(
            backend.count(|c| matches!(c, BackendCall::RegisterGameObject { .. })),
            1
        );
    }

    #[test]
    fn test_stale_requested_id_gets_fresh_id() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::new(1000);

        let id = zones
            .create_zone(&mut backend, Some(ZoneId(42)), Vec3::ZERO, 1.0, "Hall", |_| false)
            .unwrap();
        assert_eq!(id, ZoneId(1000));
    }

    #[test]
    fn test_negative_radius_is_clamped() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::default();

        let id = add_zone(&mut zones, &mut backend, Vec3::ZERO, -3.0, "Hall");
        assert_eq!(zones.get(id).unwrap().radius, 0.0);

        zones.update_zone(id, Vec3::ZERO, f32::NAN, "Hall");
        assert_eq!(zones.get(id).unwrap().radius, 0.0);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::default();

        assert!(!zones.update_zone(ZoneId(7), Vec3::ZERO, 1.0, "Hall"));
        assert!(!zones.remove_zone(&mut backend, ZoneId(7)));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_remove_all_unregisters_every_zone() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::default();

        add_zone(&mut zones, &mut backend, Vec3::ZERO, 1.0, "Hall");
        add_zone(&mut zones, &mut backend, Vec3::X, 2.0, "Cave");
        assert_eq!(backend.registered_objects().len(), 2);

        zones.remove_all(&mut backend);
        assert!(zones.is_empty());
        assert!(backend.registered_objects().is_empty());
    }

    #[test]
    fn test_allocation_skips_ids_in_use() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::new(1000);

        let id = zones
            .create_zone(&mut backend, None, Vec3::ZERO, 1.0, "Hall", |id| id <= 1001)
            .unwrap();
        assert_eq!(id, ZoneId(1002));
        let next = add_zone(&mut zones, &mut backend, Vec3::ZERO, 1.0, "Hall");
        assert_eq!(next, ZoneId(1003));
    }

    #[test]
    fn test_exhausted_ids_refuse_allocation() {
        let mut backend = RecordingBackend::new();
        let mut zones = ZoneRegistry::new(u64::MAX);

        let last = zones.create_zone(&mut backend, None, Vec3::ZERO, 1.0, "Hall", |_| false);
        assert_eq!(last, Some(ZoneId(u64::MAX)));

        let next = zones.create_zone(&mut backend, None, Vec3::ZERO, 1.0, "Cave", |_| false);
        assert!(next.is_none());
        assert_eq!(zones.len(), 1);
        assert_eq!(backend.registered_objects().len(), 1);
    }
}
