//! Aux send level driver
//!
//! Turns zone membership into aux sends on the backend. Every push carries
//! the complete list of active sends and replaces whatever the object had
//! before, so an object that left every zone gets an empty list and no
//! stale reverb send survives. Objects are only pushed when their resolved
//! list changed since the last push.

use crate::audio::backend::{AudioBackend, AuxSend};
use crate::audio::objects::ObjectId;
use crate::audio::zones::{ZoneId, ZoneRegistry};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Level used for every bus of a zone the object is in
pub const EFFECT_LEVEL_ENABLED: f32 = 1.0;

/// Level of a bus the object is not routed to. Never pushed explicitly:
/// absence from the send list means disabled.
pub const EFFECT_LEVEL_DISABLED: f32 = 0.0;

/// Sends resolved for one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSends {
    /// One entry per member zone whose bus resolved, in zone order
    pub sends: Vec<AuxSend>,
    /// Bus names that did not resolve to a backend id
    pub unresolved: Vec<String>,
}

/// Result of [`SendLevelDriver::apply`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    /// Whether the backend was called
    pub pushed: bool,
    /// Bus names skipped because they did not resolve
    pub unresolved: Vec<String>,
}

/// Resolve the sends of a membership set. Zones missing from the registry
/// are ignored.
pub fn resolve_sends(
    backend: &dyn AudioBackend,
    zones: &ZoneRegistry,
    zone_set: &BTreeSet<ZoneId>,
) -> ResolvedSends {
    let mut resolved = ResolvedSends::default();

    for zone in zone_set.iter().filter_map(|id| zones.get(*id)) {
        match backend.bus_id_from_name(&zone.bus_name) {
            Some(bus) => resolved.sends.push(AuxSend {
                bus,
                level: EFFECT_LEVEL_ENABLED,
            }),
            None => resolved.unresolved.push(zone.bus_name.clone()),
        }
    }

    resolved
}

/// Pushes per-object aux sends to the backend
#[derive(Debug, Default)]
pub struct SendLevelDriver {
    last_pushed: HashMap<ObjectId, Vec<AuxSend>>,
}

impl SendLevelDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the sends for `object` if they differ from the last push
    pub fn apply(
        &mut self,
        backend: &mut dyn AudioBackend,
        object: ObjectId,
        zone_set: &BTreeSet<ZoneId>,
        zones: &ZoneRegistry,
    ) -> ApplyOutcome {
        let ResolvedSends { sends, unresolved } = resolve_sends(backend, zones, zone_set);

        if self.last_pushed.get(&object) == Some(&sends) {
            return ApplyOutcome {
                pushed: false,
                unresolved,
            };
        }

        trace!(object = object.0, sends = ?sends, "Pushing aux sends");
        backend.set_aux_send_levels(object.0, &sends);
        self.last_pushed.insert(object, sends);

        ApplyOutcome {
            pushed: true,
            unresolved,
        }
    }

    /// The last send list pushed for `object`
    pub fn last_pushed(&self, object: ObjectId) -> Option<&[AuxSend]> {
        self.last_pushed.get(&object).map(Vec::as_slice)
    }

    /// Drop the cached sends of an object that was unregistered
    pub fn forget(&mut self, object: ObjectId) {
        self.last_pushed.remove(&object);
    }

    pub fn clear(&mut self) {
        self.last_pushed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::{BusId, RecordingBackend};
    use crate::audio::zones::add_zone;
    use glam::Vec3;

    #[test]
    fn test_one_send_per_member_zone() {
        let mut backend = RecordingBackend::new().with_bus("Hall", 1).with_bus("Cave", 2);
        let mut zones = ZoneRegistry::default();
        let a = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let b = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Cave");

        let resolved = resolve_sends(&backend, &zones, &BTreeSet::from([a, b]));
        assert_eq!(
            resolved.sends,
            vec![
                AuxSend {
                    bus: BusId(1),
                    level: EFFECT_LEVEL_ENABLED
                },
                AuxSend {
                    bus: BusId(2),
                    level: EFFECT_LEVEL_ENABLED
                },
            ]
        );
        assert!(resolved.unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_bus_is_skipped() {
        let mut backend = RecordingBackend::new().with_bus("Hall", 1);
        let mut zones = ZoneRegistry::default();
        let a = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let b = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Missing");

        let mut driver = SendLevelDriver::new();
        let outcome = driver.apply(&mut backend, ObjectId(9), &BTreeSet::from([a, b]), &zones);

        assert!(outcome.pushed);
        assert_eq!(outcome.unresolved, vec!["Missing".to_string()]);
        assert_eq!(
            backend.last_sends_for(9),
            Some(vec![AuxSend {
                bus: BusId(1),
                level: 1.0
            }])
        );
    }

    #[test]
    fn test_unchanged_sends_are_not_pushed_again() {
        let mut backend = RecordingBackend::new().with_bus("Hall", 1);
        let mut zones = ZoneRegistry::default();
        let a = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let set = BTreeSet::from([a]);

        let mut driver = SendLevelDriver::new();
        assert!(driver.apply(&mut backend, ObjectId(1), &set, &zones).pushed);
        assert!(!driver.apply(&mut backend, ObjectId(1), &set, &zones).pushed);
        assert_eq!(backend.sends_for(1).len(), 1);
    }

    #[test]
    fn test_first_apply_with_empty_set_clears_sends() {
        let mut backend = RecordingBackend::new();
        let zones = ZoneRegistry::default();
        let mut driver = SendLevelDriver::new();

        let outcome = driver.apply(&mut backend, ObjectId(4), &BTreeSet::new(), &zones);
        assert!(outcome.pushed);
        assert_eq!(backend.last_sends_for(4), Some(Vec::new()));
        assert_eq!(driver.last_pushed(ObjectId(4)), Some(&[][..]));
    }

    #[test]
    fn test_forget_forces_next_push() {
        let mut backend = RecordingBackend::new();
        let zones = ZoneRegistry::default();
        let mut driver = SendLevelDriver::new();
        let empty = BTreeSet::new();

        driver.apply(&mut backend, ObjectId(2), &empty, &zones);
        driver.forget(ObjectId(2));
        assert!(driver.apply(&mut backend, ObjectId(2), &empty, &zones).pushed);
    }

    #[test]
    fn test_bus_change_is_pushed_even_if_membership_is_stable() {
        let mut backend = RecordingBackend::new().with_bus("Hall", 1).with_bus("Cave", 2);
        let mut zones = ZoneRegistry::default();
        let a = add_zone(&mut zones, &mut backend, Vec3::ZERO, 5.0, "Hall");
        let set = BTreeSet::from([a]);
        let mut driver = SendLevelDriver::new();

        driver.apply(&mut backend, ObjectId(1), &set, &zones);
        zones.update_zone(a, Vec3::ZERO, 5.0, "Cave");
        assert!(driver.apply(&mut backend, ObjectId(1), &set, &zones).pushed);
        assert_eq!(
            backend.last_sends_for(1),
            Some(vec![AuxSend {
                bus: BusId(2),
                level: 1.0
            }])
        );
    }
}
