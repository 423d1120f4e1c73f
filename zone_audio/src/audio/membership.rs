//! Zone membership evaluation
//!
//! Membership is recomputed from scratch from the two registries every
//! frame and never stored on zones or objects. The evaluator only needs to
//! iterate both collections, so a grid or BVH can replace the brute-force
//! scan without changing callers.

use crate::audio::objects::{ObjectId, ObjectRegistry};
use crate::audio::zones::{Zone, ZoneId, ZoneRegistry};
use glam::Vec3;
use std::collections::{BTreeMap, BTreeSet};

/// Zones containing each registered object
pub type Membership = BTreeMap<ObjectId, BTreeSet<ZoneId>>;

/// True when `position` lies inside the zone sphere, boundary included
pub fn is_in_zone(position: Vec3, zone: &Zone) -> bool {
    position.distance_squared(zone.position) <= zone.radius * zone.radius
}

/// Every zone whose volume contains `position`
pub fn zones_containing(zones: &ZoneRegistry, position: Vec3) -> BTreeSet<ZoneId> {
    zones
        .iter()
        .filter(|zone| is_in_zone(position, zone))
        .map(|zone| zone.id)
        .collect()
}

/// Compute membership for every object against every zone.
///
/// O(objects × zones). Objects outside every zone map to an empty set.
pub fn evaluate(zones: &ZoneRegistry, objects: &ObjectRegistry) -> Membership {
    objects
        .iter()
        .map(|object| (object.id, zones_containing(zones, object.position)))
        .collect()
}
