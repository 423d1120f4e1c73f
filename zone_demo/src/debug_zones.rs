//! Frame-by-frame logging of zone membership
//!
//! Logs only when membership changes, so long runs stay readable.

use std::collections::{BTreeMap, BTreeSet};
use tracing::info;
use zone_audio::audio::{AudioBackend, AudioZoneSystem, ObjectId, UpdateStats, ZoneId};

/// Last membership seen per object
#[derive(Default)]
pub struct DebugState {
    last: BTreeMap<ObjectId, BTreeSet<ZoneId>>,
}

impl DebugState {
    /// Log objects whose membership changed this frame
    pub fn update<B: AudioBackend>(
        &mut self,
        frame: u32,
        system: &AudioZoneSystem<B>,
        stats: UpdateStats,
    ) {
        let membership = system.membership();

        for (object, zones) in &membership {
            if self.last.get(object) == Some(zones) {
                continue;
            }
            let buses: Vec<&str> = zones
                .iter()
                .filter_map(|id| system.zones().get(*id))
                .map(|zone| zone.bus_name.as_str())
                .collect();
            let position = system.objects().position(*object);
            info!(
                frame,
                object = object.0,
                position = ?position,
                buses = ?buses,
                pushes = stats.pushes,
                "Zone membership changed"
            );
        }

        self.last = membership;
    }
}
