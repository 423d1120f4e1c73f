//! Audio components for the ECS
//!
//! Components only carry data. Cloning or copying one never touches the
//! backend; registration happens through the explicit attach/detach calls
//! in [`crate::audio::scene`].

use crate::audio::zones::ZoneId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World transform of an entity as seen by the audio layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Reverb zone centered on the entity's transform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReverbZone {
    /// Zone radius
    pub radius: f32,

    /// Auxiliary bus objects inside the zone are sent to
    pub bus_name: String,

    /// Registered zone, set while attached
    #[serde(skip)]
    pub zone_id: Option<ZoneId>,
}

impl Default for ReverbZone {
    fn default() -> Self {
        Self {
            radius: 10.0,
            bus_name: String::new(),
            zone_id: None,
        }
    }
}

impl ReverbZone {
    pub fn new(radius: f32, bus_name: impl Into<String>) -> Self {
        Self {
            radius,
            bus_name: bus_name.into(),
            zone_id: None,
        }
    }
}

/// Marks an entity as a sound emitter or listener taking part in zone
/// evaluation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioEmitter {
    /// Whether the emitter is registered with the zone system
    #[serde(skip)]
    pub attached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverb_zone_defaults() {
        let zone = ReverbZone::default();
        assert_eq!(zone.radius, 10.0);
        assert!(zone.bus_name.is_empty());
        assert!(zone.zone_id.is_none());
    }

    #[test]
    fn test_runtime_state_is_not_serialized() {
        let zone = ReverbZone {
            zone_id: Some(ZoneId(1000)),
            ..ReverbZone::new(20.0, "Hall")
        };
        let json = serde_json::to_string(&zone).unwrap();
        assert!(!json.contains("zone_id"));

        let restored: ReverbZone = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.radius, 20.0);
        assert_eq!(restored.bus_name, "Hall");
        assert!(restored.zone_id.is_none());
    }

    #[test]
    fn test_clone_is_plain_data() {
        let zone = ReverbZone {
            zone_id: Some(ZoneId(1001)),
            ..ReverbZone::new(5.0, "Cave")
        };
        let copy = zone.clone();
        assert_eq!(copy, zone);
    }
}
