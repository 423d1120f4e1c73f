//! Spatial audio zones
//!
//! This module tracks sound-emitting objects and spherical reverb zones and
//! drives per-object aux sends on the audio middleware:
//! - Zone and object registries
//! - Per-frame zone membership evaluation
//! - Aux send level driver
//! - Sound bank and aux bus catalogs read from the bank manifest
//! - ECS bridge with explicit attach/detach lifecycle

pub mod backend;
pub mod banks;
pub mod commands;
pub mod components;
pub mod membership;
pub mod objects;
pub mod scene;
pub mod sends;
pub mod system;
pub mod zones;

// Re-export commonly used types
pub use backend::{
    AudioBackend, AudioError, AuxSend, BackendError, BusId, NullBackend, RecordingBackend,
};
pub use banks::{BankCatalog, BankInfo, BusCatalog, ManifestError};
pub use commands::{push_command, CommandQueue, ZoneCommand};
pub use components::{AudioEmitter, ReverbZone, Transform};
pub use membership::{evaluate, is_in_zone, Membership};
pub use objects::{ObjectId, ObjectRegistry, RegisteredObject};
pub use scene::SceneAudioBridge;
pub use sends::{SendLevelDriver, EFFECT_LEVEL_DISABLED, EFFECT_LEVEL_ENABLED};
pub use system::{AudioZoneSystem, UpdateStats};
pub use zones::{Zone, ZoneId, ZoneRegistry};
