//! Boundary to the external audio middleware
//!
//! The zone engine never talks to the middleware directly. Everything it
//! needs goes through [`AudioBackend`]: game object lifecycle, positioning,
//! bus name resolution, aux send levels, bank loading and event posting.

pub mod null;
pub mod recording;

use glam::Vec3;

pub use null::NullBackend;
pub use recording::{BackendCall, RecordingBackend};

/// Backend handle of a positional entity
pub type GameObjectId = u64;

/// Backend handle of a playing event instance
pub type PlayingId = u32;

/// Backend handle of an auxiliary bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub u32);

/// Backend handle of a loaded sound bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BankId(pub u32);

/// A single (bus, level) pair routed from a game object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxSend {
    /// Destination bus
    pub bus: BusId,
    /// Send level (0.0 to 1.0)
    pub level: f32,
}

/// Errors reported by a backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend initialization failed: {0}")]
    InitFailed(String),

    #[error("Failed to load bank {0}")]
    BankLoadFailed(String),
}

/// Errors that abort the audio zone subsystem
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio backend could not be initialized: {0}")]
    Initialization(#[source] BackendError),
}

/// Narrow interface into the audio middleware.
///
/// Only [`AudioBackend::initialize`] and [`AudioBackend::load_bank`] report
/// failures. Every steady-state call is best-effort: once the backend is up
/// it is assumed to stay available.
pub trait AudioBackend {
    /// Bring up the middleware. Called once before any other method.
    fn initialize(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Tear down the middleware. Called once at shutdown.
    fn terminate(&mut self) {}

    /// Register a positional game object
    fn register_game_object(&mut self, id: GameObjectId, name: &str);

    /// Unregister a positional game object
    fn unregister_game_object(&mut self, id: GameObjectId);

    /// Set the position and orientation of a game object
    fn set_position(&mut self, id: GameObjectId, position: Vec3, forward: Vec3, up: Vec3);

    /// Resolve a bus name. `None` is the invalid-id sentinel.
    fn bus_id_from_name(&self, name: &str) -> Option<BusId>;

    /// Replace the aux sends of a game object with `sends`.
    ///
    /// An empty slice clears every send of the object.
    fn set_aux_send_levels(&mut self, id: GameObjectId, sends: &[AuxSend]);

    /// Load a sound bank by name
    fn load_bank(&mut self, name: &str) -> Result<BankId, BackendError>;

    /// Post an event on a game object
    fn post_event(&mut self, event: &str, id: GameObjectId) -> Option<PlayingId>;
}

/// 32-bit FNV-1 hash of the lowercased name, the scheme the middleware uses
/// to derive ids from names.
pub fn id_from_name(name: &str) -> u32 {
    const FNV_OFFSET: u32 = 2_166_136_261;
    const FNV_PRIME: u32 = 16_777_619;

    name.bytes().fold(FNV_OFFSET, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(byte.to_ascii_lowercase())
    })
}
