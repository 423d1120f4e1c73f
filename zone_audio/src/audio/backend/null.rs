//! Backend used when no audio middleware is linked
//!
//! Every call succeeds and is only logged.

use super::{
    id_from_name, AudioBackend, AuxSend, BackendError, BankId, BusId, GameObjectId, PlayingId,
};
use glam::Vec3;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Backend that accepts every call without producing sound
#[derive(Debug, Default)]
pub struct NullBackend {
    registered: HashSet<GameObjectId>,
    next_playing_id: PlayingId,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of game objects currently registered
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}

impl AudioBackend for NullBackend {
    fn initialize(&mut self) -> Result<(), BackendError> {
        debug!("Null audio backend initialized");
        Ok(())
    }

    fn terminate(&mut self) {
        debug!(
            leaked = self.registered.len(),
            "Null audio backend terminated"
        );
        self.registered.clear();
    }

    fn register_game_object(&mut self, id: GameObjectId, name: &str) {
        trace!(id, name, "register_game_object");
        self.registered.insert(id);
    }

    fn unregister_game_object(&mut self, id: GameObjectId) {
        trace!(id, "unregister_game_object");
        self.registered.remove(&id);
    }

    fn set_position(&mut self, id: GameObjectId, position: Vec3, _forward: Vec3, _up: Vec3) {
        trace!(id, position = ?position, "set_position");
    }

    fn bus_id_from_name(&self, name: &str) -> Option<BusId> {
        Some(BusId(id_from_name(name)))
    }

    fn set_aux_send_levels(&mut self, id: GameObjectId, sends: &[AuxSend]) {
        trace!(id, sends = ?sends, "set_aux_send_levels");
    }

    fn load_bank(&mut self, name: &str) -> Result<BankId, BackendError> {
        debug!(bank = name, "Loading bank");
        Ok(BankId(id_from_name(name)))
    }

    fn post_event(&mut self, event: &str, id: GameObjectId) -> Option<PlayingId> {
        self.next_playing_id += 1;
        trace!(event, id, playing_id = self.next_playing_id, "post_event");
        Some(self.next_playing_id)
    }
}
