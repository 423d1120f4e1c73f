//! Backend that records every call it receives
//!
//! Used by tests as a mock middleware and by the demo to show what the zone
//! engine pushed.

use super::{AudioBackend, AuxSend, BackendError, BankId, BusId, GameObjectId, PlayingId};
use glam::Vec3;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A single call received by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Initialize,
    Terminate,
    RegisterGameObject {
        id: GameObjectId,
        name: String,
    },
    UnregisterGameObject {
        id: GameObjectId,
    },
    SetPosition {
        id: GameObjectId,
        position: Vec3,
        forward: Vec3,
        up: Vec3,
    },
    SetAuxSendLevels {
        id: GameObjectId,
        sends: Vec<AuxSend>,
    },
    LoadBank {
        name: String,
    },
    PostEvent {
        event: String,
        id: GameObjectId,
    },
}

/// In-memory mock of the audio middleware
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    buses: HashMap<String, BusId>,
    failing_banks: HashSet<String>,
    fail_initialize: bool,
    registered: BTreeSet<GameObjectId>,
    next_bank_id: u32,
    next_playing_id: PlayingId,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a bus that `bus_id_from_name` can resolve
    pub fn with_bus(mut self, name: &str, id: u32) -> Self {
        self.buses.insert(name.to_string(), BusId(id));
        self
    }

    /// Make `load_bank` fail for the given bank
    pub fn with_failing_bank(mut self, name: &str) -> Self {
        self.failing_banks.insert(name.to_string());
        self
    }

    /// Make `initialize` fail
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Declare a bus after construction
    pub fn add_bus(&mut self, name: &str, id: u32) {
        self.buses.insert(name.to_string(), BusId(id));
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Game objects registered and not yet unregistered
    pub fn registered_objects(&self) -> &BTreeSet<GameObjectId> {
        &self.registered
    }

    /// All send lists pushed for a game object, oldest first
    pub fn sends_for(&self, id: GameObjectId) -> Vec<Vec<AuxSend>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::SetAuxSendLevels { id: target, sends } if *target == id => {
                    Some(sends.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// The most recent send list pushed for a game object
    pub fn last_sends_for(&self, id: GameObjectId) -> Option<Vec<AuxSend>> {
        self.sends_for(id).pop()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl AudioBackend for RecordingBackend {
    fn initialize(&mut self) -> Result<(), BackendError> {
        self.calls.push(BackendCall::Initialize);
        if self.fail_initialize {
            return Err(BackendError::InitFailed(
                "sound engine refused to start".to_string(),
            ));
        }
        Ok(())
    }

    fn terminate(&mut self) {
        self.calls.push(BackendCall::Terminate);
    }

    fn register_game_object(&mut self, id: GameObjectId, name: &str) {
        self.registered.insert(id);
        self.calls.push(BackendCall::RegisterGameObject {
            id,
            name: name.to_string(),
        });
    }

    fn unregister_game_object(&mut self, id: GameObjectId) {
        self.registered.remove(&id);
        self.calls.push(BackendCall::UnregisterGameObject { id });
    }

    fn set_position(&mut self, id: GameObjectId, position: Vec3, forward: Vec3, up: Vec3) {
        self.calls.push(BackendCall::SetPosition {
            id,
            position,
            forward,
            up,
        });
    }

    fn bus_id_from_name(&self, name: &str) -> Option<BusId> {
        self.buses.get(name).copied()
    }

    fn set_aux_send_levels(&mut self, id: GameObjectId, sends: &[AuxSend]) {
        self.calls.push(BackendCall::SetAuxSendLevels {
            id,
            sends: sends.to_vec(),
        });
    }

    fn load_bank(&mut self, name: &str) -> Result<BankId, BackendError> {
        self.calls.push(BackendCall::LoadBank {
            name: name.to_string(),
        });
        if self.failing_banks.contains(name) {
            return Err(BackendError::BankLoadFailed(name.to_string()));
        }
        self.next_bank_id += 1;
        Ok(BankId(self.next_bank_id))
    }

    fn post_event(&mut self, event: &str, id: GameObjectId) -> Option<PlayingId> {
        self.calls.push(BackendCall::PostEvent {
            event: event.to_string(),
            id,
        });
        self.next_playing_id += 1;
        Some(self.next_playing_id)
    }
}
