//! Registration commands queued from worker threads
//!
//! Registries are only mutated on the main thread. Code running elsewhere
//! (asset loaders, script hosts) pushes commands here and the system drains
//! them at the start of the next update.

use crate::audio::objects::ObjectId;
use glam::Vec3;
use std::sync::{Arc, RwLock};
use tracing::error;

#[derive(Clone, Debug, PartialEq)]
pub enum ZoneCommand {
    RegisterObject { id: ObjectId, position: Vec3 },
    UnregisterObject { id: ObjectId },
    UpdatePosition { id: ObjectId, position: Vec3 },
}

pub type CommandQueue = Arc<RwLock<Vec<ZoneCommand>>>;

/// Create an empty queue
pub fn new_command_queue() -> CommandQueue {
    Arc::new(RwLock::new(Vec::new()))
}

/// Queue a command. A poisoned lock is recovered, the queue holds plain data.
pub fn push_command(queue: &CommandQueue, command: ZoneCommand) {
    match queue.write() {
        Ok(mut commands) => commands.push(command),
        Err(poisoned) => {
            error!("Zone command queue lock poisoned, recovering");
            poisoned.into_inner().push(command);
        }
    }
}

/// Take every queued command, oldest first
pub fn drain_commands(queue: &CommandQueue) -> Vec<ZoneCommand> {
    match queue.write() {
        Ok(mut commands) => std::mem::take(&mut *commands),
        Err(poisoned) => {
            error!("Zone command queue lock poisoned, recovering");
            std::mem::take(&mut *poisoned.into_inner())
        }
    }
}
