//! Registry of sound-emitting and listening objects

use crate::audio::backend::GameObjectId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle of a tracked object. Doubles as its backend game object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub GameObjectId);

/// An emitter or listener taking part in zone evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisteredObject {
    pub id: ObjectId,
    pub position: Vec3,
}

/// Tracks the current world position of every registered object
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: BTreeMap<ObjectId, RegisteredObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an object. Returns true if the id was not tracked yet.
    pub fn register_object(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.objects
            .insert(id, RegisteredObject { id, position })
            .is_none()
    }

    /// Stop tracking an object. Returns false if it was not tracked.
    pub fn unregister_object(&mut self, id: ObjectId) -> bool {
        self.objects.remove(&id).is_some()
    }

    /// Same as re-registering
    pub fn update_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.register_object(id, position)
    }

    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.objects.get(&id).map(|object| object.position)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Iterate objects in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredObject> {
        self.objects.values()
    }

    /// Ids of every tracked object
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
