//! Audio zone system
//!
//! [`AudioZoneSystem`] owns everything the zone engine needs: the backend,
//! both registries, the send driver and the bank/bus catalogs. It is built
//! once at subsystem init, handed by reference to the scene layer and torn
//! down at shutdown.

use crate::audio::{
    backend::{AudioBackend, AudioError, PlayingId},
    banks::{BankCatalog, BusCatalog},
    commands::{drain_commands, new_command_queue, CommandQueue, ZoneCommand},
    membership::{evaluate, Membership},
    objects::{ObjectId, ObjectRegistry},
    sends::SendLevelDriver,
    zones::{ZoneId, ZoneRegistry},
};
use crate::config::AudioZoneConfig;
use glam::{Quat, Vec3};
use std::collections::HashSet;
use tracing::{debug, error, info, trace, warn};

/// Name given to emitter and listener game objects on the backend
pub const OBJECT_NAME: &str = "AudioObject";

/// Counters reported by [`AudioZoneSystem::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Objects evaluated
    pub objects: usize,
    /// Zones evaluated against
    pub zones: usize,
    /// Send lists pushed to the backend
    pub pushes: usize,
}

/// Zone membership and send level engine
pub struct AudioZoneSystem<B: AudioBackend> {
    backend: B,
    config: AudioZoneConfig,
    zones: ZoneRegistry,
    objects: ObjectRegistry,
    driver: SendLevelDriver,
    banks: BankCatalog,
    buses: BusCatalog,
    commands: CommandQueue,
    warned_buses: HashSet<String>,
    shut_down: bool,
}

impl<B: AudioBackend> AudioZoneSystem<B> {
    /// Initialize the backend and create an empty system.
    ///
    /// Backend initialization failure aborts the whole subsystem.
    pub fn new(mut backend: B, config: AudioZoneConfig) -> Result<Self, AudioError> {
        info!("Initializing audio zone system");

        if let Err(e) = backend.initialize() {
            error!(error = %e, "Audio backend initialization failed");
            return Err(AudioError::Initialization(e));
        }

        info!(first_zone_id = config.first_zone_id, "Audio zone system initialized");
        Ok(Self {
            backend,
            zones: ZoneRegistry::new(config.first_zone_id),
            config,
            objects: ObjectRegistry::new(),
            driver: SendLevelDriver::new(),
            banks: BankCatalog::new(),
            buses: BusCatalog::new(),
            commands: new_command_queue(),
            warned_buses: HashSet::new(),
            shut_down: false,
        })
    }

    /// Read the bank manifest into the bank and bus catalogs.
    ///
    /// Must run before the frame loop. A missing or malformed manifest only
    /// leaves the catalogs empty. Returns whether both catalogs loaded.
    pub fn load_catalogs(&mut self) -> bool {
        let path = self.config.manifest_path.clone();

        let banks_ok = match self.banks.load_manifest(&path) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = ?path, error = %e, "Could not load bank manifest");
                false
            }
        };

        let buses_ok = match self.buses.discover_buses(&path, &self.config.init_bank_name) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = ?path, error = %e, "Could not discover aux busses");
                false
            }
        };

        if banks_ok && self.config.load_banks_on_startup {
            self.load_banks();
        }

        banks_ok && buses_ok
    }

    /// Load every catalogued bank on the backend, init bank first.
    ///
    /// Returns the number of banks loaded.
    pub fn load_banks(&mut self) -> usize {
        let init = self.config.init_bank_name.as_str();
        let mut names: Vec<&str> = self.banks.bank_names();
        names.sort_by_key(|name| *name != init);

        let mut loaded = 0;
        for name in names {
            match self.backend.load_bank(name) {
                Ok(id) => {
                    debug!(bank = name, id = id.0, "Bank loaded");
                    loaded += 1;
                }
                Err(e) => warn!(bank = name, error = %e, "Bank failed to load"),
            }
        }

        info!(loaded, total = self.banks.len(), "Sound banks loaded");
        loaded
    }

    /// Register a zone, skipping ids held by tracked objects. See
    /// [`ZoneRegistry::create_zone`].
    pub fn create_zone(
        &mut self,
        requested: Option<ZoneId>,
        position: Vec3,
        radius: f32,
        bus_name: &str,
    ) -> Option<ZoneId> {
        let objects = &self.objects;
        self.zones.create_zone(
            &mut self.backend,
            requested,
            position,
            radius,
            bus_name,
            |id| objects.contains(ObjectId(id)),
        )
    }

    pub fn update_zone(&mut self, id: ZoneId, position: Vec3, radius: f32, bus_name: &str) -> bool {
        self.zones.update_zone(id, position, radius, bus_name)
    }

    /// Remove a zone. Objects inside it lose its send on the next update.
    pub fn remove_zone(&mut self, id: ZoneId) -> bool {
        self.zones.remove_zone(&mut self.backend, id)
    }

    pub fn remove_all_zones(&mut self) {
        self.zones.remove_all(&mut self.backend);
    }

    /// Track an object, registering its game object on first sight.
    ///
    /// Ids held by a zone's game object are refused. Returns whether the
    /// object is tracked afterwards.
    pub fn register_object(&mut self, id: ObjectId, position: Vec3) -> bool {
        if self.zones.contains(ZoneId(id.0)) {
            warn!(object = id.0, "Object id is held by a reverb zone, ignoring");
            return false;
        }
        if self.objects.register_object(id, position) {
            self.backend.register_game_object(id.0, OBJECT_NAME);
            debug!(object = id.0, "Registered audio object");
        }
        true
    }

    /// Stop tracking an object and unregister its game object
    pub fn unregister_object(&mut self, id: ObjectId) {
        if self.objects.unregister_object(id) {
            self.backend.unregister_game_object(id.0);
            self.driver.forget(id);
            debug!(object = id.0, "Unregistered audio object");
        } else {
            debug!(object = id.0, "Ignoring unregister of unknown object");
        }
    }

    /// Overwrite the tracked position of an object
    pub fn update_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.register_object(id, position)
    }

    /// Update the tracked position and forward position and orientation to
    /// the backend
    pub fn set_object_transform(&mut self, id: ObjectId, position: Vec3, rotation: Quat) {
        if !self.update_position(id, position) {
            return;
        }

        let forward = (rotation * Vec3::NEG_Z).normalize();
        let up = (rotation * Vec3::Y).normalize();
        self.backend.set_position(id.0, position, forward, up);
    }

    /// Post an event on a tracked object
    pub fn post_event(&mut self, event: &str, id: ObjectId) -> Option<PlayingId> {
        if !self.banks.is_empty() && self.banks.find_event(event).is_none() {
            warn!(event, "Posting event that no loaded bank lists");
        }
        self.backend.post_event(event, id.0)
    }

    /// Handle for queuing registrations from other threads
    pub fn command_queue(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Current membership, without touching the backend
    pub fn membership(&self) -> Membership {
        evaluate(&self.zones, &self.objects)
    }

    /// Per-frame update. Run after the transform step has written fresh
    /// positions.
    pub fn update(&mut self) -> UpdateStats {
        for command in drain_commands(&self.commands) {
            match command {
                ZoneCommand::RegisterObject { id, position } => {
                    self.register_object(id, position);
                }
                ZoneCommand::UnregisterObject { id } => self.unregister_object(id),
                ZoneCommand::UpdatePosition { id, position } => {
                    self.update_position(id, position);
                }
            }
        }

        let membership = evaluate(&self.zones, &self.objects);
        let mut stats = UpdateStats {
            objects: self.objects.len(),
            zones: self.zones.len(),
            pushes: 0,
        };

        for (object, zone_set) in &membership {
            let outcome = self
                .driver
                .apply(&mut self.backend, *object, zone_set, &self.zones);
            if outcome.pushed {
                stats.pushes += 1;
            }
            for bus in outcome.unresolved {
                if !self.warned_buses.contains(&bus) {
                    warn!(bus = %bus, "Reverb zone bus does not resolve, send skipped");
                    self.warned_buses.insert(bus);
                }
            }
        }

        trace!(?stats, "Audio zone update");
        stats
    }

    /// Remove every zone and object and terminate the backend. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.zones.remove_all(&mut self.backend);
        for id in self.objects.ids() {
            self.backend.unregister_game_object(id.0);
        }
        self.objects.clear();
        self.driver.clear();
        self.backend.terminate();

        info!("Audio zone system shut down");
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn driver(&self) -> &SendLevelDriver {
        &self.driver
    }

    pub fn banks(&self) -> &BankCatalog {
        &self.banks
    }

    pub fn buses(&self) -> &BusCatalog {
        &self.buses
    }

    pub fn config(&self) -> &AudioZoneConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: AudioBackend> Drop for AudioZoneSystem<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
