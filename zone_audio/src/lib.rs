//! Spatial audio zone engine
//!
//! Tracks moving sound emitters and volumetric reverb zones, works out zone
//! membership every frame and drives aux bus send levels on an external
//! audio middleware through the [`audio::AudioBackend`] trait.

pub mod audio;
pub mod config;

// Re-export commonly used types
pub mod prelude {
    pub use crate::audio::{
        AudioBackend, AudioEmitter, AudioZoneSystem, NullBackend, ObjectId, RecordingBackend,
        ReverbZone, SceneAudioBridge, Transform, ZoneId,
    };

    pub use crate::config::AudioZoneConfig;

    pub use glam::{Quat, Vec3};
}

/// Initialize logging for the audio zone engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zone_audio=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
