use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PlaybackError;
use crate::event::MediaEvent;
use crate::types::TransportAudioUri;

/// Receiver side of a primitive's lifecycle signals.
pub type MediaEvents = mpsc::UnboundedReceiver<MediaEvent>;

/// Which kind of primitive a playback strategy asks the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Plain media element: lazy decode, minimal readiness.
    MediaElement,
    /// Freshly created audio context: decodes the whole clip before it
    /// reports readiness.
    FreshContext,
}

/// The host's media abstraction for one playback attempt.
#[async_trait]
pub trait PlaybackPrimitive: Send {
    /// Attach a source. Lifecycle signals for it arrive on the returned
    /// receiver until the primitive is dropped.
    fn load(&mut self, source: &TransportAudioUri) -> Result<MediaEvents, PlaybackError>;

    /// Ask the host to start output. Resolves once output has been accepted
    /// or the request is rejected.
    async fn play(&mut self) -> Result<(), PlaybackError>;
}

/// Capability provider for everything that depends on the host environment.
///
/// Hosts without audio return `false` from the capability checks and refuse
/// to open primitives; callers then degrade to a no-op.
pub trait AudioHost: Send + Sync {
    fn name(&self) -> &str;

    /// Whether audio bytes can be turned into a transport URI here.
    fn supports_encoding(&self) -> bool;

    /// Whether WAV clips can be decoded and a fresh context created.
    fn supports_playback(&self) -> bool;

    fn open(&self, kind: PrimitiveKind) -> Result<Box<dyn PlaybackPrimitive>, PlaybackError>;

    /// Block until every clip that already started has finished.
    ///
    /// Playback reports success once output starts, so a short-lived process
    /// calls this before exiting. Hosts without real output return at once.
    fn wait_until_quiet(&self) {}
}

/// Side channel that persists a transport URI as a file.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Save `source` under the suggested `filename`; returns where it landed.
    async fn save(&self, source: &TransportAudioUri, filename: &str) -> Result<PathBuf>;
}
