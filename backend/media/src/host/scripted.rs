//! Deterministic host whose primitives follow a fixed event script.
//!
//! Backs the CLI's `--mute` mode and every playback test.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use readaloud_core::{
    AudioHost, MediaEvent, MediaEvents, PlaybackError, PlaybackPrimitive, PrimitiveKind,
    TransportAudioUri,
};
use tokio::sync::mpsc;

/// How a scripted primitive answers the play request.
#[derive(Debug, Clone)]
pub enum PlayReply {
    Accept,
    Reject(String),
    /// Never answers.
    Hang,
}

/// Event script for one primitive kind.
#[derive(Debug, Clone)]
pub struct Script {
    /// Emitted as soon as a source is loaded.
    pub on_load: Vec<MediaEvent>,
    pub play: PlayReply,
    /// Emitted after the play request is accepted.
    pub on_play: Vec<MediaEvent>,
    /// Keep the event stream open once the script is exhausted.
    pub hold_open: bool,
}

impl Script {
    /// Loads, plays, and ends cleanly.
    pub fn completes() -> Self {
        Self {
            on_load: vec![MediaEvent::LoadedData, MediaEvent::CanPlayThrough],
            play: PlayReply::Accept,
            on_play: vec![MediaEvent::Playing, MediaEvent::Ended],
            hold_open: false,
        }
    }

    /// The host refuses to start output without a user gesture.
    pub fn autoplay_blocked() -> Self {
        Self {
            on_load: vec![MediaEvent::LoadedData],
            play: PlayReply::Reject("NotAllowedError: play() requires a user gesture".into()),
            on_play: vec![],
            hold_open: true,
        }
    }

    /// The primitive cannot decode the source.
    pub fn decode_error(detail: impl Into<String>) -> Self {
        Self {
            on_load: vec![MediaEvent::Error(detail.into())],
            play: PlayReply::Accept,
            on_play: vec![],
            hold_open: true,
        }
    }

    /// A decoder worker that reports its error and exits, so the pending
    /// play request is dropped unanswered.
    pub fn decode_error_then_exit(detail: impl Into<String>) -> Self {
        Self {
            on_load: vec![MediaEvent::Error(detail.into())],
            play: PlayReply::Reject("clip worker exited".into()),
            on_play: vec![],
            hold_open: false,
        }
    }

    /// Never becomes ready and never answers.
    pub fn never_ready() -> Self {
        Self {
            on_load: vec![],
            play: PlayReply::Hang,
            on_play: vec![],
            hold_open: true,
        }
    }
}

#[derive(Default)]
struct Journal {
    opened: Vec<PrimitiveKind>,
    loaded: Vec<(PrimitiveKind, TransportAudioUri)>,
    plays: Vec<PrimitiveKind>,
}

/// Host that hands out [`Script`]-driven primitives and records every call.
#[derive(Clone)]
pub struct ScriptedHost {
    scripts: HashMap<PrimitiveKind, Script>,
    encoding: bool,
    encoding_checks: Arc<AtomicUsize>,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedHost {
    pub fn new(primary: Script, fallback: Script) -> Self {
        let mut scripts = HashMap::new();
        scripts.insert(PrimitiveKind::MediaElement, primary);
        scripts.insert(PrimitiveKind::FreshContext, fallback);
        Self {
            scripts,
            encoding: true,
            encoding_checks: Arc::new(AtomicUsize::new(0)),
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    /// Both strategies play to completion without producing sound.
    pub fn succeeding() -> Self {
        Self::new(Script::completes(), Script::completes())
    }

    pub fn without_encoding(mut self) -> Self {
        self.encoding = false;
        self
    }

    /// How many times the encoder asked whether it may encode.
    pub fn encoding_checks(&self) -> usize {
        self.encoding_checks.load(Ordering::SeqCst)
    }

    /// How many primitives of `kind` were opened.
    pub fn opened(&self, kind: PrimitiveKind) -> usize {
        self.with_journal(|j| j.opened.iter().filter(|k| **k == kind).count())
    }

    /// Sources loaded into primitives of `kind`, in order.
    pub fn loaded(&self, kind: PrimitiveKind) -> Vec<TransportAudioUri> {
        self.with_journal(|j| {
            j.loaded
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, uri)| uri.clone())
                .collect()
        })
    }

    /// Play requests issued to primitives of `kind`.
    pub fn plays(&self, kind: PrimitiveKind) -> usize {
        self.with_journal(|j| j.plays.iter().filter(|k| **k == kind).count())
    }

    fn with_journal<T>(&self, f: impl FnOnce(&Journal) -> T) -> T {
        match self.journal.lock() {
            Ok(j) => f(&*j),
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }
}

impl AudioHost for ScriptedHost {
    fn name(&self) -> &str {
        "scripted"
    }

    fn supports_encoding(&self) -> bool {
        self.encoding_checks.fetch_add(1, Ordering::SeqCst);
        self.encoding
    }

    fn supports_playback(&self) -> bool {
        true
    }

    fn open(&self, kind: PrimitiveKind) -> Result<Box<dyn PlaybackPrimitive>, PlaybackError> {
        let script = self
            .scripts
            .get(&kind)
            .cloned()
            .ok_or_else(|| PlaybackError::Unavailable(format!("no script for {kind:?}")))?;
        if let Ok(mut j) = self.journal.lock() {
            j.opened.push(kind);
        }
        Ok(Box::new(ScriptedPrimitive {
            kind,
            script,
            journal: Arc::clone(&self.journal),
            events: None,
        }))
    }
}

struct ScriptedPrimitive {
    kind: PrimitiveKind,
    script: Script,
    journal: Arc<Mutex<Journal>>,
    events: Option<mpsc::UnboundedSender<MediaEvent>>,
}

impl ScriptedPrimitive {
    fn record_play(&self) {
        if let Ok(mut j) = self.journal.lock() {
            j.plays.push(self.kind);
        }
    }
}

#[async_trait]
impl PlaybackPrimitive for ScriptedPrimitive {
    fn load(&mut self, source: &TransportAudioUri) -> Result<MediaEvents, PlaybackError> {
        if let Ok(mut j) = self.journal.lock() {
            j.loaded.push((self.kind, source.clone()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        for event in &self.script.on_load {
            let _ = tx.send(event.clone());
        }
        self.events = Some(tx);
        Ok(rx)
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        self.record_play();
        match self.script.play.clone() {
            PlayReply::Accept => {
                if let Some(tx) = &self.events {
                    for event in &self.script.on_play {
                        let _ = tx.send(event.clone());
                    }
                }
                if !self.script.hold_open {
                    self.events = None;
                }
                Ok(())
            }
            PlayReply::Reject(reason) => Err(PlaybackError::PlayRejected(reason)),
            PlayReply::Hang => std::future::pending().await,
        }
    }
}
