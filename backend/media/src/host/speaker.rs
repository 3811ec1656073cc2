//! Real audio output through the default device via `rodio`.
//!
//! Each loaded clip gets its own worker thread: `rodio::OutputStream` is not
//! `Send`, so the stream, the sink, and the decoder all live on that thread.
//! The async side talks to it through a play-request channel and receives
//! lifecycle signals on the usual event receiver.

use std::io::Cursor;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use async_trait::async_trait;
use readaloud_core::{
    AudioHost, MediaEvent, MediaEvents, PlaybackError, PlaybackPrimitive, PrimitiveKind,
    TransportAudioUri,
};
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::transport;

type PlayRequest = oneshot::Sender<Result<(), PlaybackError>>;

/// Count of clip workers still running.
#[derive(Default)]
struct ActiveClips {
    count: Mutex<usize>,
    quiet: Condvar,
}

impl ActiveClips {
    fn enter(self: &Arc<Self>) -> ClipGuard {
        if let Ok(mut n) = self.count.lock() {
            *n += 1;
        }
        ClipGuard(Arc::clone(self))
    }

    fn wait(&self) {
        let Ok(mut n) = self.count.lock() else { return };
        while *n > 0 {
            n = match self.quiet.wait(n) {
                Ok(n) => n,
                Err(_) => return,
            };
        }
    }
}

/// Held by a clip worker for as long as it runs.
struct ClipGuard(Arc<ActiveClips>);

impl Drop for ClipGuard {
    fn drop(&mut self) {
        if let Ok(mut n) = self.0.count.lock() {
            *n = n.saturating_sub(1);
            if *n == 0 {
                self.0.quiet.notify_all();
            }
        }
    }
}

pub struct SpeakerHost {
    volume: f32,
    active: Arc<ActiveClips>,
}

impl SpeakerHost {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            active: Arc::new(ActiveClips::default()),
        }
    }
}

impl Default for SpeakerHost {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AudioHost for SpeakerHost {
    fn name(&self) -> &str {
        "speaker"
    }

    fn supports_encoding(&self) -> bool {
        true
    }

    fn supports_playback(&self) -> bool {
        OutputStream::try_default().is_ok()
    }

    fn open(&self, kind: PrimitiveKind) -> Result<Box<dyn PlaybackPrimitive>, PlaybackError> {
        Ok(Box::new(SpeakerPrimitive {
            kind,
            volume: self.volume,
            active: Arc::clone(&self.active),
            play_tx: None,
        }))
    }

    fn wait_until_quiet(&self) {
        self.active.wait();
    }
}

struct SpeakerPrimitive {
    kind: PrimitiveKind,
    volume: f32,
    active: Arc<ActiveClips>,
    play_tx: Option<std_mpsc::Sender<PlayRequest>>,
}

#[async_trait]
impl PlaybackPrimitive for SpeakerPrimitive {
    fn load(&mut self, source: &TransportAudioUri) -> Result<MediaEvents, PlaybackError> {
        let bytes = transport::decode(source).map_err(|e| PlaybackError::Decode(e.to_string()))?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (play_tx, play_rx) = std_mpsc::channel();
        let kind = self.kind;
        let volume = self.volume;
        let guard = self.active.enter();

        thread::Builder::new()
            .name(format!("speaker-{kind:?}"))
            .spawn(move || {
                let _guard = guard;
                run_clip(kind, bytes, volume, events_tx, play_rx)
            })
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;

        self.play_tx = Some(play_tx);
        Ok(events_rx)
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        let tx = self
            .play_tx
            .as_ref()
            .ok_or_else(|| PlaybackError::PlayRejected("no source loaded".into()))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(reply_tx)
            .map_err(|_| PlaybackError::PlayRejected("clip worker exited".into()))?;
        reply_rx
            .await
            .unwrap_or_else(|_| Err(PlaybackError::PlayRejected("clip worker exited".into())))
    }
}

fn run_clip(
    kind: PrimitiveKind,
    bytes: Vec<u8>,
    volume: f32,
    events: mpsc::UnboundedSender<MediaEvent>,
    play_rx: std_mpsc::Receiver<PlayRequest>,
) {
    let decoder = match Decoder::new(Cursor::new(bytes)) {
        Ok(d) => d,
        Err(e) => {
            let _ = events.send(MediaEvent::Error(e.to_string()));
            return;
        }
    };

    let source: Box<dyn Source<Item = i16> + Send> = match kind {
        PrimitiveKind::MediaElement => {
            let _ = events.send(MediaEvent::LoadedData);
            Box::new(decoder)
        }
        PrimitiveKind::FreshContext => {
            let channels = decoder.channels();
            let sample_rate = decoder.sample_rate();
            let samples: Vec<i16> = decoder.collect();
            if samples.is_empty() {
                let _ = events.send(MediaEvent::Error("clip decoded to zero samples".into()));
                return;
            }
            debug!(samples = samples.len(), channels, sample_rate, "Clip fully buffered");
            let _ = events.send(MediaEvent::LoadedData);
            let _ = events.send(MediaEvent::CanPlayThrough);
            Box::new(SamplesBuffer::new(channels, sample_rate, samples))
        }
    };

    // The primitive was dropped before anyone asked to play.
    let Ok(reply) = play_rx.recv() else { return };

    let (_stream, handle) = match OutputStream::try_default() {
        Ok(s) => s,
        Err(e) => {
            let _ = reply.send(Err(PlaybackError::PlayRejected(e.to_string())));
            return;
        }
    };
    let sink = match Sink::try_new(&handle) {
        Ok(s) => s,
        Err(e) => {
            let _ = reply.send(Err(PlaybackError::PlayRejected(e.to_string())));
            return;
        }
    };

    sink.set_volume(volume);
    sink.append(source);
    if reply.send(Ok(())).is_err() {
        warn!("Play requester went away; finishing clip anyway");
    }
    let _ = events.send(MediaEvent::Playing);
    sink.sleep_until_end();
    let _ = events.send(MediaEvent::Ended);
}
