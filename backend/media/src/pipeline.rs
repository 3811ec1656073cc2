//! One logical playback request, two strategies, one outcome.
//!
//! `Primary -> Fallback -> Terminal`. The fallback only runs after the
//! primary has failed, and its result is authoritative.

use std::sync::Arc;
use std::time::{Duration, Instant};

use readaloud_core::{AudioHost, PlaybackError, PlaybackOutcome, PlaybackStage, TransportAudioUri};
use readaloud_logging::{PlaybackEvent, PlaybackEventLogger};
use tracing::{debug, error};
use uuid::Uuid;

use crate::fallback::FallbackEngine;
use crate::playback::PlaybackEngine;

enum Stage {
    Primary,
    Fallback { primary: PlaybackError },
    Terminal(PlaybackOutcome),
}

pub struct PlaybackPipeline {
    primary: PlaybackEngine,
    fallback: FallbackEngine,
}

impl PlaybackPipeline {
    pub fn new(host: Arc<dyn AudioHost>) -> Self {
        Self {
            primary: PlaybackEngine::new(Arc::clone(&host)),
            fallback: FallbackEngine::new(host),
        }
    }

    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback = self.fallback.with_timeout(timeout);
        self
    }

    pub fn fallback_timeout(&self) -> Duration {
        self.fallback.timeout()
    }

    /// Run both strategies as needed and report the single outcome.
    pub async fn run(&self, uri: &TransportAudioUri) -> PlaybackOutcome {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut stage = Stage::Primary;

        loop {
            stage = match stage {
                Stage::Primary => {
                    PlaybackEventLogger::log_event(
                        request_id,
                        PlaybackEvent::SessionStarted {
                            stage: PlaybackStage::Primary.to_string(),
                            source_len: uri.len(),
                        },
                    );
                    match self.primary.play(uri).await {
                        Ok(()) => Stage::Terminal(PlaybackOutcome::Succeeded {
                            stage: PlaybackStage::Primary,
                        }),
                        Err(primary) => {
                            PlaybackEventLogger::log_event(
                                request_id,
                                PlaybackEvent::StageFailed {
                                    stage: PlaybackStage::Primary.to_string(),
                                    reason: primary.to_string(),
                                },
                            );
                            debug!(%request_id, "Switching to fallback playback");
                            Stage::Fallback { primary }
                        }
                    }
                }
                Stage::Fallback { primary } => match self.fallback.play(uri).await {
                    Ok(()) => Stage::Terminal(PlaybackOutcome::Succeeded {
                        stage: PlaybackStage::Fallback,
                    }),
                    Err(fallback) => {
                        PlaybackEventLogger::log_event(
                            request_id,
                            PlaybackEvent::StageFailed {
                                stage: PlaybackStage::Fallback.to_string(),
                                reason: fallback.to_string(),
                            },
                        );
                        error!(%request_id, %primary, %fallback, "Playback failed on both paths");
                        Stage::Terminal(PlaybackOutcome::Failed { primary, fallback })
                    }
                },
                Stage::Terminal(outcome) => {
                    let stage = match &outcome {
                        PlaybackOutcome::Succeeded { stage } => stage.to_string(),
                        PlaybackOutcome::Failed { .. } => "terminal".to_string(),
                    };
                    PlaybackEventLogger::log_event(
                        request_id,
                        PlaybackEvent::SessionFinished {
                            stage,
                            succeeded: outcome.is_success(),
                            elapsed_ms: started.elapsed().as_millis() as u64,
                        },
                    );
                    return outcome;
                }
            };
        }
    }
}
