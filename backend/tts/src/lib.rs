pub mod engine;
pub mod mock;

pub use engine::{
    create_synthesizer, validate_audio_response, HuggingFaceTts, OpenAiTts, SpeechSynthesizer,
    SynthesizerKind,
};
pub use mock::{silent_wav, MockSynthesizer};
