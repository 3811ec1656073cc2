//! Audio hosts: capability providers that vend playback primitives.

mod null;
mod scripted;
#[cfg(feature = "speaker")]
mod speaker;

pub use null::NullHost;
pub use scripted::{PlayReply, Script, ScriptedHost};
#[cfg(feature = "speaker")]
pub use speaker::SpeakerHost;
