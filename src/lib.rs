pub mod audio;
pub mod config;
pub mod cues;
pub mod paste;
pub mod status;
pub mod stt;
pub mod telemetry;
pub mod voice;

pub use voice::{run_dictation, DictationOutcome};
