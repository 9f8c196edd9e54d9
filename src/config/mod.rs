//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_GRACE_MS, DEFAULT_MAX_CAPTURE_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SAMPLE_RATE,
    DEFAULT_SILENCE_STOP_MS, DEFAULT_SILENCE_THRESHOLD, DEFAULT_WINDOW_MS,
};

/// CLI options for the dictate binary. Validated values feed the capture
/// session and the Whisper engine.
#[derive(Debug, Parser, Clone)]
#[command(about = "Dictate into the focused application", author, version)]
pub struct AppConfig {
    /// Whisper GGML model path (default: ~/.dictate/models/ggml-tiny.en-q5_0.bin)
    #[arg(long = "model-path", env = "DICTATE_MODEL")]
    pub model_path: Option<PathBuf>,

    /// Transcription language (ISO-639-1 code, or 'auto' to detect)
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Play audible cues at session start and end
    #[arg(long = "sounds", default_value_t = false)]
    pub sounds: bool,

    /// Enable trace logging to a temp file
    #[arg(long = "logs", env = "DICTATE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,

    /// Capture sample rate (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// RMS evaluation window (milliseconds)
    #[arg(long = "window-ms", default_value_t = DEFAULT_WINDOW_MS)]
    pub window_ms: u64,

    /// Polling interval of the capture loop (milliseconds)
    #[arg(long = "poll-interval-ms", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// RMS level at or below which a window counts as silence
    #[arg(long = "silence-threshold", default_value_t = DEFAULT_SILENCE_THRESHOLD)]
    pub silence_threshold: f32,

    /// Trailing silence required before stopping capture (milliseconds)
    #[arg(long = "silence-stop-ms", default_value_t = DEFAULT_SILENCE_STOP_MS)]
    pub silence_stop_ms: u64,

    /// Initial span during which silence never stops capture (milliseconds)
    #[arg(long = "grace-ms", default_value_t = DEFAULT_GRACE_MS)]
    pub grace_ms: u64,

    /// Hard cap on capture duration (milliseconds)
    #[arg(long = "max-capture-ms", default_value_t = DEFAULT_MAX_CAPTURE_MS)]
    pub max_capture_ms: u64,
}
