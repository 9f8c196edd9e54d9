pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_WINDOW_MS: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
pub const DEFAULT_SILENCE_THRESHOLD: f32 = 0.015;
pub const DEFAULT_SILENCE_STOP_MS: u64 = 1_000;
pub const DEFAULT_GRACE_MS: u64 = 3_000;
pub const DEFAULT_MAX_CAPTURE_MS: u64 = 15_000;

/// Absolute ceiling on --max-capture-ms; the sample buffer preallocates
/// this much audio and is otherwise unbounded.
pub(super) const MAX_CAPTURE_HARD_LIMIT_MS: u64 = 60_000;

pub(super) const DEFAULT_MODEL_DIR: &str = ".dictate/models";
pub(super) const DEFAULT_MODEL_FILE: &str = "ggml-tiny.en-q5_0.bin";
