//! Microphone capture gated by silence detection.
//!
//! One recording session owns a cpal input stream at 16 kHz mono. The
//! callback thread appends decoded samples to a shared buffer; the
//! controlling thread polls every 10 ms, measures the trailing-window RMS,
//! and asks the silence gate whether to keep going.

mod gate;
mod meter;
mod recorder;
#[cfg(test)]
mod tests;

pub use gate::{
    offline_gate_from_pcm, CaptureConfig, CaptureMetrics, CaptureResult, GatePhase, SilenceGate,
    StopReason,
};
pub use meter::{rms, trailing_window};
pub use recorder::Recorder;
