//! Silence-gated capture state machine.
//!
//! The recorder's polling loop feeds this gate the current buffer length and
//! the RMS of the trailing window; the gate tracks whether speech has been
//! heard and how much trailing silence has accumulated, and decides when
//! recording should stop.

use super::meter::{rms, trailing_window};
use crate::status::StatusSink;

/// Runtime tuning for one capture session.
///
/// Everything the gate and the polling loop consume is a field here rather
/// than a compile-time constant, so tests can shorten the grace and cap
/// periods.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
    /// RMS evaluation window in milliseconds.
    pub window_ms: u64,
    /// Polling interval of the controlling loop in milliseconds.
    pub poll_interval_ms: u64,
    /// RMS level at or below which a window counts as silence.
    pub silence_threshold: f32,
    /// Accumulated trailing silence that ends the recording, in milliseconds.
    pub silence_stop_ms: u64,
    /// Initial span during which silence is never counted, in milliseconds.
    pub grace_ms: u64,
    /// Hard cap on capture duration in milliseconds.
    pub max_capture_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            window_ms: 100,
            poll_interval_ms: 10,
            silence_threshold: 0.015,
            silence_stop_ms: 1_000,
            grace_ms: 3_000,
            max_capture_ms: 15_000,
        }
    }
}

impl CaptureConfig {
    pub fn window_samples(&self) -> usize {
        ((u64::from(self.sample_rate) * self.window_ms) / 1000).max(1) as usize
    }

    pub fn grace_samples(&self) -> usize {
        ((u64::from(self.sample_rate) * self.grace_ms) / 1000) as usize
    }

    pub fn max_samples(&self) -> usize {
        ((u64::from(self.sample_rate) * self.max_capture_ms) / 1000).max(1) as usize
    }

    pub(super) fn poll_samples(&self) -> usize {
        ((u64::from(self.sample_rate) * self.poll_interval_ms) / 1000).max(1) as usize
    }
}

/// Why capture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Enough trailing silence accumulated after speech was heard.
    SilenceTail { tail_ms: u64 },
    /// The absolute duration cap was hit.
    MaxDuration,
    /// An external stop flag was raised.
    ManualStop,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            StopReason::SilenceTail { .. } => "silence_tail",
            StopReason::MaxDuration => "max_duration",
            StopReason::ManualStop => "manual_stop",
        }
    }
}

/// Where the gate currently is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GatePhase {
    /// Not enough samples for one full RMS window yet.
    WaitingForWindow,
    /// Windows are classified but silence is not counted yet.
    GracePeriod,
    /// The silence counter is live.
    Monitoring,
}

/// Per-session metrics, reported alongside the captured audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetrics {
    pub capture_ms: u64,
    pub speech_detected: bool,
    pub polls: usize,
    pub stop_reason: StopReason,
}

impl Default for CaptureMetrics {
    fn default() -> Self {
        Self {
            capture_ms: 0,
            speech_detected: false,
            polls: 0,
            stop_reason: StopReason::MaxDuration,
        }
    }
}

/// Caller-facing result: mono PCM plus metrics. `metrics.speech_detected` is
/// the success condition; a non-empty all-silence buffer is not a valid
/// utterance.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub samples: Vec<f32>,
    pub metrics: CaptureMetrics,
}

/// Voice-activity gate for one recording session.
///
/// Single-writer state owned by the polling loop; nothing here is shared
/// with the audio callback thread. `speech_detected` latches true on the
/// first speech window and never resets. During the grace period windows
/// are still classified (so speech can latch) but the silence counter is
/// frozen; once the grace span of samples has accumulated the counter runs,
/// adding one window's worth of milliseconds per silent evaluation and
/// resetting to zero on speech.
pub struct SilenceGate<'a> {
    cfg: &'a CaptureConfig,
    phase: GatePhase,
    speech_detected: bool,
    silent_ms: u64,
}

impl<'a> SilenceGate<'a> {
    pub fn new(cfg: &'a CaptureConfig) -> Self {
        Self {
            cfg,
            phase: GatePhase::WaitingForWindow,
            speech_detected: false,
            silent_ms: 0,
        }
    }

    /// Evaluate one poll tick.
    ///
    /// `total_samples` is the current buffer length; `window_rms` is the RMS
    /// of the trailing window, or `None` while fewer than one full window of
    /// samples exists. Returns a stop reason once capture should end.
    ///
    /// The window slides: consecutive ticks re-evaluate overlapping audio,
    /// so the silence counter is a sample-count budget (one `window_ms` per
    /// silent tick), not wall-clock time.
    pub fn on_poll(&mut self, total_samples: usize, window_rms: Option<f32>) -> Option<StopReason> {
        if total_samples >= self.cfg.max_samples() {
            return Some(StopReason::MaxDuration);
        }

        let Some(window_rms) = window_rms else {
            return None;
        };

        let speech = window_rms > self.cfg.silence_threshold;
        if speech {
            self.speech_detected = true;
        }

        if total_samples < self.cfg.grace_samples() {
            self.phase = GatePhase::GracePeriod;
            return None;
        }
        self.phase = GatePhase::Monitoring;

        // Silence only counts once speech has been heard; an untouched mic
        // runs to the cap and is reported as no-speech.
        if !self.speech_detected {
            return None;
        }

        if speech {
            self.silent_ms = 0;
        } else {
            self.silent_ms = self.silent_ms.saturating_add(self.cfg.window_ms);
        }

        if self.silent_ms >= self.cfg.silence_stop_ms {
            return Some(StopReason::SilenceTail {
                tail_ms: self.silent_ms,
            });
        }
        None
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn speech_detected(&self) -> bool {
        self.speech_detected
    }

    pub fn silent_ms(&self) -> u64 {
        self.silent_ms
    }
}

/// Replay scripted PCM through the gate at simulated poll ticks.
///
/// Each tick appends one poll interval's worth of samples, then evaluates
/// the gate exactly as the live loop does, emitting `AMP:` lines once a full
/// window exists and `DONE` at the end. Lets tests exercise the stop policy
/// without hardware. A script that runs out before any stop condition fires
/// reports `MaxDuration`.
pub fn offline_gate_from_pcm(
    samples: &[f32],
    cfg: &CaptureConfig,
    status: &mut dyn StatusSink,
) -> CaptureResult {
    let window = cfg.window_samples();
    let step = cfg.poll_samples();
    let mut gate = SilenceGate::new(cfg);
    let mut metrics = CaptureMetrics::default();
    let mut consumed = 0usize;

    loop {
        consumed = (consumed + step).min(samples.len());
        metrics.polls += 1;

        let buffered = &samples[..consumed];
        let window_rms = trailing_window(buffered, window).map(rms);
        if let Some(value) = window_rms {
            status.amp(value);
        }
        if let Some(reason) = gate.on_poll(consumed, window_rms) {
            metrics.stop_reason = reason;
            break;
        }
        if consumed == samples.len() {
            break;
        }
    }
    status.done();

    metrics.capture_ms = (consumed as u64 * 1000) / u64::from(cfg.sample_rate).max(1);
    metrics.speech_detected = gate.speech_detected();
    CaptureResult {
        samples: samples[..consumed].to_vec(),
        metrics,
    }
}
