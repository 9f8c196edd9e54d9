//! One dictation pass: record until silence, transcribe, sanitize, paste.

use crate::audio::{CaptureMetrics, Recorder};
use crate::config::AppConfig;
use crate::cues;
use crate::paste;
use crate::status::StatusSink;
use crate::stt::Transcriber;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Instant;

/// What a dictation pass produced.
///
/// `NoSpeech` is an orderly outcome, distinct from hardware or engine
/// errors, so callers can say "nothing heard" instead of "device error".
#[derive(Debug, Clone, PartialEq)]
pub enum DictationOutcome {
    Pasted {
        text: String,
        metrics: CaptureMetrics,
    },
    NoSpeech {
        metrics: CaptureMetrics,
    },
}

/// Load the engine, capture one utterance, and paste the transcript.
///
/// The engine loads before the microphone opens so a missing model fails
/// fast without touching the audio device.
pub fn run_dictation(config: &AppConfig, status: &mut dyn StatusSink) -> Result<DictationOutcome> {
    let transcriber = Transcriber::new(config.model_path_str()?)?;
    let recorder = Recorder::new(config.input_device.as_deref())?;
    tracing::debug!(device = %recorder.device_name(), "starting capture");

    cues::session_start(config.sounds);
    let record_start = Instant::now();
    let capture = recorder.record(&config.capture_config(), status, None)?;
    cues::session_end(config.sounds);
    let record_elapsed = record_start.elapsed().as_secs_f64();

    let metrics = capture.metrics.clone();
    tracing::debug!(
        capture_ms = metrics.capture_ms,
        speech = metrics.speech_detected,
        polls = metrics.polls,
        stop = metrics.stop_reason.label(),
        "capture finished"
    );

    // Success requires heard speech, not merely a non-empty buffer.
    if !metrics.speech_detected {
        return Ok(DictationOutcome::NoSpeech { metrics });
    }

    let stt_start = Instant::now();
    let transcript = transcriber.transcribe(&capture.samples, config)?;
    let stt_elapsed = stt_start.elapsed().as_secs_f64();
    if config.log_timings {
        tracing::debug!(
            record_s = record_elapsed,
            stt_s = stt_elapsed,
            chars = transcript.len(),
            "voice timing"
        );
    }

    let cleaned = sanitize_transcript(&transcript);
    if cleaned.is_empty() {
        return Ok(DictationOutcome::NoSpeech { metrics });
    }

    paste::inject_text(&cleaned)?;
    Ok(DictationOutcome::Pasted {
        text: cleaned,
        metrics,
    })
}

/// Strip Whisper's non-speech markers and collapse whitespace.
pub fn sanitize_transcript(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    static NON_SPEECH_RE: OnceLock<Regex> = OnceLock::new();
    let re = NON_SPEECH_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\[\s*\]|\(\s*\)|\[(?:\s*(?:silence|noise|inaudible|blank_audio|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background)\s*)\]|\((?:\s*(?:silence|noise|inaudible|blank audio|music|laughter|applause|cough|breath(?:ing)?|wind|background|wind blowing)\s*)\)",
        )
        .expect("non-speech regex should compile")
    });
    let without_markers = re.replace_all(trimmed, " ");
    without_markers
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
