//! System microphone capture via CPAL.
//!
//! Owns the live input stream for the duration of one recording. The cpal
//! callback appends decoded samples into a shared buffer while an atomic
//! `recording` flag is set; the controlling thread runs the polling loop
//! that consults the silence gate and tears the stream down on every exit
//! path.

use super::gate::{CaptureConfig, CaptureMetrics, CaptureResult, SilenceGate, StopReason};
use super::meter::{rms, trailing_window};
use crate::status::StatusSink;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Audio input device wrapper.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when a machine exposes several inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    /// Get the name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Record one utterance, gated by silence detection.
    ///
    /// Opens the stream at `cfg.sample_rate` Hz mono, then polls every
    /// `cfg.poll_interval_ms`: reads the buffer length, emits an `AMP:` line
    /// once a full window exists, and stops when the gate says so, when the
    /// duration cap is hit, or when `stop_flag` is raised. The stream is
    /// paused and dropped before returning, on success and failure alike.
    ///
    /// Stream-open failure is an error; a capture in which no speech was
    /// ever heard is `Ok` with `metrics.speech_detected == false` so the
    /// caller can tell "nothing heard" apart from "device error".
    pub fn record(
        &self,
        cfg: &CaptureConfig,
        status: &mut dyn StatusSink,
        stop_flag: Option<Arc<AtomicBool>>,
    ) -> Result<CaptureResult> {
        let format = self
            .device
            .default_input_config()
            .context("failed to query input device configuration")?
            .sample_format();
        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(cfg.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let device_name = self.device_name();

        // The callback thread appends; the polling loop only reads the
        // length and the trailing window. The flag is the one value shared
        // in both directions, so it is atomic rather than locked.
        let buffer = Arc::new(Mutex::new(Vec::<f32>::with_capacity(cfg.max_samples())));
        let recording = Arc::new(AtomicBool::new(true));

        let err_fn = |err| tracing::warn!("audio stream error: {err}");
        let stream = match format {
            SampleFormat::F32 => {
                let buffer = buffer.clone();
                let recording = recording.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _| {
                        if recording.load(Ordering::Relaxed) {
                            if let Ok(mut buf) = buffer.lock() {
                                decode_into(&mut buf, data, |sample| sample);
                            }
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::I16 => {
                let buffer = buffer.clone();
                let recording = recording.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _| {
                        if recording.load(Ordering::Relaxed) {
                            if let Ok(mut buf) = buffer.lock() {
                                decode_into(&mut buf, data, |sample| {
                                    f32::from(sample) / 32_768.0
                                });
                            }
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::U16 => {
                let buffer = buffer.clone();
                let recording = recording.clone();
                self.device.build_input_stream(
                    &stream_config,
                    move |data: &[u16], _| {
                        if recording.load(Ordering::Relaxed) {
                            if let Ok(mut buf) = buffer.lock() {
                                decode_into(&mut buf, data, |sample| {
                                    (f32::from(sample) - 32_768.0) / 32_768.0
                                });
                            }
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        }
        .with_context(|| format!("failed to open input stream on '{device_name}'"))?;

        stream.play().context("failed to start input stream")?;

        let mut gate = SilenceGate::new(cfg);
        let window = cfg.window_samples();
        let interval = Duration::from_millis(cfg.poll_interval_ms);
        let mut polls = 0usize;
        let stop_reason = loop {
            thread::sleep(interval);
            polls += 1;

            if let Some(ref flag) = stop_flag {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::ManualStop;
                }
            }

            // Keep the critical section to a length read plus the window
            // RMS so the callback never waits long.
            let (total, window_rms) = {
                let buf = buffer
                    .lock()
                    .map_err(|_| anyhow!("sample buffer lock poisoned"))?;
                (buf.len(), trailing_window(&buf, window).map(rms))
            };

            if let Some(value) = window_rms {
                status.amp(value);
            }
            if let Some(reason) = gate.on_poll(total, window_rms) {
                break reason;
            }
        };

        recording.store(false, Ordering::Relaxed);
        if let Err(err) = stream.pause() {
            tracing::debug!("failed to pause input stream: {err}");
        }
        drop(stream);
        status.done();

        let samples = match Arc::try_unwrap(buffer) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared
                .lock()
                .map_err(|_| anyhow!("sample buffer lock poisoned"))?
                .clone(),
        };

        if samples.is_empty() && stop_reason != StopReason::ManualStop {
            return Err(anyhow!(
                "no samples captured from '{device_name}'; check microphone permissions and availability. {}",
                mic_permission_hint()
            ));
        }

        let metrics = CaptureMetrics {
            capture_ms: (samples.len() as u64 * 1000) / u64::from(cfg.sample_rate).max(1),
            speech_detected: gate.speech_detected(),
            polls,
            stop_reason,
        };
        Ok(CaptureResult { samples, metrics })
    }
}

/// Decode a just-filled driver buffer into the sample buffer, in order.
/// The canonical contract is the 16-bit path: each value divided by 32768.0.
pub(super) fn decode_into<T, F>(buf: &mut Vec<f32>, data: &[T], mut convert: F)
where
    T: Copy,
    F: FnMut(T) -> f32,
{
    buf.extend(data.iter().copied().map(&mut convert));
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
