use super::defaults::{DEFAULT_MODEL_DIR, DEFAULT_MODEL_FILE, MAX_CAPTURE_HARD_LIMIT_MS};
use super::AppConfig;
use crate::audio::CaptureConfig;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values, resolve the model path, and normalize it.
    pub fn validate(&mut self) -> Result<()> {
        if !(8_000..=48_000).contains(&self.sample_rate) {
            bail!(
                "--sample-rate must be between 8000 and 48000 Hz, got {}",
                self.sample_rate
            );
        }
        if !(10..=1_000).contains(&self.window_ms) {
            bail!("--window-ms must be between 10 and 1000, got {}", self.window_ms);
        }
        if !(1..=200).contains(&self.poll_interval_ms) {
            bail!(
                "--poll-interval-ms must be between 1 and 200, got {}",
                self.poll_interval_ms
            );
        }
        if !(self.silence_threshold > 0.0 && self.silence_threshold < 1.0) {
            bail!(
                "--silence-threshold must be between 0.0 and 1.0 exclusive, got {}",
                self.silence_threshold
            );
        }
        if self.max_capture_ms == 0 || self.max_capture_ms > MAX_CAPTURE_HARD_LIMIT_MS {
            bail!(
                "--max-capture-ms must be between 1 and {MAX_CAPTURE_HARD_LIMIT_MS} ms, got {}",
                self.max_capture_ms
            );
        }
        if self.silence_stop_ms < self.window_ms || self.silence_stop_ms > self.max_capture_ms {
            bail!(
                "--silence-stop-ms must be >= --window-ms ({}) and <= --max-capture-ms ({})",
                self.window_ms,
                self.max_capture_ms
            );
        }
        if self.grace_ms >= self.max_capture_ms {
            bail!(
                "--grace-ms ({}) must be smaller than --max-capture-ms ({})",
                self.grace_ms,
                self.max_capture_ms
            );
        }

        if self.lang.trim().is_empty() {
            bail!("--lang must not be empty");
        }
        if !self.lang.eq_ignore_ascii_case("auto") {
            if !self
                .lang
                .chars()
                .all(|ch| ch.is_ascii_alphabetic() || ch == '-' || ch == '_')
            {
                bail!("--lang must contain only alphabetic characters or '-'/'_' separators");
            }
            // Allow locale-style values but require a two-letter primary tag.
            let primary = self.lang.split(['-', '_']).next().unwrap_or("");
            if primary.len() != 2 {
                bail!(
                    "--lang must start with a two-letter ISO-639-1 code or be 'auto', got '{}'",
                    self.lang
                );
            }
        }

        if self.model_path.is_none() {
            self.model_path = default_model_path();
        }
        let Some(model) = &self.model_path else {
            bail!("no --model-path given and no home directory to derive a default from");
        };
        if !model.exists() {
            bail!("whisper model path '{}' does not exist", model.display());
        }
        // Store a canonical absolute path for the engine.
        let canonical = model.canonicalize().with_context(|| {
            format!("failed to canonicalize whisper model path '{}'", model.display())
        })?;
        self.model_path = Some(canonical);

        Ok(())
    }

    /// Snapshot the CLI-controlled capture tuning for the recorder and gate.
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            window_ms: self.window_ms,
            poll_interval_ms: self.poll_interval_ms,
            silence_threshold: self.silence_threshold,
            silence_stop_ms: self.silence_stop_ms,
            grace_ms: self.grace_ms,
            max_capture_ms: self.max_capture_ms,
        }
    }

    /// The validated model path as UTF-8, as whisper-rs expects.
    pub fn model_path_str(&self) -> Result<&str> {
        let path = self
            .model_path
            .as_deref()
            .ok_or_else(|| anyhow!("model path not resolved; call validate() first"))?;
        path.to_str()
            .ok_or_else(|| anyhow!("whisper model path must be valid UTF-8"))
    }
}

fn default_model_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_MODEL_DIR).join(DEFAULT_MODEL_FILE))
}
