use super::gate::{offline_gate_from_pcm, CaptureConfig, GatePhase, SilenceGate, StopReason};
use super::meter::rms;
use super::recorder::decode_into;
use crate::status::MemoryStatus;

fn silence(cfg: &CaptureConfig, ms: u64) -> Vec<f32> {
    vec![0.0; (u64::from(cfg.sample_rate) * ms / 1000) as usize]
}

/// Alternating +0.1/-0.1, RMS 0.1, comfortably above the 0.015 threshold.
fn tone(cfg: &CaptureConfig, ms: u64) -> Vec<f32> {
    (0..(u64::from(cfg.sample_rate) * ms / 1000) as usize)
        .map(|i| if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect()
}

/// 2 s silence, 0.5 s speech, then silence to the end of the script.
fn speech_then_silence(cfg: &CaptureConfig) -> Vec<f32> {
    let mut pcm = silence(cfg, 2_000);
    pcm.extend(tone(cfg, 500));
    pcm.extend(silence(cfg, 1_200));
    pcm
}

#[test]
fn all_silence_runs_to_cap_and_fails() {
    let cfg = CaptureConfig::default();
    let pcm = silence(&cfg, cfg.max_capture_ms + 1_000);
    let mut status = MemoryStatus::default();

    let result = offline_gate_from_pcm(&pcm, &cfg, &mut status);

    assert_eq!(result.metrics.stop_reason, StopReason::MaxDuration);
    assert!(!result.metrics.speech_detected);
    assert_eq!(result.samples.len(), cfg.max_samples());
}

#[test]
fn speech_then_silence_stops_when_tail_reaches_budget() {
    let cfg = CaptureConfig::default();
    let pcm = speech_then_silence(&cfg);
    let mut status = MemoryStatus::default();

    let result = offline_gate_from_pcm(&pcm, &cfg, &mut status);

    assert!(result.metrics.speech_detected);
    assert_eq!(
        result.metrics.stop_reason,
        StopReason::SilenceTail { tail_ms: cfg.silence_stop_ms }
    );
    // Monitoring begins once the grace span of samples exists; from there
    // each silent tick adds one window to the tail, so the stop lands a
    // fixed number of poll steps past the grace boundary.
    let step = (u64::from(cfg.sample_rate) * cfg.poll_interval_ms / 1000) as usize;
    let silent_ticks = (cfg.silence_stop_ms / cfg.window_ms) as usize;
    let expected = cfg.grace_samples() + (silent_ticks - 1) * step;
    assert_eq!(result.samples.len(), expected);
}

#[test]
fn silence_inside_grace_period_never_stops_capture() {
    let cfg = CaptureConfig::default();
    let pcm = speech_then_silence(&cfg);
    let mut status = MemoryStatus::default();

    let result = offline_gate_from_pcm(&pcm, &cfg, &mut status);

    // Speech ends at 2.5 s; if the grace window were ignored the silence
    // budget would fill and stop capture before 3 s.
    assert!(result.samples.len() >= cfg.grace_samples());
}

#[test]
fn loud_forever_still_stops_exactly_at_cap() {
    let cfg = CaptureConfig::default();
    let pcm = tone(&cfg, cfg.max_capture_ms + 2_000);
    let mut status = MemoryStatus::default();

    let result = offline_gate_from_pcm(&pcm, &cfg, &mut status);

    assert_eq!(result.metrics.stop_reason, StopReason::MaxDuration);
    assert!(result.metrics.speech_detected);
    assert_eq!(result.samples.len(), cfg.max_samples());
}

#[test]
fn gate_waits_for_one_full_window() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);
    assert_eq!(gate.phase(), GatePhase::WaitingForWindow);

    assert_eq!(gate.on_poll(cfg.window_samples() / 2, None), None);
    assert_eq!(gate.phase(), GatePhase::WaitingForWindow);
    assert!(!gate.speech_detected());
}

#[test]
fn speech_latches_during_grace_and_silence_counter_stays_frozen() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);

    let in_grace = cfg.grace_samples() / 2;
    assert_eq!(gate.on_poll(in_grace, Some(0.1)), None);
    assert_eq!(gate.phase(), GatePhase::GracePeriod);
    assert!(gate.speech_detected());

    // A full second of silent ticks inside the grace span must not count.
    for _ in 0..(cfg.silence_stop_ms / cfg.window_ms) {
        assert_eq!(gate.on_poll(in_grace, Some(0.0)), None);
    }
    assert_eq!(gate.silent_ms(), 0);
}

#[test]
fn silence_never_stops_before_any_speech() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);

    let monitoring = cfg.grace_samples() + cfg.window_samples();
    for _ in 0..200 {
        assert_eq!(gate.on_poll(monitoring, Some(0.0)), None);
    }
    assert!(!gate.speech_detected());
    assert_eq!(gate.silent_ms(), 0);
}

#[test]
fn speech_resets_the_silence_tail() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);
    let monitoring = cfg.grace_samples() + cfg.window_samples();

    assert_eq!(gate.on_poll(monitoring, Some(0.1)), None);
    assert_eq!(gate.on_poll(monitoring, Some(0.0)), None);
    assert_eq!(gate.silent_ms(), cfg.window_ms);
    assert_eq!(gate.on_poll(monitoring, Some(0.1)), None);
    assert_eq!(gate.silent_ms(), 0);
}

#[test]
fn threshold_is_strict_so_exact_threshold_counts_as_silence() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);
    let monitoring = cfg.grace_samples() + cfg.window_samples();

    assert_eq!(gate.on_poll(monitoring, Some(0.1)), None);
    assert_eq!(gate.on_poll(monitoring, Some(cfg.silence_threshold)), None);
    assert_eq!(gate.silent_ms(), cfg.window_ms);
}

#[test]
fn cap_wins_even_while_loud() {
    let cfg = CaptureConfig::default();
    let mut gate = SilenceGate::new(&cfg);
    assert_eq!(
        gate.on_poll(cfg.max_samples(), Some(0.5)),
        Some(StopReason::MaxDuration)
    );
}

#[test]
fn stop_reason_labels_are_stable() {
    assert_eq!(StopReason::SilenceTail { tail_ms: 1_000 }.label(), "silence_tail");
    assert_eq!(StopReason::MaxDuration.label(), "max_duration");
    assert_eq!(StopReason::ManualStop.label(), "manual_stop");
}

#[test]
fn decoded_callback_chunks_concatenate_to_the_full_buffer() {
    let chunks: [&[i16]; 3] = [&[0, 16_384, -16_384], &[32_767], &[-32_768, 1]];
    let convert = |sample: i16| f32::from(sample) / 32_768.0;

    let mut buf = Vec::new();
    let mut expected = Vec::new();
    for chunk in chunks {
        decode_into(&mut buf, chunk, convert);
        expected.extend(chunk.iter().map(|&s| convert(s)));
    }

    assert_eq!(buf, expected);
    assert_eq!(buf.len(), chunks.iter().map(|c| c.len()).sum::<usize>());
    assert!((buf[1] - 0.5).abs() < 1e-6);
    assert_eq!(buf[4], -1.0);
}

#[test]
fn offline_replay_emits_amp_after_first_full_window_and_done_last() {
    let cfg = CaptureConfig::default();
    let pcm = silence(&cfg, 300);
    let mut status = MemoryStatus::default();

    let result = offline_gate_from_pcm(&pcm, &cfg, &mut status);

    let step = (u64::from(cfg.sample_rate) * cfg.poll_interval_ms / 1000) as usize;
    let total_ticks = pcm.len() / step;
    let warmup_ticks = cfg.window_samples() / step - 1;
    let amp_lines = status
        .lines
        .iter()
        .filter(|line| line.starts_with("AMP:"))
        .count();
    assert_eq!(amp_lines, total_ticks - warmup_ticks);
    assert_eq!(status.lines.last().map(String::as_str), Some("DONE"));
    for line in &status.lines[..status.lines.len() - 1] {
        let value: f32 = line
            .strip_prefix("AMP:")
            .expect("every capture line carries the AMP prefix")
            .parse()
            .expect("AMP payload parses as a float");
        assert_eq!(value, 0.0);
    }
    assert_eq!(result.samples.len(), pcm.len());
}

#[test]
fn offline_replay_reports_window_rms_of_the_trailing_audio() {
    let cfg = CaptureConfig::default();
    let mut pcm = silence(&cfg, 200);
    pcm.extend(tone(&cfg, 200));
    let mut status = MemoryStatus::default();

    offline_gate_from_pcm(&pcm, &cfg, &mut status);

    let last_amp = status
        .lines
        .iter()
        .rev()
        .find(|line| line.starts_with("AMP:"))
        .and_then(|line| line.strip_prefix("AMP:"))
        .and_then(|value| value.parse::<f32>().ok())
        .expect("at least one AMP line");
    let window: Vec<f32> = tone(&cfg, cfg.window_ms);
    assert!((last_amp - rms(&window)).abs() < 1e-4);
}
