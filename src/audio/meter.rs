//! RMS energy measurement over the trailing capture window.

/// Root-mean-square energy of one window: square each sample, average, take
/// the square root. Pure function of the input; an empty window reads 0.0.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    energy.sqrt()
}

/// The most recent `window` samples, or `None` until one full window exists.
pub fn trailing_window(samples: &[f32], window: usize) -> Option<&[f32]> {
    if window == 0 || samples.len() < window {
        return None;
    }
    Some(&samples[samples.len() - window..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_empty_window_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn rms_of_silence_is_zero() {
        let window = vec![0.0f32; 1600];
        assert_eq!(rms(&window), 0.0);
    }

    #[test]
    fn rms_of_alternating_tenth_is_one_tenth() {
        let window: Vec<f32> = (0..1600)
            .map(|i| if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        assert!((rms(&window) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn rms_is_deterministic() {
        let window: Vec<f32> = (0..1600).map(|i| ((i as f32) * 0.01).sin()).collect();
        assert_eq!(rms(&window), rms(&window));
    }

    #[test]
    fn trailing_window_requires_full_window() {
        let samples = vec![0.5f32; 10];
        assert!(trailing_window(&samples, 11).is_none());
        assert!(trailing_window(&samples, 0).is_none());
        assert_eq!(trailing_window(&samples, 10).map(<[f32]>::len), Some(10));
    }

    #[test]
    fn trailing_window_returns_suffix() {
        let samples: Vec<f32> = (0..8).map(|i| i as f32).collect();
        assert_eq!(trailing_window(&samples, 3), Some(&[5.0f32, 6.0, 7.0][..]));
    }
}
