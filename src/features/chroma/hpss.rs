//! Harmonic-percussive source separation (HPSS)
//!
//! Median-filtering separation (Fitzgerald 2010). Sustained tones form
//! horizontal ridges in a spectrogram and survive a median filter along time;
//! drum hits and note attacks form vertical ridges and survive a median filter
//! along frequency. Soft masks built from the two filtered spectrograms split
//! the original magnitudes between the components.
//!
//! # Reference
//!
//! Fitzgerald, D. (2010). Harmonic/Percussive Separation using Median Filtering.
//! *Proceedings of the 13th International Conference on Digital Audio Effects (DAFx-10)*.

use crate::config::HpssConfig;
use crate::error::AnalysisError;

/// Values below this are treated as silence when building masks
const EPSILON: f32 = 1e-10;

/// Separated magnitude spectrograms (frame-major, same shape as the input)
#[derive(Debug, Clone)]
pub struct HpssResult {
    /// Tonal component
    pub harmonic: Vec<Vec<f32>>,

    /// Transient component
    pub percussive: Vec<Vec<f32>>,
}

/// Decompose a magnitude spectrogram into harmonic and percussive components
///
/// # Arguments
///
/// * `magnitude_spec` - Magnitude spectrogram, one spectrum per frame
/// * `config` - Kernel sizes, mask power and margin
///
/// # Returns
///
/// `HpssResult` with both components. Frames where both enhanced
/// spectrograms are silent are silent in both components.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frames have differing lengths or a
/// kernel size is zero
pub fn hpss_decompose(
    magnitude_spec: &[Vec<f32>],
    config: &HpssConfig,
) -> Result<HpssResult, AnalysisError> {
    let (mut harmonic, mut percussive) = enhance(magnitude_spec, config)?;

    // Masks are applied in place: the enhanced spectrograms become the outputs.
    for ((mag_frame, h_frame), p_frame) in magnitude_spec
        .iter()
        .zip(harmonic.iter_mut())
        .zip(percussive.iter_mut())
    {
        for ((&mag, h), p) in mag_frame.iter().zip(h_frame.iter_mut()).zip(p_frame.iter_mut()) {
            let mask_h = soft_mask(*h, *p * config.margin, config.mask_power);
            let mask_p = soft_mask(*p, *h * config.margin, config.mask_power);
            *h = mag * mask_h;
            *p = mag * mask_p;
        }
    }

    Ok(HpssResult {
        harmonic,
        percussive,
    })
}

/// Harmonic component only
///
/// Same as `hpss_decompose(..).harmonic`, but the percussive spectrogram is
/// released as soon as the harmonic mask is applied.
///
/// # Errors
///
/// Same as [`hpss_decompose`]
pub fn hpss_harmonic(
    magnitude_spec: &[Vec<f32>],
    config: &HpssConfig,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let (mut harmonic, percussive) = enhance(magnitude_spec, config)?;

    for ((mag_frame, h_frame), p_frame) in magnitude_spec
        .iter()
        .zip(harmonic.iter_mut())
        .zip(percussive.iter())
    {
        for ((&mag, h), &p) in mag_frame.iter().zip(h_frame.iter_mut()).zip(p_frame.iter()) {
            *h = mag * soft_mask(*h, p * config.margin, config.mask_power);
        }
    }

    Ok(harmonic)
}

/// Median-filtered (harmonic-enhanced, percussive-enhanced) spectrograms
fn enhance(
    magnitude_spec: &[Vec<f32>],
    config: &HpssConfig,
) -> Result<(Vec<Vec<f32>>, Vec<Vec<f32>>), AnalysisError> {
    log::debug!(
        "Decomposing spectrogram with HPSS: {} frames, kernels={}x{}, power={}, margin={}",
        magnitude_spec.len(),
        config.harmonic_kernel,
        config.percussive_kernel,
        config.mask_power,
        config.margin
    );

    if config.harmonic_kernel == 0 || config.percussive_kernel == 0 {
        return Err(AnalysisError::InvalidInput(
            "HPSS kernel sizes must be > 0".to_string(),
        ));
    }

    if magnitude_spec.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let n_frames = magnitude_spec.len();
    let n_bins = magnitude_spec[0].len();
    for (i, frame) in magnitude_spec.iter().enumerate() {
        if frame.len() != n_bins {
            return Err(AnalysisError::InvalidInput(format!(
                "Spectrogram frame {} has {} bins, expected {}",
                i,
                frame.len(),
                n_bins
            )));
        }
    }

    // Harmonic enhancement: median along time, one bin at a time.
    let mut harmonic_enhanced = vec![vec![0.0f32; n_bins]; n_frames];
    let mut column = vec![0.0f32; n_frames];
    let mut filtered = vec![0.0f32; n_frames];
    let mut scratch = Vec::with_capacity(config.harmonic_kernel);
    for bin in 0..n_bins {
        for (t, frame) in magnitude_spec.iter().enumerate() {
            column[t] = frame[bin];
        }
        median_filter(&column, config.harmonic_kernel, &mut filtered, &mut scratch);
        for (t, &v) in filtered.iter().enumerate() {
            harmonic_enhanced[t][bin] = v;
        }
    }

    // Percussive enhancement: median along frequency, one frame at a time.
    let mut percussive_enhanced = vec![vec![0.0f32; n_bins]; n_frames];
    let mut scratch = Vec::with_capacity(config.percussive_kernel);
    for (frame, out) in magnitude_spec.iter().zip(percussive_enhanced.iter_mut()) {
        median_filter(frame, config.percussive_kernel, out, &mut scratch);
    }

    Ok((harmonic_enhanced, percussive_enhanced))
}

/// Wiener-style soft mask `x^p / (x^p + r^p)`, 0 where both are silent
fn soft_mask(x: f32, reference: f32, power: f32) -> f32 {
    let z = x.max(reference);
    if z < EPSILON {
        return 0.0;
    }
    let xp = (x / z).powf(power);
    let rp = (reference / z).powf(power);
    xp / (xp + rp)
}

/// Sliding median with a centred window, truncated at the edges
///
/// For even-length windows (only possible at the edges) the upper median is used.
fn median_filter(input: &[f32], kernel: usize, output: &mut [f32], scratch: &mut Vec<f32>) {
    let half = kernel / 2;
    let n = input.len();
    for (i, out) in output.iter_mut().enumerate().take(n) {
        let start = i.saturating_sub(half);
        let end = (i + (kernel - half)).min(n);
        scratch.clear();
        scratch.extend_from_slice(&input[start..end]);
        let mid = scratch.len() / 2;
        let (_, median, _) = scratch.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        *out = *median;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_filter() {
        let input = [1.0, 100.0, 2.0, 3.0, 4.0];
        let mut output = [0.0; 5];
        let mut scratch = Vec::new();
        median_filter(&input, 3, &mut output, &mut scratch);
        // Spike at index 1 removed
        assert_eq!(output[1], 2.0);
        assert_eq!(output[2], 3.0);
        assert_eq!(output[3], 3.0);
    }

    #[test]
    fn test_soft_mask() {
        assert_eq!(soft_mask(0.0, 0.0, 2.0), 0.0);
        assert!((soft_mask(1.0, 1.0, 2.0) - 0.5).abs() < 1e-6);
        assert!(soft_mask(3.0, 1.0, 2.0) > 0.85);
        // Complementary when margin is 1
        let a = soft_mask(2.0, 0.5, 2.0);
        let b = soft_mask(0.5, 2.0, 2.0);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hpss_empty() {
        let result = hpss_decompose(&[], &HpssConfig::default()).unwrap();
        assert!(result.harmonic.is_empty());
        assert!(result.percussive.is_empty());
    }

    #[test]
    fn test_hpss_mismatched_frames() {
        let spec = vec![vec![0.0; 4], vec![0.0; 3]];
        assert!(hpss_decompose(&spec, &HpssConfig::default()).is_err());
    }

    #[test]
    fn test_hpss_separates_ridges() {
        // 40 frames x 64 bins: a sustained tone on bin 20 and a broadband click at frame 25
        let n_frames = 40;
        let n_bins = 64;
        let mut spec = vec![vec![0.0f32; n_bins]; n_frames];
        for frame in spec.iter_mut() {
            frame[20] = 1.0;
        }
        for bin in 0..n_bins {
            spec[25][bin] += 1.0;
        }

        let config = HpssConfig {
            harmonic_kernel: 9,
            percussive_kernel: 9,
            ..HpssConfig::default()
        };
        let result = hpss_decompose(&spec, &config).unwrap();

        // Tone kept in harmonic, away from the click
        assert!(result.harmonic[10][20] > 0.9);
        assert!(result.percussive[10][20] < 0.1);

        // Click moved to percussive, away from the tone
        assert!(result.percussive[25][50] > 0.9);
        assert!(result.harmonic[25][50] < 0.1);

        // Harmonic-only path matches the full decomposition
        let harmonic = hpss_harmonic(&spec, &config).unwrap();
        assert_eq!(harmonic, result.harmonic);
    }

    #[test]
    fn test_hpss_harmonic_errors_match() {
        assert!(hpss_harmonic(&[], &HpssConfig::default()).unwrap().is_empty());
        let spec = vec![vec![0.0; 4], vec![0.0; 3]];
        assert!(hpss_harmonic(&spec, &HpssConfig::default()).is_err());
    }
}
