//! Constant-Q filterbank over STFT magnitudes
//!
//! Each constant-Q bin `k` is centred on `fmin * 2^(k / B)` and spans
//! `± f_k / Q` with `Q = 1 / (2^(1/B) - 1)`. At low frequencies that span is
//! narrower than one STFT bin, so it is widened to the STFT resolution there.
//! The weights of each bin are a Hann taper across its span, normalised to sum
//! to one, so every constant-Q bin is a weighted average of spectral magnitude.
//!
//! Bins are folded onto the 12 pitch classes; with `B = 36` each semitone owns
//! three bins (one centred on it, one a third of a semitone either side).

use crate::config::ChromaConfig;
use crate::error::AnalysisError;

/// A single constant-Q bin as a sparse row of STFT weights
#[derive(Debug, Clone)]
struct CqBin {
    /// Pitch class this bin folds onto
    pitch_class: usize,
    /// First STFT bin with a nonzero weight
    start: usize,
    /// Weights for STFT bins `start..start + weights.len()`
    weights: Vec<f32>,
}

/// Sparse constant-Q filterbank, built once per (sample rate, frame size)
#[derive(Debug, Clone)]
pub struct ConstantQFilterbank {
    bins: Vec<CqBin>,
    n_fft_bins: usize,
}

impl ConstantQFilterbank {
    /// Build the filterbank
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `frame_size` - STFT frame size the spectra come from
    /// * `config` - Lowest frequency, octave count, bins per octave
    ///
    /// Bins whose span reaches Nyquist are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero sample rate or frame
    /// size, or a bins-per-octave that is not a positive multiple of 12
    pub fn new(
        sample_rate: u32,
        frame_size: usize,
        config: &ChromaConfig,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || frame_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Filterbank needs sample_rate > 0 and frame_size > 0, got {} and {}",
                sample_rate, frame_size
            )));
        }
        let bpo = config.bins_per_octave;
        if bpo == 0 || bpo % 12 != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "bins_per_octave must be a positive multiple of 12, got {}",
                bpo
            )));
        }

        let n_fft_bins = frame_size / 2 + 1;
        let bin_hz = sample_rate as f32 / frame_size as f32;
        let nyquist = sample_rate as f32 / 2.0;
        let q = 1.0 / (2f32.powf(1.0 / bpo as f32) - 1.0);
        let bins_per_semitone = bpo / 12;
        let base_pitch_class = pitch_class_of(config.fmin);

        let mut bins = Vec::with_capacity(bpo * config.n_octaves);
        for k in 0..bpo * config.n_octaves {
            let centre = config.fmin * 2f32.powf(k as f32 / bpo as f32);
            let half_width = (centre / q).max(bin_hz);
            if centre + half_width >= nyquist {
                break;
            }

            let lo = ((centre - half_width) / bin_hz).floor().max(0.0) as usize;
            let hi = (((centre + half_width) / bin_hz).ceil() as usize).min(n_fft_bins - 1);

            let mut weights: Vec<f32> = (lo..=hi)
                .map(|j| {
                    let distance = (j as f32 * bin_hz - centre).abs();
                    if distance >= half_width {
                        0.0
                    } else {
                        0.5 * (1.0 + (std::f32::consts::PI * distance / half_width).cos())
                    }
                })
                .collect();

            let total: f32 = weights.iter().sum();
            if total <= 0.0 {
                continue;
            }
            for w in &mut weights {
                *w /= total;
            }

            let semitone = (k + bins_per_semitone / 2) / bins_per_semitone;
            bins.push(CqBin {
                pitch_class: (base_pitch_class + semitone) % 12,
                start: lo,
                weights,
            });
        }

        log::debug!(
            "Built constant-Q filterbank: {} bins from {:.2} Hz, Q={:.1}, {} Hz/STFT bin",
            bins.len(),
            config.fmin,
            q,
            bin_hz
        );

        Ok(Self { bins, n_fft_bins })
    }

    /// Number of constant-Q bins kept
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True if no bin fits below Nyquist
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Fold one magnitude spectrum onto the 12 pitch classes (unnormalised)
    ///
    /// Spectra shorter than the filterbank expects are treated as zero above
    /// their last bin.
    pub fn chroma(&self, spectrum: &[f32]) -> [f32; 12] {
        debug_assert!(spectrum.len() <= self.n_fft_bins);
        let mut chroma = [0.0f32; 12];
        for bin in &self.bins {
            let end = (bin.start + bin.weights.len()).min(spectrum.len());
            if bin.start >= end {
                continue;
            }
            let energy: f32 = spectrum[bin.start..end]
                .iter()
                .zip(bin.weights.iter())
                .map(|(m, w)| m * w)
                .sum();
            chroma[bin.pitch_class] += energy;
        }
        chroma
    }
}

/// Nearest pitch class of a frequency (A4 = 440 Hz)
pub fn pitch_class_of(freq_hz: f32) -> usize {
    let midi = 69.0 + 12.0 * (freq_hz / 440.0).log2();
    (midi.round() as i64).rem_euclid(12) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_of() {
        assert_eq!(pitch_class_of(440.0), 9); // A
        assert_eq!(pitch_class_of(261.63), 0); // C
        assert_eq!(pitch_class_of(65.406), 0); // C2
        assert_eq!(pitch_class_of(392.0), 7); // G
    }

    #[test]
    fn test_rejects_bad_resolution() {
        let config = ChromaConfig {
            bins_per_octave: 24 + 1,
            ..ChromaConfig::default()
        };
        assert!(ConstantQFilterbank::new(44100, 4096, &config).is_err());
        assert!(ConstantQFilterbank::new(0, 4096, &ChromaConfig::default()).is_err());
    }

    #[test]
    fn test_bins_below_nyquist() {
        // 6 octaves from C2 tops out near 4 kHz, well below 11 kHz Nyquist
        let fb = ConstantQFilterbank::new(22050, 4096, &ChromaConfig::default()).unwrap();
        assert_eq!(fb.len(), 36 * 6);

        // At 8 kHz the top octave no longer fits
        let fb = ConstantQFilterbank::new(8000, 4096, &ChromaConfig::default()).unwrap();
        assert!(fb.len() < 36 * 6);
        assert!(!fb.is_empty());
    }

    #[test]
    fn test_single_peak_folds_to_its_pitch_class() {
        let sample_rate = 22050;
        let frame_size = 4096;
        let fb = ConstantQFilterbank::new(sample_rate, frame_size, &ChromaConfig::default())
            .unwrap();

        // Energy only in the STFT bin nearest 440 Hz
        let bin_hz = sample_rate as f32 / frame_size as f32;
        let mut spectrum = vec![0.0f32; frame_size / 2 + 1];
        spectrum[(440.0 / bin_hz).round() as usize] = 1.0;

        let chroma = fb.chroma(&spectrum);
        let best = chroma
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(best, 9);
    }

    #[test]
    fn test_silent_spectrum() {
        let fb = ConstantQFilterbank::new(44100, 4096, &ChromaConfig::default()).unwrap();
        assert_eq!(fb.chroma(&vec![0.0; 2049]), [0.0; 12]);
    }
}
