//! Configuration parameters for chord analysis

use crate::error::AnalysisError;
use crate::features::chord::classifier::ClassificationStride;
use crate::preprocessing::channel_mixer::ChannelMixMode;

/// Default analysis bound in seconds
pub const DEFAULT_MAX_DURATION_SECONDS: f64 = 90.0;

/// Harmonic-percussive separation parameters
#[derive(Debug, Clone)]
pub struct HpssConfig {
    /// Median filter length along time, in frames (default: 31)
    pub harmonic_kernel: usize,

    /// Median filter length along frequency, in bins (default: 31)
    pub percussive_kernel: usize,

    /// Soft mask exponent (default: 2.0)
    pub mask_power: f32,

    /// Separation margin (default: 1.0)
    ///
    /// Values above 1.0 require the harmonic component to dominate the
    /// percussive one by that factor before it is kept.
    pub margin: f32,
}

impl Default for HpssConfig {
    fn default() -> Self {
        Self {
            harmonic_kernel: 31,
            percussive_kernel: 31,
            mask_power: 2.0,
            margin: 1.0,
        }
    }
}

/// Constant-Q chroma parameters
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    /// Lowest constant-Q bin centre in Hz (default: 65.406, C2)
    pub fmin: f32,

    /// Number of octaves covered (default: 6)
    pub n_octaves: usize,

    /// Constant-Q bins per octave, a multiple of 12 (default: 36)
    pub bins_per_octave: usize,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            fmin: 65.406,
            n_octaves: 6,
            bins_per_octave: 36,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Maximum amount of audio analysed, in seconds (default: 90.0)
    ///
    /// `f64::INFINITY` analyses the whole track. A bound of 0 always
    /// yields [`AnalysisError::EmptyAudio`].
    pub max_duration_seconds: f64,

    /// Down-mix strategy for multichannel sources (default: Average)
    pub channel_mix: ChannelMixMode,

    // STFT parameters
    /// Frame size for STFT (default: 4096)
    pub frame_size: usize,

    /// Hop size for STFT and chroma frames (default: 512)
    pub hop_size: usize,

    /// Harmonic-percussive separation
    pub hpss: HpssConfig,

    /// Chroma filterbank
    pub chroma: ChromaConfig,

    /// Which chroma frames are classified (default: every frame)
    pub stride: ClassificationStride,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
            channel_mix: ChannelMixMode::Average,
            frame_size: 4096,
            hop_size: 512,
            hpss: HpssConfig::default(),
            chroma: ChromaConfig::default(),
            stride: ClassificationStride::EveryFrame,
        }
    }
}

impl AnalysisConfig {
    /// Default configuration with a different duration bound
    pub fn with_max_duration(max_duration_seconds: f64) -> Self {
        Self {
            max_duration_seconds,
            ..Self::default()
        }
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.max_duration_seconds.is_nan() || self.max_duration_seconds < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "max_duration_seconds must be >= 0, got {}",
                self.max_duration_seconds
            )));
        }
        if self.frame_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "frame_size and hop_size must be > 0, got {} and {}",
                self.frame_size, self.hop_size
            )));
        }
        if self.hpss.harmonic_kernel == 0 || self.hpss.percussive_kernel == 0 {
            return Err(AnalysisError::InvalidInput(
                "HPSS kernel sizes must be > 0".to_string(),
            ));
        }
        if self.hpss.mask_power.is_nan()
            || self.hpss.mask_power <= 0.0
            || self.hpss.margin.is_nan()
            || self.hpss.margin < 1.0
        {
            return Err(AnalysisError::InvalidInput(format!(
                "HPSS mask_power must be > 0 and margin >= 1, got {} and {}",
                self.hpss.mask_power, self.hpss.margin
            )));
        }
        if self.chroma.bins_per_octave == 0 || self.chroma.bins_per_octave % 12 != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "bins_per_octave must be a positive multiple of 12, got {}",
                self.chroma.bins_per_octave
            )));
        }
        if self.chroma.n_octaves == 0 || self.chroma.fmin.is_nan() || self.chroma.fmin <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "chroma range must be non-empty, got fmin={} n_octaves={}",
                self.chroma.fmin, self.chroma.n_octaves
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hop_size, 512);
        assert_eq!(config.max_duration_seconds, 90.0);
    }

    #[test]
    fn test_zero_duration_is_valid() {
        // Zero is a legal bound; it fails later with EmptyAudio.
        assert!(AnalysisConfig::with_max_duration(0.0).validate().is_ok());
        assert!(AnalysisConfig::with_max_duration(f64::INFINITY).validate().is_ok());
    }

    #[test]
    fn test_rejects_nonsense() {
        assert!(AnalysisConfig::with_max_duration(-1.0).validate().is_err());
        assert!(AnalysisConfig::with_max_duration(f64::NAN).validate().is_err());

        let mut config = AnalysisConfig::default();
        config.hop_size = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.chroma.bins_per_octave = 30;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.hpss.margin = 0.5;
        assert!(config.validate().is_err());
    }
}
