//! Chroma-gram extraction
//!
//! Audio → bounded mono waveform → STFT → harmonic component (HPSS) →
//! constant-Q folding → one L∞-normalized 12-bin vector per hop.

use std::path::Path;

use super::constant_q::ConstantQFilterbank;
use super::hpss::hpss_harmonic;
use super::normalization::normalize_max;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::stft::magnitude_spectrogram;
use crate::io::decoder::decode_audio;
use crate::preprocessing::duration::max_samples;

/// 12-bin pitch-class energy for one analysis frame (index 0 = C)
pub type ChromaFrame = [f32; 12];

/// Chroma matrix, frame-major
///
/// Frame `i` is centred on sample `i * hop_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromagram {
    frames: Vec<ChromaFrame>,
    sample_rate: u32,
    hop_size: usize,
}

impl Chromagram {
    /// Wrap precomputed frames
    pub fn new(frames: Vec<ChromaFrame>, sample_rate: u32, hop_size: usize) -> Self {
        Self {
            frames,
            sample_rate,
            hop_size,
        }
    }

    /// Frames in time order
    pub fn frames(&self) -> &[ChromaFrame] {
        &self.frames
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// True if there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sample rate of the analysed audio
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Hop between frames in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Frames per second
    pub fn frame_rate(&self) -> f64 {
        if self.hop_size == 0 {
            return 0.0;
        }
        self.sample_rate as f64 / self.hop_size as f64
    }
}

/// Extract a chroma-gram from mono samples
///
/// Only the first `config.max_duration_seconds` of audio are analysed.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration (STFT, HPSS and chroma parameters)
///
/// # Returns
///
/// Chroma-gram with `1 + n / hop_size` frames, `n` being the bounded sample count
///
/// # Errors
///
/// - `AnalysisError::EmptyAudio` if no samples remain after bounding
/// - `AnalysisError::InvalidInput` for a zero sample rate or invalid config
///
/// # Example
///
/// ```no_run
/// use stratum_chords::features::chroma::extract_chroma;
/// use stratum_chords::AnalysisConfig;
///
/// let samples = vec![0.0f32; 44100 * 5];
/// let chroma = extract_chroma(&samples, 44100, &AnalysisConfig::default())?;
/// println!("{} frames at {:.1} fps", chroma.frame_count(), chroma.frame_rate());
/// # Ok::<(), stratum_chords::AnalysisError>(())
/// ```
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<Chromagram, AnalysisError> {
    config.validate()?;

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    let bounded = match max_samples(sample_rate, config.max_duration_seconds) {
        Some(limit) if limit < samples.len() => &samples[..limit],
        _ => samples,
    };

    if bounded.is_empty() {
        return Err(AnalysisError::EmptyAudio(format!(
            "No samples to analyse ({} decoded, bound {:.1}s)",
            samples.len(),
            config.max_duration_seconds
        )));
    }

    log::debug!(
        "Extracting chroma: {} samples at {} Hz",
        bounded.len(),
        sample_rate
    );

    let spectrogram =
        magnitude_spectrogram(bounded, sample_rate, config.frame_size, config.hop_size)?;
    let harmonic = hpss_harmonic(&spectrogram.frames, &config.hpss)?;
    drop(spectrogram);
    let filterbank = ConstantQFilterbank::new(sample_rate, config.frame_size, &config.chroma)?;

    let frames: Vec<ChromaFrame> = harmonic
        .iter()
        .map(|spectrum| {
            let mut chroma = filterbank.chroma(spectrum);
            normalize_max(&mut chroma);
            chroma
        })
        .collect();

    log::debug!("Extracted {} chroma frames", frames.len());

    Ok(Chromagram::new(frames, sample_rate, config.hop_size))
}

/// Decode an audio file and extract its chroma-gram
///
/// # Errors
///
/// - `AnalysisError::DecodeError` if the file is unreadable or unsupported
/// - `AnalysisError::EmptyAudio` if it decodes to zero samples
pub fn extract_chroma_from_file(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<Chromagram, AnalysisError> {
    config.validate()?;
    let audio = decode_audio(path, config.max_duration_seconds, config.channel_mix)?;
    if audio.samples.is_empty() {
        return Err(AnalysisError::EmptyAudio(
            "Audio source decoded to zero samples".to_string(),
        ));
    }
    extract_chroma(&audio.samples, audio.sample_rate, config)
}
