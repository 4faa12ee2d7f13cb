//! # Stratum Chords
//!
//! Chord recognition for audio tracks: turns a decoded audio file into a
//! timeline of major/minor chord labels with whole-second onsets.
//!
//! ## Features
//!
//! - **Decoding**: WAV, FLAC, Ogg Vorbis, MP3 and AAC via Symphonia, down-mixed to mono
//! - **Harmonic/percussive separation**: median-filter HPSS suppresses drums and attacks
//! - **Constant-Q chroma**: 12-bin pitch-class energy per 512-sample hop
//! - **Template matching**: 24 binary triad templates, deterministic tie-breaking
//! - **Segmentation**: run-length compression into an ordered timeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_chords::analyze;
//!
//! let timeline = analyze("song.mp3", 90.0)?;
//! for event in &timeline {
//!     println!("{:>4}s  {}", event.onset_seconds, event.chord);
//! }
//! # Ok::<(), stratum_chords::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio file → Decode + bound → STFT → HPSS → Constant-Q chroma → Classify → Segment → Timeline
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

use std::path::Path;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::pipeline::{AnalysisRun, PipelineStage};
pub use analysis::result::{
    Chord, ChordAnalysis, ChordEvent, ChordQuality, InvalidTimelineError, ParseChordError,
    PitchClass, Timeline,
};
pub use config::{AnalysisConfig, DEFAULT_MAX_DURATION_SECONDS};
pub use error::{AnalysisError, ErrorKind};

/// Main analysis function
///
/// Decodes at most `max_duration_seconds` of the file, extracts chroma from
/// its harmonic component and returns the chord timeline.
///
/// # Arguments
///
/// * `path` - Path to an already-downloaded audio file
/// * `max_duration_seconds` - Analysis bound (use [`DEFAULT_MAX_DURATION_SECONDS`] for 90 s)
///
/// # Errors
///
/// - `AnalysisError::DecodeError` if the file is unreadable or unsupported
/// - `AnalysisError::EmptyAudio` if no samples remain (including a bound of 0)
/// - `AnalysisError::InvalidInput` for a negative or NaN bound
///
/// # Example
///
/// ```no_run
/// use stratum_chords::{analyze, DEFAULT_MAX_DURATION_SECONDS};
///
/// let timeline = analyze("song.wav", DEFAULT_MAX_DURATION_SECONDS)?;
/// println!("{}", serde_json::to_string(&timeline).unwrap());
/// # Ok::<(), stratum_chords::AnalysisError>(())
/// ```
pub fn analyze(path: impl AsRef<Path>, max_duration_seconds: f64) -> Result<Timeline, AnalysisError> {
    let config = AnalysisConfig::with_max_duration(max_duration_seconds);
    analyze_with_config(path, &config).map(|analysis| analysis.timeline)
}

/// Analyse an audio file with full configuration
///
/// Returns the timeline together with analysis metadata.
///
/// # Errors
///
/// Same as [`analyze`], plus `AnalysisError::InvalidInput` for an invalid config.
pub fn analyze_with_config(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<ChordAnalysis, AnalysisError> {
    AnalysisRun::new(config.clone()).run_file(path)
}

/// Analyse mono samples already in memory
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration
///
/// # Errors
///
/// - `AnalysisError::EmptyAudio` if no samples remain to analyse
/// - `AnalysisError::InvalidInput` for a zero sample rate or invalid config
///
/// # Example
///
/// ```no_run
/// use stratum_chords::{analyze_samples, AnalysisConfig};
///
/// let samples = vec![0.0f32; 44100 * 30];
/// let analysis = analyze_samples(&samples, 44100, &AnalysisConfig::default())?;
/// println!("{} events", analysis.timeline.len());
/// # Ok::<(), stratum_chords::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<ChordAnalysis, AnalysisError> {
    log::debug!(
        "Starting chord analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );
    AnalysisRun::new(config.clone()).run_samples(samples, sample_rate)
}
