//! Analysis run state machine
//!
//! A run moves linearly through
//! `Idle → Extracting → Classifying → Segmented → Done`. Any failure while
//! extracting moves it to `Failed` carrying the error kind. There is no retry or
//! resume: a run object is single-use and a failed analysis is restarted with a
//! fresh run.

use std::path::Path;
use std::time::Instant;

use super::metadata::AnalysisMetadata;
use super::result::{Chord, ChordAnalysis};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ErrorKind};
use crate::features::chord::{classify_frames, segment, ChordTemplates};
use crate::features::chroma::{extract_chroma, Chromagram};
use crate::io::decoder::decode_audio;
use crate::preprocessing::duration::max_samples;

/// Stage of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Created, not started
    Idle,
    /// Decoding audio and computing chroma
    Extracting,
    /// Matching chroma frames against templates
    Classifying,
    /// Timeline built
    Segmented,
    /// Result handed to the caller
    Done,
    /// Terminal failure
    Failed(ErrorKind),
}

/// A single analysis run
///
/// Holds no audio between calls; the template bank is borrowed read-only and
/// can be shared by any number of concurrent runs.
#[derive(Debug)]
pub struct AnalysisRun<'a> {
    config: AnalysisConfig,
    templates: &'a ChordTemplates,
    stage: PipelineStage,
}

impl AnalysisRun<'static> {
    /// New run using the process-wide template bank
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_templates(config, ChordTemplates::shared())
    }
}

impl<'a> AnalysisRun<'a> {
    /// New run using a caller-provided template bank
    pub fn with_templates(config: AnalysisConfig, templates: &'a ChordTemplates) -> Self {
        Self {
            config,
            templates,
            stage: PipelineStage::Idle,
        }
    }

    /// Current stage
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Analyse an audio file
    ///
    /// # Errors
    ///
    /// - `AnalysisError::DecodeError` if the file is unreadable or unsupported
    /// - `AnalysisError::EmptyAudio` if no samples remain to analyse
    /// - `AnalysisError::InvalidInput` if the config is invalid or the run was
    ///   already used
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<ChordAnalysis, AnalysisError> {
        self.start()?;
        let start_time = Instant::now();

        let config = &self.config;
        let extracted = config.validate().and_then(|_| {
            let audio = decode_audio(path, config.max_duration_seconds, config.channel_mix)?;
            if audio.samples.is_empty() {
                return Err(AnalysisError::EmptyAudio(
                    "Audio source decoded to zero samples".to_string(),
                ));
            }
            extract_with_duration(&audio.samples, audio.sample_rate, config)
        });

        self.finish(extracted, start_time)
    }

    /// Analyse mono samples already in memory
    ///
    /// # Errors
    ///
    /// - `AnalysisError::EmptyAudio` if no samples remain to analyse
    /// - `AnalysisError::InvalidInput` for a zero sample rate, an invalid
    ///   config, or a run that was already used
    pub fn run_samples(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<ChordAnalysis, AnalysisError> {
        self.start()?;
        let start_time = Instant::now();
        let extracted = extract_with_duration(samples, sample_rate, &self.config);
        self.finish(extracted, start_time)
    }

    fn start(&mut self) -> Result<(), AnalysisError> {
        if self.stage != PipelineStage::Idle {
            return Err(AnalysisError::InvalidInput(format!(
                "Analysis run already used (stage {:?}); start a new run",
                self.stage
            )));
        }
        self.stage = PipelineStage::Extracting;
        Ok(())
    }

    fn finish(
        &mut self,
        extracted: Result<(Chromagram, f32), AnalysisError>,
        start_time: Instant,
    ) -> Result<ChordAnalysis, AnalysisError> {
        let (chromagram, duration_seconds) = match extracted {
            Ok(v) => v,
            Err(e) => {
                log::debug!("Analysis failed during extraction: {}", e);
                self.stage = PipelineStage::Failed(e.kind());
                return Err(e);
            }
        };

        self.stage = PipelineStage::Classifying;
        let matches = classify_frames(&chromagram, self.templates, self.config.stride);
        let labels: Vec<(usize, Chord)> = matches
            .iter()
            .map(|(frame_index, m)| (*frame_index, m.chord))
            .collect();

        self.stage = PipelineStage::Segmented;
        let timeline = segment(&labels, chromagram.frame_rate());

        let metadata = AnalysisMetadata {
            duration_seconds,
            sample_rate: chromagram.sample_rate(),
            frame_count: chromagram.frame_count(),
            frame_rate: chromagram.frame_rate(),
            processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
            ..AnalysisMetadata::default()
        };

        log::debug!(
            "Analysis done: {} chord events over {:.2}s in {:.1}ms",
            timeline.len(),
            metadata.duration_seconds,
            metadata.processing_time_ms
        );

        self.stage = PipelineStage::Done;
        Ok(ChordAnalysis { timeline, metadata })
    }
}

/// Extract chroma and report how many seconds of audio it covers
fn extract_with_duration(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<(Chromagram, f32), AnalysisError> {
    let chromagram = extract_chroma(samples, sample_rate, config)?;
    let analysed = max_samples(sample_rate, config.max_duration_seconds)
        .map_or(samples.len(), |limit| limit.min(samples.len()));
    Ok((chromagram, analysed as f32 / sample_rate as f32))
}
