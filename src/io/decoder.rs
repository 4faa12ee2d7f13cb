//! Audio decoding using Symphonia
//!
//! Decodes any container/codec Symphonia is built with (WAV, FLAC, Ogg Vorbis,
//! MP3, AAC/MP4), down-mixes to mono and stops reading packets as soon as the
//! duration bound is reached.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::{downmix_interleaved, ChannelMixMode};
use crate::preprocessing::duration::{max_samples, truncate_to_duration};

/// Decoded, down-mixed audio
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Native sample rate in Hz (0 if the stream carried no audio)
    pub sample_rate: u32,

    /// Channel count of the source
    pub channels: usize,

    /// True if decoding stopped at the duration bound
    pub truncated: bool,
}

impl DecodedAudio {
    /// Duration of the decoded samples in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file to mono PCM samples
///
/// # Arguments
///
/// * `path` - Path to an already-materialised audio file
/// * `max_duration_seconds` - Decode at most this much audio
/// * `mix` - Down-mix strategy for multichannel sources
///
/// # Errors
///
/// Returns `AnalysisError::DecodeError` if the file cannot be opened, its
/// format is not recognised, it has no decodable audio track, or the stream
/// fails for a reason other than a corrupt packet.
pub fn decode_audio(
    path: impl AsRef<Path>,
    max_duration_seconds: f64,
    mix: ChannelMixMode,
) -> Result<DecodedAudio, AnalysisError> {
    let path = path.as_ref();
    log::debug!(
        "Decoding audio file: {} (bound {:.1}s)",
        path.display(),
        max_duration_seconds
    );

    let file = File::open(path).map_err(|e| {
        AnalysisError::DecodeError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| {
            AnalysisError::DecodeError(format!("Unsupported format in {}: {}", path.display(), e))
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AnalysisError::DecodeError(format!("No audio track in {}", path.display()))
        })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodeError(format!("Unsupported codec: {}", e)))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();
    let mut truncated = false;
    let mut skipped_packets = 0usize;

    loop {
        if sample_rate > 0 {
            if let Some(limit) = max_samples(sample_rate, max_duration_seconds) {
                if samples.len() >= limit {
                    truncated = true;
                    break;
                }
            }
        }

        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AnalysisError::DecodeError(format!(
                    "Failed reading packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                let mono = downmix_interleaved(buffer.samples(), channels, mix)?;
                samples.extend_from_slice(&mono);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupt packets are skipped rather than failing the file.
                skipped_packets += 1;
                log::warn!("Skipping undecodable packet: {}", msg);
            }
            Err(e) => {
                return Err(AnalysisError::DecodeError(format!(
                    "Decoder failure: {}",
                    e
                )))
            }
        }
    }

    if samples.is_empty() && skipped_packets > 0 {
        return Err(AnalysisError::DecodeError(format!(
            "All {} packets undecodable in {}",
            skipped_packets,
            path.display()
        )));
    }

    if sample_rate > 0 && truncate_to_duration(&mut samples, sample_rate, max_duration_seconds) > 0
    {
        truncated = true;
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {} channel(s) (truncated={}, skipped packets={})",
        samples.len(),
        sample_rate,
        channels,
        truncated,
        skipped_packets
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        truncated,
    })
}
