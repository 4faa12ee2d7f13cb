//! Integration tests for the chord recognition engine

use std::f32::consts::PI;
use std::path::PathBuf;

use stratum_chords::features::chroma::extract_chroma_from_file;
use stratum_chords::{
    analyze, analyze_samples, analyze_with_config, AnalysisConfig, AnalysisError, Timeline,
};

const SAMPLE_RATE: u32 = 22050;

// Equal-tempered frequencies (A4 = 440 Hz)
const A3: f32 = 220.00;
const C4: f32 = 261.63;
const E4: f32 = 329.63;
const G4: f32 = 392.00;

/// Sum of sines, one chord per `(frequencies, seconds)` section
fn synth_chords(sections: &[(&[f32], f32)]) -> Vec<f32> {
    let mut samples = Vec::new();
    for (freqs, seconds) in sections {
        let n = (SAMPLE_RATE as f32 * seconds) as usize;
        let offset = samples.len();
        for i in 0..n {
            let t = (offset + i) as f32 / SAMPLE_RATE as f32;
            let s: f32 = freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum();
            samples.push(0.3 * s / freqs.len() as f32);
        }
    }
    samples
}

/// Write samples to a temporary WAV file (16-bit PCM)
fn write_wav(name: &str, samples: &[f32], channels: u16) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "stratum_chords_{}_{}.wav",
        name,
        std::process::id()
    ));
    let spec = hound::WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
    for &s in samples {
        for _ in 0..channels {
            writer
                .write_sample((s * i16::MAX as f32) as i16)
                .expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize WAV");
    path
}

fn assert_well_formed(timeline: &Timeline) {
    for pair in timeline.events().windows(2) {
        assert_ne!(pair[0].chord, pair[1].chord, "consecutive duplicate labels");
        assert!(pair[0].onset_seconds <= pair[1].onset_seconds, "onsets out of order");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_c_major_triad() {
        let samples = synth_chords(&[(&[C4, E4, G4], 3.0)]);
        let path = write_wav("c_major", &samples, 1);

        let timeline = analyze(&path, 90.0).expect("Analysis should succeed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(timeline.to_pairs(), vec![(0, "C".to_string())]);
    }

    #[test]
    fn test_analyze_chord_change() {
        let samples = synth_chords(&[(&[C4, E4, G4], 2.0), (&[A3, C4, E4], 2.0)]);
        let path = write_wav("c_to_am", &samples, 1);

        let timeline = analyze(&path, 90.0).expect("Analysis should succeed");
        let _ = std::fs::remove_file(&path);

        assert_well_formed(&timeline);
        let events = timeline.events();
        assert!(events.len() >= 2, "expected a chord change, got {:?}", timeline);

        assert_eq!(events[0].onset_seconds, 0);
        assert_eq!(events[0].chord.name(), "C");

        let last = events[events.len() - 1];
        assert_eq!(last.chord.name(), "Am");
        assert!(
            (1..=2).contains(&last.onset_seconds),
            "A minor should start around 2s, got {}s",
            last.onset_seconds
        );

        println!(
            "C -> Am: {}",
            serde_json::to_string(&timeline).expect("timeline serializes")
        );
    }

    #[test]
    fn test_stereo_source_is_downmixed() {
        let samples = synth_chords(&[(&[A3, C4, E4], 2.0)]);
        let path = write_wav("stereo_am", &samples, 2);

        let analysis =
            analyze_with_config(&path, &AnalysisConfig::default()).expect("Analysis should succeed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(analysis.timeline.to_pairs(), vec![(0, "Am".to_string())]);
        assert_eq!(analysis.metadata.sample_rate, SAMPLE_RATE);
        assert!((analysis.metadata.duration_seconds - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let samples = synth_chords(&[(&[C4, E4, G4], 1.5), (&[A3, C4, E4], 1.5)]);
        let path = write_wav("deterministic", &samples, 1);

        let first = analyze(&path, 90.0).expect("first run");
        let second = analyze(&path, 90.0).expect("second run");
        let _ = std::fs::remove_file(&path);

        assert_eq!(first, second);
    }

    #[test]
    fn test_duration_bound_truncates_analysis() {
        let samples = synth_chords(&[(&[C4, E4, G4], 2.0), (&[A3, C4, E4], 2.0)]);
        let path = write_wav("bounded", &samples, 1);

        let config = AnalysisConfig::with_max_duration(1.0);
        let analysis = analyze_with_config(&path, &config).expect("Analysis should succeed");
        let _ = std::fs::remove_file(&path);

        // Only the C major part is inside the bound
        assert_eq!(analysis.timeline.to_pairs(), vec![(0, "C".to_string())]);
        assert_eq!(analysis.metadata.frame_count, 1 + SAMPLE_RATE as usize / 512);
        assert!((analysis.metadata.duration_seconds - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_duration_bound_is_empty_audio() {
        let samples = synth_chords(&[(&[C4, E4, G4], 1.0)]);
        let path = write_wav("zero_bound", &samples, 1);

        let first = analyze(&path, 0.0);
        let second = analyze(&path, 0.0);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(first, Err(AnalysisError::EmptyAudio(_))));
        assert!(matches!(second, Err(AnalysisError::EmptyAudio(_))));
    }

    #[test]
    fn test_zero_sample_file_is_empty_audio() {
        let path = write_wav("no_samples", &[], 1);
        let result = analyze(&path, 90.0);
        let _ = std::fs::remove_file(&path);

        assert!(
            matches!(result, Err(AnalysisError::EmptyAudio(_))),
            "expected EmptyAudio, got {:?}",
            result
        );
    }

    #[test]
    fn test_empty_samples_is_empty_audio() {
        let result = analyze_samples(&[], SAMPLE_RATE, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::EmptyAudio(_))));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let path = std::env::temp_dir().join(format!(
            "stratum_chords_corrupt_{}.mp3",
            std::process::id()
        ));
        std::fs::write(&path, vec![0x5Au8; 4096]).expect("write corrupt file");

        let result = analyze(&path, 90.0);
        let _ = std::fs::remove_file(&path);

        assert!(
            matches!(result, Err(AnalysisError::DecodeError(_))),
            "expected DecodeError, got {:?}",
            result
        );
    }

    #[test]
    fn test_valid_headers_with_corrupt_frames_is_decode_error() {
        // Well-formed MPEG frame headers followed by bodies no frame can decode
        let mut bytes = Vec::new();
        for _ in 0..200 {
            bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
            bytes.extend(std::iter::repeat(0xFFu8).take(413));
        }
        let path = std::env::temp_dir().join(format!(
            "stratum_chords_corrupt_frames_{}.mp3",
            std::process::id()
        ));
        std::fs::write(&path, &bytes).expect("write corrupt frames");

        let result = analyze(&path, 90.0);
        let _ = std::fs::remove_file(&path);

        assert!(
            matches!(result, Err(AnalysisError::DecodeError(_))),
            "expected DecodeError, got {:?}",
            result
        );
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let result = analyze("/nonexistent/stratum_chords/track.wav", 90.0);
        assert!(matches!(result, Err(AnalysisError::DecodeError(_))));
    }

    #[test]
    fn test_chroma_from_file_matches_frame_count() {
        let samples = synth_chords(&[(&[C4, E4, G4], 1.0)]);
        let path = write_wav("chroma_frames", &samples, 1);

        let chroma = extract_chroma_from_file(&path, &AnalysisConfig::default())
            .expect("Chroma extraction should succeed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(chroma.frame_count(), 1 + samples.len() / 512);
        assert_eq!(chroma.sample_rate(), SAMPLE_RATE);
        for frame in chroma.frames() {
            assert!(frame.iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_analyze_samples_matches_file_analysis() {
        let samples = synth_chords(&[(&[A3, C4, E4], 1.0)]);
        let analysis = analyze_samples(&samples, SAMPLE_RATE, &AnalysisConfig::default())
            .expect("Analysis should succeed");
        assert_eq!(analysis.timeline.to_pairs(), vec![(0, "Am".to_string())]);
    }
}
