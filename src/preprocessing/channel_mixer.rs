//! Channel mixing utilities (multichannel to mono conversion)

use crate::error::AnalysisError;

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMixMode {
    /// Simple average of all channels: (L + R + ...) / N
    Average,
    /// Keep the sample with the largest magnitude in each frame
    Dominant,
}

/// Down-mix interleaved samples to mono
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples, one per complete frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(
    interleaved: &[f32],
    channels: usize,
    mode: ChannelMixMode,
) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let mono = interleaved
        .chunks_exact(channels)
        .map(|frame| match mode {
            ChannelMixMode::Average => frame.iter().sum::<f32>() / channels as f32,
            ChannelMixMode::Dominant => frame
                .iter()
                .copied()
                .fold(0.0f32, |best, s| if s.abs() > best.abs() { s } else { best }),
        })
        .collect();

    Ok(mono)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        let mono = downmix_interleaved(&samples, 1, ChannelMixMode::Average).unwrap();
        assert_eq!(mono, samples);
    }

    #[test]
    fn test_stereo_average() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix_interleaved(&samples, 2, ChannelMixMode::Average).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_stereo_dominant() {
        let samples = vec![0.2, -0.8, 0.5, 0.1];
        let mono = downmix_interleaved(&samples, 2, ChannelMixMode::Dominant).unwrap();
        assert_eq!(mono, vec![-0.8, 0.5]);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let samples = vec![1.0, 1.0, 1.0];
        let mono = downmix_interleaved(&samples, 2, ChannelMixMode::Average).unwrap();
        assert_eq!(mono.len(), 1);
    }

    #[test]
    fn test_zero_channels() {
        assert!(downmix_interleaved(&[0.0], 0, ChannelMixMode::Average).is_err());
    }
}
