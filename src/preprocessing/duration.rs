//! Duration bounding
//!
//! Chord identification does not need the full track; analysis is capped to a
//! fixed amount of audio so runtime stays predictable for long files.

/// Number of samples allowed by a duration bound
///
/// Returns `None` when the bound is infinite (no truncation).
pub fn max_samples(sample_rate: u32, max_duration_seconds: f64) -> Option<usize> {
    if max_duration_seconds.is_infinite() && max_duration_seconds > 0.0 {
        return None;
    }
    let limit = (max_duration_seconds.max(0.0) * sample_rate as f64).floor();
    Some(limit as usize)
}

/// Truncate samples in place to at most `max_duration_seconds` of audio
///
/// Returns the number of samples removed.
pub fn truncate_to_duration(
    samples: &mut Vec<f32>,
    sample_rate: u32,
    max_duration_seconds: f64,
) -> usize {
    match max_samples(sample_rate, max_duration_seconds) {
        Some(limit) if samples.len() > limit => {
            let removed = samples.len() - limit;
            samples.truncate(limit);
            log::debug!(
                "Truncated {} samples to {:.1}s bound ({} kept)",
                removed,
                max_duration_seconds,
                limit
            );
            removed
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_samples() {
        assert_eq!(max_samples(44100, 90.0), Some(44100 * 90));
        assert_eq!(max_samples(22050, 0.5), Some(11025));
        assert_eq!(max_samples(44100, 0.0), Some(0));
        assert_eq!(max_samples(44100, f64::INFINITY), None);
    }

    #[test]
    fn test_truncate() {
        let mut samples = vec![0.0f32; 100];
        let removed = truncate_to_duration(&mut samples, 10, 5.0);
        assert_eq!(removed, 50);
        assert_eq!(samples.len(), 50);

        let removed = truncate_to_duration(&mut samples, 10, 90.0);
        assert_eq!(removed, 0);
        assert_eq!(samples.len(), 50);
    }

    #[test]
    fn test_truncate_to_zero() {
        let mut samples = vec![0.5f32; 10];
        truncate_to_duration(&mut samples, 44100, 0.0);
        assert!(samples.is_empty());
    }
}
