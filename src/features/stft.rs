//! Short-time Fourier transform
//!
//! Centred STFT with a periodic Hann window. Frames are centred on multiples
//! of the hop size (the signal is zero padded by `frame_size / 2` on both
//! sides), so frame `i` describes the audio around sample `i * hop_size` and a
//! signal of `n` samples yields `1 + n / hop_size` frames.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;

/// Magnitude spectrogram, frame-major
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// One magnitude spectrum per frame, `frame_size / 2 + 1` bins each
    pub frames: Vec<Vec<f32>>,

    /// FFT frame size in samples
    pub frame_size: usize,

    /// Hop size in samples
    pub hop_size: usize,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Spectrogram {
    /// Number of frequency bins per frame
    pub fn n_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Number of frames
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Width of one frequency bin in Hz
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate as f32 / self.frame_size as f32
    }
}

/// Number of centred frames for a signal of `n_samples`
pub fn frame_count(n_samples: usize, hop_size: usize) -> usize {
    if n_samples == 0 || hop_size == 0 {
        return 0;
    }
    1 + n_samples / hop_size
}

/// Compute the magnitude spectrogram of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size
/// * `hop_size` - Hop between frame centres
///
/// # Returns
///
/// Spectrogram with `1 + samples.len() / hop_size` frames (none for empty input)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
pub fn magnitude_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, AnalysisError> {
    if frame_size == 0 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "STFT frame_size and hop_size must be > 0, got {} and {}",
            frame_size, hop_size
        )));
    }

    let n_frames = frame_count(samples.len(), hop_size);
    log::debug!(
        "Computing STFT: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        n_frames
    );

    let window = hann_window(frame_size);
    let n_bins = frame_size / 2 + 1;
    let pad = frame_size / 2;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    let mut frames = Vec::with_capacity(n_frames);
    for frame_idx in 0..n_frames {
        // Position of buffer[0] in the unpadded signal; may be negative.
        let origin = (frame_idx * hop_size) as isize - pad as isize;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let pos = origin + i as isize;
            let sample = if pos >= 0 && (pos as usize) < samples.len() {
                samples[pos as usize]
            } else {
                0.0
            };
            *slot = Complex::new(sample * window[i], 0.0);
        }

        fft.process(&mut buffer);

        frames.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
    }

    Ok(Spectrogram {
        frames,
        frame_size,
        hop_size,
        sample_rate,
    })
}

/// Periodic Hann window
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| {
            let t = 2.0 * std::f32::consts::PI * n as f32 / size as f32;
            0.5 * (1.0 - t.cos())
        })
        .collect()
}
