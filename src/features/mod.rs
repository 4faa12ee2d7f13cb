//! Feature extraction modules
//!
//! This module contains the signal-processing stages:
//! - Short-time Fourier transform
//! - Chroma extraction (HPSS + constant-Q folding)
//! - Chord classification and segmentation

pub mod chord;
pub mod chroma;
pub mod stft;
