//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Harmonic-percussive separation
//! - Constant-Q filterbank folding
//! - Normalization
//! - Chroma-gram extraction

pub mod constant_q;
pub mod extractor;
pub mod hpss;
pub mod normalization;

pub use extractor::{extract_chroma, extract_chroma_from_file, ChromaFrame, Chromagram};
