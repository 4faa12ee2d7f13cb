//! Chord recognition modules
//!
//! Recognise major/minor triads from chroma using:
//! - Binary triad templates (24 chords)
//! - Dot-product template matching
//! - Run-length segmentation into a timeline

pub mod classifier;
pub mod segmenter;
pub mod templates;

pub use classifier::{classify, classify_frames, ChordMatch, ClassificationStride};
pub use segmenter::{frame_to_seconds, segment};
pub use templates::{template_for, ChordTemplate, ChordTemplates};
