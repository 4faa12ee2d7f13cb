//! Chord classification by template matching
//!
//! Each chroma frame is scored against every template in the bank by a raw dot
//! product. There is no normalization or smoothing: with binary templates the
//! score is simply the frame's energy on the chord's three pitch classes.

use super::templates::ChordTemplates;
use crate::analysis::result::{Chord, PitchClass};
use crate::features::chroma::{ChromaFrame, Chromagram};

/// Best-matching chord for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordMatch {
    /// Winning chord
    pub chord: Chord,

    /// Dot product of the frame with the winning template
    pub score: f32,
}

/// Which chroma frames get classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationStride {
    /// Every frame
    EveryFrame,
    /// One frame per second of audio (every `floor(frame_rate)` frames)
    OncePerSecond,
}

impl ClassificationStride {
    /// Frame step for a given frame rate, never less than 1
    pub fn step(self, frame_rate: f64) -> usize {
        match self {
            ClassificationStride::EveryFrame => 1,
            ClassificationStride::OncePerSecond => {
                if frame_rate.is_finite() && frame_rate >= 1.0 {
                    frame_rate.floor() as usize
                } else {
                    1
                }
            }
        }
    }
}

/// Classify one chroma frame
///
/// Templates are visited in the bank's enumeration order and a template only
/// wins if it scores strictly higher than the current best, so exact ties go
/// to the earliest template. An all-zero frame therefore classifies as C major
/// with score 0.
///
/// # Example
///
/// ```
/// use stratum_chords::features::chord::{classify, ChordTemplates};
///
/// let mut frame = [0.0f32; 12];
/// frame[9] = 1.0; // A
/// frame[0] = 0.8; // C
/// frame[4] = 0.9; // E
///
/// let best = classify(&frame, ChordTemplates::shared());
/// assert_eq!(best.chord.name(), "Am");
/// ```
pub fn classify(frame: &ChromaFrame, templates: &ChordTemplates) -> ChordMatch {
    let mut best: Option<ChordMatch> = None;
    for (chord, template) in templates.all_templates() {
        let score = dot_product(frame, template);
        if best.is_none_or(|current| score > current.score) {
            best = Some(ChordMatch {
                chord: *chord,
                score,
            });
        }
    }

    best.unwrap_or(ChordMatch {
        chord: Chord::major(PitchClass::new(0)),
        score: 0.0,
    })
}

/// Classify the frames of a chroma-gram
///
/// # Returns
///
/// `(frame_index, match)` pairs in frame order. With
/// [`ClassificationStride::OncePerSecond`] only every `floor(frame_rate)`-th
/// frame is included, starting at frame 0.
pub fn classify_frames(
    chromagram: &Chromagram,
    templates: &ChordTemplates,
    stride: ClassificationStride,
) -> Vec<(usize, ChordMatch)> {
    let step = stride.step(chromagram.frame_rate());
    log::debug!(
        "Classifying {} chroma frames (step {})",
        chromagram.frame_count(),
        step
    );

    chromagram
        .frames()
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, frame)| (i, classify(frame, templates)))
        .collect()
}

/// Compute dot product between two vectors.
fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
