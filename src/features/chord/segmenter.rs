//! Run-length segmentation of per-frame chord labels
//!
//! Walks classified frames in order and emits a [`ChordEvent`] only when the
//! label differs from the last emitted one. Compression is keyed on label
//! identity, not on timestamp: several frames falling into the same second
//! collapse naturally, and a label that comes back after a different one
//! starts a new event.

use crate::analysis::result::{Chord, ChordEvent, Timeline};

/// Whole-second onset of a frame
///
/// `floor(frame_index / frame_rate)`; a non-positive or non-finite frame rate
/// maps every frame to second 0.
pub fn frame_to_seconds(frame_index: usize, frame_rate: f64) -> u32 {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return 0;
    }
    (frame_index as f64 / frame_rate).floor() as u32
}

/// Collapse per-frame labels into a timeline
///
/// # Arguments
///
/// * `frames` - `(frame_index, chord)` pairs in frame order
/// * `frame_rate` - Frames per second
///
/// # Returns
///
/// Timeline whose first event is the first frame's label at that frame's
/// second; empty input gives an empty timeline.
///
/// # Example
///
/// ```
/// use stratum_chords::features::chord::segment;
/// use stratum_chords::Chord;
///
/// let c: Chord = "C".parse().unwrap();
/// let g: Chord = "G".parse().unwrap();
/// let frames = [(0, c), (1, c), (2, g), (3, g), (4, c)];
///
/// let timeline = segment(&frames, 1.0);
/// let pairs = timeline.to_pairs();
/// assert_eq!(pairs, vec![(0, "C".to_string()), (2, "G".to_string()), (4, "C".to_string())]);
/// ```
pub fn segment(frames: &[(usize, Chord)], frame_rate: f64) -> Timeline {
    let mut timeline = Timeline::new();
    for &(frame_index, chord) in frames {
        timeline.push_if_changed(ChordEvent {
            onset_seconds: frame_to_seconds(frame_index, frame_rate),
            chord,
        });
    }

    log::debug!(
        "Segmented {} frames into {} chord events",
        frames.len(),
        timeline.len()
    );

    timeline
}
