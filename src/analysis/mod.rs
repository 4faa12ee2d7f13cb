//! Analysis and result aggregation modules
//!
//! Ties the feature stages together into a single run:
//! - Result types (pitch classes, chords, timeline)
//! - Metadata
//! - The run state machine

pub mod metadata;
pub mod pipeline;
pub mod result;
