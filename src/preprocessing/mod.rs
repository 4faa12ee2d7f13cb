//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for analysis:
//! - Channel mixing (multichannel to mono)
//! - Duration bounding

pub mod channel_mixer;
pub mod duration;
