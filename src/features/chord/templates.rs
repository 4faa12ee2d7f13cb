//! Binary triad templates
//!
//! One 12-dimensional template per (root, quality) pair, 24 in total. A
//! template has ones at the three chord tones and zeros elsewhere, so its dot
//! product with a chroma frame is the frame's energy on those three pitch
//! classes.
//!
//! Templates are stored in a fixed enumeration order: roots ascending from C,
//! major before minor for each root (`C, Cm, C#, C#m, ..., B, Bm`). The
//! classifier breaks ties by this order, so it is part of the contract.

use std::sync::OnceLock;

use crate::analysis::result::{Chord, ChordQuality, PitchClass};

/// Expected chroma energy of one chord
pub type ChordTemplate = [f32; 12];

/// Number of templates in the bank (12 roots x 2 qualities)
pub const TEMPLATE_COUNT: usize = 24;

/// Build the template of a triad
///
/// # Example
///
/// ```
/// use stratum_chords::features::chord::templates::template_for;
/// use stratum_chords::{ChordQuality, PitchClass};
///
/// let a_minor = template_for(PitchClass::new(9), ChordQuality::Minor);
/// // A, C, E
/// assert_eq!(a_minor[9], 1.0);
/// assert_eq!(a_minor[0], 1.0);
/// assert_eq!(a_minor[4], 1.0);
/// assert_eq!(a_minor.iter().sum::<f32>(), 3.0);
/// ```
pub fn template_for(root: PitchClass, quality: ChordQuality) -> ChordTemplate {
    let mut template = [0.0f32; 12];
    for interval in quality.intervals() {
        template[(root.index() + interval) % 12] = 1.0;
    }
    template
}

/// Template bank for all 24 major/minor triads
#[derive(Debug, Clone)]
pub struct ChordTemplates {
    entries: Vec<(Chord, ChordTemplate)>,
}

impl ChordTemplates {
    /// Build all 24 templates in enumeration order
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(TEMPLATE_COUNT);
        for root in PitchClass::ALL {
            for quality in ChordQuality::ALL {
                entries.push((Chord { root, quality }, template_for(root, quality)));
            }
        }
        Self { entries }
    }

    /// Process-wide bank, built on first use and read-only afterwards
    pub fn shared() -> &'static ChordTemplates {
        static SHARED: OnceLock<ChordTemplates> = OnceLock::new();
        SHARED.get_or_init(ChordTemplates::new)
    }

    /// Template of a given root and quality
    pub fn template_for(&self, root: PitchClass, quality: ChordQuality) -> &ChordTemplate {
        &self.entries[Self::position(Chord { root, quality })].1
    }

    /// Template of a given chord
    pub fn get(&self, chord: Chord) -> &ChordTemplate {
        &self.entries[Self::position(chord)].1
    }

    /// All (chord, template) pairs in enumeration order
    pub fn all_templates(&self) -> &[(Chord, ChordTemplate)] {
        &self.entries
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the bank holds no templates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of a chord in enumeration order
    fn position(chord: Chord) -> usize {
        let quality_offset = match chord.quality {
            ChordQuality::Major => 0,
            ChordQuality::Minor => 1,
        };
        chord.root.index() * 2 + quality_offset
    }
}

impl Default for ChordTemplates {
    fn default() -> Self {
        Self::new()
    }
}
