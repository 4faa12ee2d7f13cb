//! Analysis result types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// Canonical pitch class names, C first, ascending by semitone
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings and their canonical sharp/natural equivalents
const FLAT_TO_SHARP: [(&str, &str); 7] = [
    ("Db", "C#"),
    ("Eb", "D#"),
    ("Gb", "F#"),
    ("Ab", "G#"),
    ("Bb", "A#"),
    ("Cb", "B"),
    ("Fb", "E"),
];

/// Error returned when a note or chord name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChordError(String);

impl fmt::Display for ParseChordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised chord or note name: {:?}", self.0)
    }
}

impl std::error::Error for ParseChordError {}

/// One of the 12 equal-tempered pitch classes (0 = C, 1 = C#, ..., 11 = B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// All pitch classes in ascending order starting at C
    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Pitch class from any integer, wrapped into [0, 12)
    pub fn new(index: i32) -> Self {
        PitchClass(index.rem_euclid(12) as u8)
    }

    /// Index in [0, 12)
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Pitch class `semitones` above this one (negative goes down)
    pub fn offset(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Canonical name (sharps, never flats)
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.index()]
    }

    /// Resolve a note name, mapping flats to their canonical spelling first
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_chords::PitchClass;
    ///
    /// assert_eq!(PitchClass::from_name("Bb"), PitchClass::from_name("A#"));
    /// assert_eq!(PitchClass::from_name("Cb").map(|p| p.name()), Some("B"));
    /// assert_eq!(PitchClass::from_name("H"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical = FLAT_TO_SHARP
            .iter()
            .find(|(flat, _)| *flat == name)
            .map(|(_, sharp)| *sharp)
            .unwrap_or(name);
        NOTE_NAMES
            .iter()
            .position(|&n| n == canonical)
            .map(|i| PitchClass(i as u8))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = ParseChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseChordError(s.to_string()))
    }
}

/// Triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChordQuality {
    /// Root, major third, fifth
    Major,
    /// Root, minor third, fifth
    Minor,
}

impl ChordQuality {
    /// Both qualities, in enumeration order (major first)
    pub const ALL: [ChordQuality; 2] = [ChordQuality::Major, ChordQuality::Minor];

    /// Semitone offsets of the triad relative to its root
    pub fn intervals(self) -> [usize; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
        }
    }

    /// Label suffix: empty for major, `m` for minor
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
        }
    }
}

/// Chord label: a root and a quality
///
/// Serialises as its label string, e.g. `"C"`, `"F#m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Chord {
    /// Root pitch class
    pub root: PitchClass,
    /// Major or minor
    pub quality: ChordQuality,
}

impl Chord {
    /// Major chord on `root`
    pub fn major(root: PitchClass) -> Self {
        Self {
            root,
            quality: ChordQuality::Major,
        }
    }

    /// Minor chord on `root`
    pub fn minor(root: PitchClass) -> Self {
        Self {
            root,
            quality: ChordQuality::Minor,
        }
    }

    /// True for minor chords
    pub fn is_minor(&self) -> bool {
        self.quality == ChordQuality::Minor
    }

    /// Label in `<Root>[m]` form
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_chords::{Chord, PitchClass};
    ///
    /// assert_eq!(Chord::major(PitchClass::new(0)).name(), "C");
    /// assert_eq!(Chord::minor(PitchClass::new(9)).name(), "Am");
    /// assert_eq!(Chord::minor(PitchClass::new(1)).name(), "C#m");
    /// ```
    pub fn name(&self) -> String {
        format!("{}{}", self.root.name(), self.quality.suffix())
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root.name(), self.quality.suffix())
    }
}

impl FromStr for Chord {
    type Err = ParseChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (root, quality) = match s.strip_suffix('m') {
            Some(root) => (root, ChordQuality::Minor),
            None => (s, ChordQuality::Major),
        };
        let root = PitchClass::from_name(root).ok_or_else(|| ParseChordError(s.to_string()))?;
        Ok(Chord { root, quality })
    }
}

impl From<Chord> for String {
    fn from(chord: Chord) -> Self {
        chord.name()
    }
}

impl TryFrom<String> for Chord {
    type Error = ParseChordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A chord onset in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Onset in whole seconds from the start of the analysed audio
    pub onset_seconds: u32,

    /// Chord sounding from this onset until the next event
    #[serde(rename = "label")]
    pub chord: Chord,
}

/// Ordered chord timeline
///
/// Sorted by onset; consecutive events never share a label. An event lasts
/// until the next event's onset, the last one until the end of the track.
///
/// Serialises as a plain JSON array of events; deserialising rejects arrays
/// that are out of onset order or repeat a label back to back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<ChordEvent>", try_from = "Vec<ChordEvent>")]
pub struct Timeline {
    events: Vec<ChordEvent>,
}

impl Timeline {
    /// Empty timeline ("no chords found")
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event unless it repeats the last label
    ///
    /// Returns true if the event was added.
    pub fn push_if_changed(&mut self, event: ChordEvent) -> bool {
        if self.events.last().map(|last| last.chord) == Some(event.chord) {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Events in onset order
    pub fn events(&self) -> &[ChordEvent] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no chord was found
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events
    pub fn iter(&self) -> std::slice::Iter<'_, ChordEvent> {
        self.events.iter()
    }

    /// `(onset_seconds, label)` pairs for display
    pub fn to_pairs(&self) -> Vec<(u32, String)> {
        self.events
            .iter()
            .map(|e| (e.onset_seconds, e.chord.name()))
            .collect()
    }
}

/// Error returned when a list of events is not a valid timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimelineError(String);

impl fmt::Display for InvalidTimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timeline: {}", self.0)
    }
}

impl std::error::Error for InvalidTimelineError {}

impl TryFrom<Vec<ChordEvent>> for Timeline {
    type Error = InvalidTimelineError;

    fn try_from(events: Vec<ChordEvent>) -> Result<Self, Self::Error> {
        for (i, pair) in events.windows(2).enumerate() {
            if pair[0].chord == pair[1].chord {
                return Err(InvalidTimelineError(format!(
                    "events {} and {} share label {}",
                    i,
                    i + 1,
                    pair[1].chord
                )));
            }
            if pair[0].onset_seconds > pair[1].onset_seconds {
                return Err(InvalidTimelineError(format!(
                    "event {} starts at {}s, before event {} at {}s",
                    i + 1,
                    pair[1].onset_seconds,
                    i,
                    pair[0].onset_seconds
                )));
            }
        }
        Ok(Self { events })
    }
}

impl From<Timeline> for Vec<ChordEvent> {
    fn from(timeline: Timeline) -> Self {
        timeline.events
    }
}

impl IntoIterator for Timeline {
    type Item = ChordEvent;
    type IntoIter = std::vec::IntoIter<ChordEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a ChordEvent;
    type IntoIter = std::slice::Iter<'a, ChordEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordAnalysis {
    /// Chord timeline
    pub timeline: Timeline,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(PitchClass::new(12).index(), 0);
        assert_eq!(PitchClass::new(-1).index(), 11);
        assert_eq!(PitchClass::new(9).offset(3).name(), "C");
    }

    #[test]
    fn test_every_name_resolves() {
        for (i, name) in NOTE_NAMES.iter().enumerate() {
            assert_eq!(PitchClass::from_name(name).map(|p| p.index()), Some(i));
        }
        for (flat, sharp) in FLAT_TO_SHARP.iter() {
            assert_eq!(PitchClass::from_name(flat), PitchClass::from_name(sharp));
            assert!(PitchClass::from_name(flat).is_some());
        }
        assert_eq!(PitchClass::from_name("Fb").map(|p| p.name()), Some("E"));
        assert!(PitchClass::from_name("").is_none());
        assert!(PitchClass::from_name("c").is_none());
    }

    #[test]
    fn test_chord_parse() {
        assert_eq!("Am".parse::<Chord>().unwrap(), Chord::minor(PitchClass::new(9)));
        assert_eq!("Ebm".parse::<Chord>().unwrap().name(), "D#m");
        assert_eq!("F#".parse::<Chord>().unwrap(), Chord::major(PitchClass::new(6)));
        assert!("Xm".parse::<Chord>().is_err());
        assert!("m".parse::<Chord>().is_err());
    }

    #[test]
    fn test_is_minor() {
        assert!("C#m".parse::<Chord>().unwrap().is_minor());
        assert!(!"C#".parse::<Chord>().unwrap().is_minor());
    }

    #[test]
    fn test_timeline_serialization() {
        let mut timeline = Timeline::new();
        timeline.push_if_changed(ChordEvent {
            onset_seconds: 0,
            chord: Chord::major(PitchClass::new(0)),
        });
        timeline.push_if_changed(ChordEvent {
            onset_seconds: 4,
            chord: Chord::minor(PitchClass::new(9)),
        });

        let json = serde_json::to_string(&timeline).unwrap();
        assert_eq!(
            json,
            r#"[{"onset_seconds":0,"label":"C"},{"onset_seconds":4,"label":"Am"}]"#
        );

        let back: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timeline);
    }

    #[test]
    fn test_deserialize_rejects_repeated_label() {
        let json = r#"[{"onset_seconds":0,"label":"C"},{"onset_seconds":1,"label":"C"}]"#;
        assert!(serde_json::from_str::<Timeline>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unordered_onsets() {
        let json = r#"[{"onset_seconds":3,"label":"C"},{"onset_seconds":1,"label":"G"}]"#;
        assert!(serde_json::from_str::<Timeline>(json).is_err());

        let empty: Timeline = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_push_if_changed_rejects_repeat() {
        let mut timeline = Timeline::new();
        let c = Chord::major(PitchClass::new(0));
        assert!(timeline.push_if_changed(ChordEvent { onset_seconds: 0, chord: c }));
        assert!(!timeline.push_if_changed(ChordEvent { onset_seconds: 1, chord: c }));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.to_pairs(), vec![(0, "C".to_string())]);
    }
}
