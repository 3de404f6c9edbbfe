//! Static mapping from typed symbols to pitches.

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::error::ConfigError;

/// One key of the instrument's fixed alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(char);

impl NoteId {
    pub fn symbol(self) -> char {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frequency in Hz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Pitch(f32);

impl Pitch {
    pub fn hz(self) -> f32 {
        self.0
    }
}

/// Default layout: one chromatic octave from middle C on the home row, black
/// keys on the row above.
const DEFAULT_KEYS: [(char, f32); 14] = [
    ('a', 261.63),
    ('w', 277.18),
    ('s', 293.66),
    ('e', 311.13),
    ('d', 329.63),
    ('f', 349.23),
    ('t', 369.99),
    ('g', 392.0),
    ('y', 415.3),
    ('h', 440.0),
    ('u', 466.16),
    ('j', 493.88),
    ('k', 523.25),
    ('l', 587.33),
];

/// NoteId -> Pitch table. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f32>")]
pub struct KeyMap {
    pitches: BTreeMap<NoteId, Pitch>,
}

impl KeyMap {
    /// Build a map from `(symbol, hz)` pairs.
    ///
    /// Symbols are folded to lowercase so lookups are case-insensitive.
    pub fn new(entries: impl IntoIterator<Item = (char, f32)>) -> Result<Self, ConfigError> {
        let mut pitches = BTreeMap::new();
        for (symbol, hz) in entries {
            if !hz.is_finite() || hz <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "key '{symbol}' has non-positive frequency {hz}"
                )));
            }
            let note = NoteId(fold(symbol));
            if pitches.insert(note, Pitch(hz)).is_some() {
                return Err(ConfigError::Invalid(format!("key '{symbol}' mapped twice")));
            }
        }
        if pitches.is_empty() {
            return Err(ConfigError::Invalid("keymap is empty".into()));
        }
        Ok(Self { pitches })
    }

    /// Resolve a raw input symbol. `None` for anything outside the alphabet.
    pub fn note(&self, symbol: char) -> Option<NoteId> {
        let note = NoteId(fold(symbol));
        self.pitches.contains_key(&note).then_some(note)
    }

    pub fn pitch(&self, note: NoteId) -> Option<Pitch> {
        self.pitches.get(&note).copied()
    }

    pub fn notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.pitches.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            pitches: DEFAULT_KEYS
                .iter()
                .map(|&(symbol, hz)| (NoteId(symbol), Pitch(hz)))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, f32>> for KeyMap {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f32>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, hz) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => entries.push((symbol, hz)),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "keymap key {key:?} must be a single character"
                    )))
                }
            }
        }
        Self::new(entries)
    }
}

fn fold(symbol: char) -> char {
    symbol.to_lowercase().next().unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_covers_fourteen_keys() {
        let map = KeyMap::default();
        assert_eq!(map.len(), 14);

        let a = map.note('a').expect("'a' is mapped");
        assert_eq!(map.pitch(a), Some(Pitch(261.63)));
        let l = map.note('l').expect("'l' is mapped");
        assert_eq!(map.pitch(l), Some(Pitch(587.33)));
    }

    #[test]
    fn lookups_ignore_case_and_reject_strays() {
        let map = KeyMap::default();
        assert_eq!(map.note('H'), map.note('h'));
        assert_eq!(map.note('q'), None);
        assert_eq!(map.note('1'), None);
        assert_eq!(map.note(' '), None);
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(KeyMap::new([('a', 0.0)]).is_err());
        assert!(KeyMap::new([('a', f32::NAN)]).is_err());
        assert!(KeyMap::new([('a', 440.0), ('A', 220.0)]).is_err());
        assert!(KeyMap::new(std::iter::empty()).is_err());
    }

    #[test]
    fn parses_from_json_object() {
        let map: KeyMap = serde_json::from_str(r#"{ "z": 110.0, "x": 220.0 }"#).unwrap();
        let z = map.note('z').unwrap();
        assert_eq!(map.pitch(z).map(Pitch::hz), Some(110.0));

        let err = serde_json::from_str::<KeyMap>(r#"{ "zz": 110.0 }"#);
        assert!(err.is_err());
    }
}
