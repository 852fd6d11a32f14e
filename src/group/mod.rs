//! Group key space for alphabetical bucketing.
//!
//! A group is one of the letters A–Z, the `Blank` bucket for empty or null
//! field values, or the optional `All` bucket standing for the unfiltered
//! set. Raw strings are normalized here, at the boundary where they enter,
//! and nowhere else.

use std::fmt;
use std::str::FromStr;

pub mod counts;

pub use counts::GroupCounts;

/// Canonical label of the bucket holding empty and null values.
pub const BLANK_LABEL: &str = "Blank";

/// Canonical label of the unfiltered bucket.
pub const ALL_LABEL: &str = "All";

/// Errors specific to the group layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    /// The string is not a letter, "Blank" or "All"
    #[error("unknown group {0:?}: expected a letter A-Z, \"Blank\" or \"All\"")]
    UnknownGroup(String),

    /// The character is outside A-Z
    #[error("{0:?} is not a letter A-Z")]
    NotALetter(char),
}

/// An upper-case ASCII letter A–Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(u8);

impl Letter {
    /// The fallback group when a source has no records at all.
    pub const A: Letter = Letter(b'A');

    /// Builds a letter from any ASCII alphabetic character, folding case.
    pub fn new(c: char) -> Result<Self, GroupError> {
        if c.is_ascii_alphabetic() {
            Ok(Letter(c.to_ascii_uppercase() as u8))
        } else {
            Err(GroupError::NotALetter(c))
        }
    }

    /// Iterates A through Z in order.
    pub fn all() -> impl Iterator<Item = Letter> {
        (b'A'..=b'Z').map(Letter)
    }

    /// The upper-case character.
    pub fn as_char(self) -> char {
        self.0 as char
    }

    /// Case-insensitive test against the first character of a value, using
    /// the same lowering as [`raw_key_of`].
    pub fn is_initial_of(self, value: &str) -> bool {
        let lower = self.as_char().to_ascii_lowercase();
        value
            .chars()
            .next()
            .map_or(false, |c| c.to_lowercase().eq(std::iter::once(lower)))
    }

    /// Raw group key of this letter: its lower-case form.
    pub fn raw_key(self) -> String {
        self.as_char().to_ascii_lowercase().to_string()
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A bucket key.
///
/// The derived ordering is the fallback scan order: A..Z, then `Blank`,
/// then `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Letter(Letter),
    Blank,
    All,
}

impl Group {
    /// Candidate groups in scan order. `All` is only a candidate when the
    /// paginator offers it.
    pub fn scan_order(all_option: bool) -> impl Iterator<Item = Group> {
        Letter::all()
            .map(Group::Letter)
            .chain(std::iter::once(Group::Blank))
            .chain(all_option.then_some(Group::All))
    }

    /// Canonicalizes a raw key reported by a data source.
    ///
    /// Null and empty keys are `Blank`. Anything else is upper-cased and
    /// must be a single letter A–Z; other initials (digits, punctuation,
    /// non-ASCII letters) have no bucket and yield `None`.
    pub fn from_raw_key(raw: Option<&str>) -> Option<Group> {
        let raw = match raw {
            None => return Some(Group::Blank),
            Some(raw) if raw.is_empty() => return Some(Group::Blank),
            Some(raw) => raw,
        };

        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::new(c).ok().map(Group::Letter),
            _ => None,
        }
    }

    pub fn is_all(self) -> bool {
        matches!(self, Group::All)
    }
}

impl From<Letter> for Group {
    fn from(letter: Letter) -> Self {
        Group::Letter(letter)
    }
}

impl FromStr for Group {
    type Err = GroupError;

    /// Parses a caller-supplied key. Letters are case-folded, the
    /// `Blank`/`All` sentinels are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            BLANK_LABEL => return Ok(Group::Blank),
            ALL_LABEL => return Ok(Group::All),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Group::Letter(Letter::new(c)?)),
            _ => Err(GroupError::UnknownGroup(s.to_string())),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Letter(letter) => write!(f, "{}", letter),
            Group::Blank => f.write_str(BLANK_LABEL),
            Group::All => f.write_str(ALL_LABEL),
        }
    }
}

/// Lower-cased first character of a value, the key data sources group by.
///
/// `None` stays `None` (null); an empty value yields `Some("")`. Both end
/// up in the `Blank` bucket.
pub fn raw_key_of(value: Option<&str>) -> Option<String> {
    value.map(|value| {
        value
            .chars()
            .next()
            .map(|c| c.to_lowercase().collect::<String>())
            .unwrap_or_default()
    })
}
