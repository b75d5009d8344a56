//! Sort policies over folder listings
//!
//! A [`SortMode`] is a closed set of orderings. Each mode maps an entry to a
//! comparison key tuple with a fixed tie-break chain:
//!
//! | Mode        | Primary      | Secondary    | Tertiary     |
//! |-------------|--------------|--------------|--------------|
//! | `TypedName` | kind         | name         | lastModified |
//! | `TypedLMT`  | kind         | lastModified | name         |
//! | `Name`      | name         | lastModified |              |
//! | `LMT`       | lastModified | name         |              |
//!
//! Kind compares by its string form (`"File"` before `"Folder"`), so folders
//! are not pinned to the top of a listing.
//!
//! Reversal flips the whole sorted sequence, tie-breaks included.

use crate::entry::FileEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available sort policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Kind, then name, then modification time
    #[default]
    TypedName,
    /// Kind, then modification time, then name
    #[serde(rename = "typed-lmt")]
    TypedLMT,
    /// Name, then modification time
    Name,
    /// Modification time, then name
    #[serde(rename = "lmt")]
    LMT,
}

/// A single component of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortField<'a> {
    Kind(&'static str),
    Name(&'a str),
    Modified(DateTime<Utc>),
}

/// Comparison key for one entry under one mode
///
/// Two-key modes leave the tertiary slot empty.
pub type SortKey<'a> = (SortField<'a>, SortField<'a>, Option<SortField<'a>>);

impl SortMode {
    pub const ALL: [Self; 4] = [Self::TypedName, Self::TypedLMT, Self::Name, Self::LMT];

    /// Build the comparison key of `entry` for this mode
    #[must_use]
    pub fn key(self, entry: &FileEntry) -> SortKey<'_> {
        let kind = SortField::Kind(entry.kind.as_str());
        let name = SortField::Name(&entry.name);
        let modified = SortField::Modified(entry.last_modified);

        match self {
            Self::TypedName => (kind, name, Some(modified)),
            Self::TypedLMT => (kind, modified, Some(name)),
            Self::Name => (name, modified, None),
            Self::LMT => (modified, name, None),
        }
    }

    /// Identifier used in config files and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypedName => "typed-name",
            Self::TypedLMT => "typed-lmt",
            Self::Name => "name",
            Self::LMT => "lmt",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort mode identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort mode '{0}' (expected one of: typed-name, typed-lmt, name, lmt)")]
pub struct ParseSortModeError(pub String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ParseSortModeError(s.to_string()))
    }
}

/// Order `entries` under `mode`
///
/// The sort is stable, so entries with fully equal keys keep their input
/// order. With `reversed`, the sorted sequence is reversed as a whole.
#[must_use]
pub fn sort(mut entries: Vec<FileEntry>, mode: SortMode, reversed: bool) -> Vec<FileEntry> {
    entries.sort_by(|a, b| mode.key(a).cmp(&mode.key(b)));
    if reversed {
        entries.reverse();
    }
    entries
}
