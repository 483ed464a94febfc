//! Recognized image check parameter names

use crate::spec::FilterChain;
use std::fmt;

/// A parameter name the clause compiler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKey {
    File,
    Error,
    Tolerance,
    AnalyzeOffset,
    Stretch,
    Area,
    Filter,
    FilterA,
    FilterB,
    MapFilter,
    CropIfOutside,
}

/// Clause text for each key. Lookup is case-sensitive.
const KEY_TABLE: &[(&str, ClauseKey)] = &[
    ("file", ClauseKey::File),
    ("error", ClauseKey::Error),
    ("tolerance", ClauseKey::Tolerance),
    ("analyze-offset", ClauseKey::AnalyzeOffset),
    ("stretch", ClauseKey::Stretch),
    ("area", ClauseKey::Area),
    ("filter", ClauseKey::Filter),
    ("filter-a", ClauseKey::FilterA),
    ("filter-b", ClauseKey::FilterB),
    ("map-filter", ClauseKey::MapFilter),
    ("crop-if-outside", ClauseKey::CropIfOutside),
];

impl ClauseKey {
    pub fn from_key(key: &str) -> Option<Self> {
        KEY_TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, clause_key)| *clause_key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKey::File => "file",
            ClauseKey::Error => "error",
            ClauseKey::Tolerance => "tolerance",
            ClauseKey::AnalyzeOffset => "analyze-offset",
            ClauseKey::Stretch => "stretch",
            ClauseKey::Area => "area",
            ClauseKey::Filter => "filter",
            ClauseKey::FilterA => "filter-a",
            ClauseKey::FilterB => "filter-b",
            ClauseKey::MapFilter => "map-filter",
            ClauseKey::CropIfOutside => "crop-if-outside",
        }
    }

    /// Chains a filter key appends to; empty for non-filter keys
    pub fn filter_targets(&self) -> &'static [FilterChain] {
        match self {
            ClauseKey::Filter => &[FilterChain::Original, FilterChain::Sample],
            ClauseKey::FilterA => &[FilterChain::Original],
            ClauseKey::FilterB => &[FilterChain::Sample],
            ClauseKey::MapFilter => &[FilterChain::Map],
            _ => &[],
        }
    }

    pub fn all() -> impl Iterator<Item = ClauseKey> {
        KEY_TABLE.iter().map(|(_, key)| *key)
    }
}

impl fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
