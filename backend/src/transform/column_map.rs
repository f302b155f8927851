//! Source→destination column mappings and their inversion.
//!
//! A [`ColumnMap`] may send several source columns to the same destination
//! column. Inverting it groups the sources per destination, and the largest
//! group decides how many output rows a split copy emits per source row.
//!
//! Both maps keep insertion order. That order decides which source a split
//! row takes and which destination column becomes the pivot on ties, so it
//! must survive (de)serialization.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// Source column → destination column, in declaration order.
///
/// In JSON the source columns are object keys, so they arrive as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMap(IndexMap<u16, u16>);

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to `destination`. Re-mapping a source keeps its position.
    pub fn insert(&mut self, source: u16, destination: u16) -> Option<u16> {
        self.0.insert(source, destination)
    }

    pub fn get(&self, source: u16) -> Option<u16> {
        self.0.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(source, destination)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.0.iter().map(|(s, d)| (*s, *d))
    }

    pub fn invert(&self) -> InvertedColumnMap {
        invert(self)
    }
}

impl FromIterator<(u16, u16)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (u16, u16)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (source, destination) in iter {
            map.insert(source, destination);
        }
        map
    }
}

impl<'de> Deserialize<'de> for ColumnMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnMapVisitor)
    }
}

struct ColumnMapVisitor;

impl<'de> Visitor<'de> for ColumnMapVisitor {
    type Value = ColumnMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of source column to destination column")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ColumnMap, A::Error> {
        let mut map = ColumnMap::new();
        while let Some((ColumnKey(source), destination)) = access.next_entry::<ColumnKey, u16>()? {
            map.insert(source, destination);
        }
        Ok(map)
    }
}

/// A column index written either as a number or as a numeric string.
///
/// Adjacently tagged operations buffer their parameters, and buffered map
/// keys stay strings, so the key is parsed here rather than by `u16`.
struct ColumnKey(u16);

impl<'de> Deserialize<'de> for ColumnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ColumnKeyVisitor)
    }
}

struct ColumnKeyVisitor;

impl<'de> Visitor<'de> for ColumnKeyVisitor {
    type Value = ColumnKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a column index")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ColumnKey, E> {
        v.parse::<u16>()
            .map(ColumnKey)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ColumnKey, E> {
        u16::try_from(v)
            .map(ColumnKey)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }
}

/// Destination column → source columns that map to it.
///
/// Destinations appear in the order they were first seen; each source list
/// is in the order of the original mapping and is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvertedColumnMap(IndexMap<u16, Vec<u16>>);

impl InvertedColumnMap {
    pub fn get(&self, destination: u16) -> Option<&[u16]> {
        self.0.get(&destination).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u16])> + '_ {
        self.0.iter().map(|(d, s)| (*d, s.as_slice()))
    }

    /// Split factor and pivot column, or `None` for an empty map.
    ///
    /// The pivot is the first destination (in map order) whose group has the
    /// largest size.
    pub fn split_plan(&self) -> Option<SplitPlan> {
        let mut best: Option<SplitPlan> = None;
        for (destination, sources) in self.iter() {
            if best.map_or(true, |b| sources.len() > b.factor) {
                best = Some(SplitPlan { factor: sources.len(), pivot: destination });
            }
        }
        best
    }
}

impl fmt::Display for InvertedColumnMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (destination, sources)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", destination, sources)?;
        }
        write!(f, "}}")
    }
}

/// Group source columns by destination column.
pub fn invert(map: &ColumnMap) -> InvertedColumnMap {
    let mut inverted: IndexMap<u16, Vec<u16>> = IndexMap::new();
    for (source, destination) in map.iter() {
        inverted.entry(destination).or_default().push(source);
    }
    InvertedColumnMap(inverted)
}

/// How a split copy fans out each source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    /// Output rows per source row.
    pub factor: usize,
    /// Destination column whose sources advance from one output row to the next.
    pub pivot: u16,
}

impl SplitPlan {
    /// Source column feeding `destination` in the `j`-th output row.
    ///
    /// The pivot takes its `j`-th source, repeating its last one once `j`
    /// runs past the list. Every other destination keeps its first source.
    pub fn select(&self, destination: u16, sources: &[u16], j: usize) -> Option<u16> {
        if destination == self.pivot {
            let last = sources.len().checked_sub(1)?;
            sources.get(j.min(last)).copied()
        } else {
            sources.first().copied()
        }
    }
}
