//! Per-tag level overrides

use super::log_level::LogLevel;

/// A single `(tag, level)` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLevel {
    pub tag: String,
    pub level: LogLevel,
}

/// Tag overrides kept sorted by tag, each tag at most once.
///
/// An empty list admits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    entries: Vec<TagLevel>,
}

impl TagList {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set the level for `tag`, replacing an existing entry in place or
    /// inserting at its sorted position.
    pub fn set_tag_level(&mut self, tag: impl Into<String>, level: LogLevel) -> &mut Self {
        let tag = tag.into();
        match self.entries.binary_search_by(|e| e.tag.as_str().cmp(tag.as_str())) {
            Ok(idx) => self.entries[idx].level = level,
            Err(idx) => self.entries.insert(idx, TagLevel { tag, level }),
        }
        self
    }

    pub fn remove_tag_level(&mut self, tag: &str) -> Option<LogLevel> {
        let idx = self
            .entries
            .binary_search_by(|e| e.tag.as_str().cmp(tag))
            .ok()?;
        Some(self.entries.remove(idx).level)
    }

    pub fn tag_level(&self, tag: &str) -> Option<LogLevel> {
        self.entries
            .binary_search_by(|e| e.tag.as_str().cmp(tag))
            .ok()
            .map(|idx| self.entries[idx].level)
    }

    /// True iff some override `(t, l)` has `t` in `tags` and `l <= level`.
    pub fn allows<S: AsRef<str>>(&self, level: LogLevel, tags: &[S]) -> bool {
        self.entries.iter().any(|entry| {
            entry.level <= level && tags.iter().any(|t| t.as_ref() == entry.tag)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagLevel> {
        self.entries.iter()
    }
}

impl<T: Into<String>> FromIterator<(T, LogLevel)> for TagList {
    fn from_iter<I: IntoIterator<Item = (T, LogLevel)>>(iter: I) -> Self {
        let mut list = TagList::new();
        for (tag, level) in iter {
            list.set_tag_level(tag, level);
        }
        list
    }
}
