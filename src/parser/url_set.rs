//! Run-wide deduplication of resolved URLs.

use std::collections::HashSet;

use super::resolve::ResolvedUrl;

/// Insertion-ordered set of [`ResolvedUrl`]s.
///
/// Built once per pipeline run while seed pages are processed, then frozen
/// with [`UrlSet::into_vec`] before any download starts. Deduplication is
/// exact string equality.
#[derive(Debug, Default, Clone)]
pub struct UrlSet {
    seen: HashSet<ResolvedUrl>,
    ordered: Vec<ResolvedUrl>,
}

impl UrlSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url`, returning `true` if it was not already present.
    pub fn insert(&mut self, url: ResolvedUrl) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.ordered.push(url);
        true
    }

    /// Returns true if `url` has been inserted.
    #[must_use]
    pub fn contains(&self, url: &ResolvedUrl) -> bool {
        self.seen.contains(url)
    }

    /// Number of unique URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if no URL has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedUrl> {
        self.ordered.iter()
    }

    /// Freezes the set into its first-insertion-ordered list.
    #[must_use]
    pub fn into_vec(self) -> Vec<ResolvedUrl> {
        self.ordered
    }
}
