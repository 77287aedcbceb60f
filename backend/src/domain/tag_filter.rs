//! Tag filter evaluation for event listings.
//!
//! Normalizes raw repeated query parameters into a deduplicated set of tag
//! names and evaluates the resulting predicate against an event's tags.

use crate::domain::event::{TagName, TagSet};

/// A normalized tag filter parsed from repeated request parameters.
///
/// An empty filter means "no filtering": every event qualifies on the tag
/// dimension. A non-empty filter matches events whose tag set intersects it
/// (logical OR across the filter's tags).
///
/// # Examples
/// ```
/// use backend::domain::{TagFilter, TagSet};
///
/// let filter = TagFilter::from_raw(["music", "music", " art "]);
/// assert_eq!(filter.len(), 2);
/// assert!(filter.matches(&TagSet::from_raw(["music", "theatre"])));
/// assert!(!filter.matches(&TagSet::from_raw(["theatre"])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagFilter(TagSet);

impl TagFilter {
    /// Build a filter from raw names, trimming and dropping blanks and
    /// collapsing duplicates.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(TagSet::from_raw(raw))
    }

    /// Whether the filter imposes no tag restriction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct tags in the filter.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `tags` satisfies the filter.
    pub fn matches(&self, tags: &TagSet) -> bool {
        self.0.is_empty() || self.0.intersects(tags)
    }

    /// Iterate the filter's tags in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &TagName> {
        self.0.iter()
    }

    /// Filter tag names as plain strings, in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.0.names()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TagFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&TagSet::default()));
        assert!(filter.matches(&TagSet::from_raw(["music"])));
    }

    #[test]
    fn duplicates_and_blanks_collapse() {
        let filter = TagFilter::from_raw(["music", "music", "", "   "]);
        assert_eq!(filter.len(), 1);
    }

    #[rstest]
    #[case(&["music"], &["music", "art"], true)]
    #[case(&["music"], &["art"], false)]
    #[case(&["music", "art"], &["art"], true)]
    #[case(&["music"], &[], false)]
    fn or_semantics_across_filter_tags(
        #[case] filter: &[&str],
        #[case] tags: &[&str],
        #[case] expected: bool,
    ) {
        let filter = TagFilter::from_raw(filter.iter().copied());
        let tags = TagSet::from_raw(tags.iter().copied());
        assert_eq!(filter.matches(&tags), expected);
    }
}
