//! Target leaf names.

use std::collections::BTreeSet;
use std::ops::Deref;

/// Set of target leaf names, ordered for deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet(BTreeSet<String>);

impl TargetSet {
    /// Parses a newline-separated list: one name per line, blank lines skipped.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.0
    }
}

impl Deref for TargetSet {
    type Target = BTreeSet<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for TargetSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let targets = TargetSet::parse("A\n  B \n\n\r\nC\r\nA\n");
        assert_eq!(targets.len(), 3);
        assert!(targets.contains("A"));
        assert!(targets.contains("B"));
        assert!(targets.contains("C"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(TargetSet::parse("").is_empty());
        assert!(TargetSet::parse("\n  \n").is_empty());
    }
}
