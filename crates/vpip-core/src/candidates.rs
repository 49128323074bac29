//! Candidate artifacts keyed by variant.

use std::collections::HashMap;

use vpip_schema::{Artifact, VariantHash};

/// The best artifact for each variant key, plus the unvarianted one.
///
/// Built from an already-ordered candidate list: for each key the first
/// artifact seen (newest version, wheel before sdist) is kept.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    by_hash: HashMap<Option<VariantHash>, Artifact>,
}

impl CandidateSet {
    /// Key an ordered candidate list by variant hash.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Artifact>) -> Self {
        let mut by_hash = HashMap::new();
        for artifact in candidates {
            by_hash
                .entry(artifact.variant_hash.clone())
                .or_insert(artifact);
        }
        Self { by_hash }
    }

    /// Look up the artifact for a variant key; `None` is the unvarianted key.
    pub fn get(&self, hash: Option<&VariantHash>) -> Option<&Artifact> {
        self.by_hash.get(&hash.cloned())
    }

    /// The artifact that carries no variant tag.
    pub fn unvarianted(&self) -> Option<&Artifact> {
        self.get(None)
    }

    /// Whether no candidate at all was found.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Number of distinct variant keys.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }
}

impl FromIterator<Artifact> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = Artifact>>(iter: T) -> Self {
        Self::from_candidates(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpip_schema::parse_artifact;

    #[test]
    fn test_first_candidate_wins_per_key() {
        let set: CandidateSet = [
            "https://x/pkg-2.0.0-py3-none-any.whl",
            "https://x/pkg-2.0.0~abcd1234-py3-none-any.whl",
            "https://x/pkg-1.0.0-py3-none-any.whl",
            "https://x/pkg-1.0.0~abcd1234-py3-none-any.whl",
        ]
        .into_iter()
        .map(|url| parse_artifact(url).unwrap())
        .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.unvarianted().unwrap().filename,
            "pkg-2.0.0-py3-none-any.whl"
        );
        let hash = VariantHash::new("abcd1234").unwrap();
        assert_eq!(
            set.get(Some(&hash)).unwrap().filename,
            "pkg-2.0.0~abcd1234-py3-none-any.whl"
        );
    }

    #[test]
    fn test_empty_set() {
        let set = CandidateSet::from_candidates(Vec::new());
        assert!(set.is_empty());
        assert!(set.unvarianted().is_none());
    }
}
