//! # Pairs Module
//!
//! The LFW verification pair list.
//!
//! ## File Format
//! The first line is a header: `N` for a single fold (`pairsDevTest.txt`)
//! or `F N` for F folds (`pairs.txt`). Each fold holds N matched pairs
//! followed by N mismatched pairs, one per line, tab-separated:
//! - matched: `name idx1 idx2`
//! - mismatched: `name1 idx1 name2 idx2`

mod parser;

pub use parser::{load_pairs, parse_pairs};

use serde::{Deserialize, Serialize};

/// Whether both images of a pair show the same person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    /// Same identity
    Matched,
    /// Different identities
    Mismatched,
}

impl std::fmt::Display for PairKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairKind::Matched => write!(f, "matched"),
            PairKind::Mismatched => write!(f, "mismatched"),
        }
    }
}

/// One image in the dataset, identified by person name and 1-based index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageRef {
    pub identity: String,
    pub index: u32,
}

impl ImageRef {
    pub fn new(identity: impl Into<String>, index: u32) -> Self {
        Self {
            identity: identity.into(),
            index,
        }
    }

    /// File name inside the identity directory, e.g. `Abel_Pacheco_0001.jpg`
    pub fn file_name(&self) -> String {
        format!("{}_{:04}.jpg", self.identity, self.index)
    }
}

/// A pair of images to verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPair {
    pub kind: PairKind,
    pub first: ImageRef,
    pub second: ImageRef,
    /// Cross-validation fold this pair belongs to
    pub fold: usize,
}

/// Parsed header line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairsHeader {
    pub folds: usize,
    pub pairs_per_fold: usize,
}

impl PairsHeader {
    /// Number of pair lines the header announces, saturating at `usize::MAX`
    pub fn expected_pairs(&self) -> usize {
        self.checked_expected_pairs().unwrap_or(usize::MAX)
    }

    /// Number of pair lines the header announces, or `None` on overflow
    pub fn checked_expected_pairs(&self) -> Option<usize> {
        self.folds.checked_mul(self.pairs_per_fold)?.checked_mul(2)
    }
}

/// All pairs of a pairs file, in file order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairList {
    pub header: PairsHeader,
    pub pairs: Vec<VerificationPair>,
}

impl PairList {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn matched(&self) -> usize {
        self.count(PairKind::Matched)
    }

    pub fn mismatched(&self) -> usize {
        self.count(PairKind::Mismatched)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerificationPair> {
        self.pairs.iter()
    }

    fn count(&self, kind: PairKind) -> usize {
        self.pairs.iter().filter(|p| p.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_pads_index_to_four_digits() {
        assert_eq!(
            ImageRef::new("Abel_Pacheco", 1).file_name(),
            "Abel_Pacheco_0001.jpg"
        );
        assert_eq!(
            ImageRef::new("George_W_Bush", 530).file_name(),
            "George_W_Bush_0530.jpg"
        );
    }

    #[test]
    fn header_expected_pairs() {
        let dev_test = PairsHeader {
            folds: 1,
            pairs_per_fold: 500,
        };
        let full = PairsHeader {
            folds: 10,
            pairs_per_fold: 300,
        };
        assert_eq!(dev_test.expected_pairs(), 1000);
        assert_eq!(full.expected_pairs(), 6000);
    }

    #[test]
    fn header_overflow_is_detected() {
        let header = PairsHeader {
            folds: 3,
            pairs_per_fold: usize::MAX / 2,
        };
        assert_eq!(header.checked_expected_pairs(), None);
        assert_eq!(header.expected_pairs(), usize::MAX);
    }

    #[test]
    fn pair_kind_display() {
        assert_eq!(PairKind::Matched.to_string(), "matched");
        assert_eq!(PairKind::Mismatched.to_string(), "mismatched");
    }
}
