//! Pairs file parsing.

use super::{ImageRef, PairKind, PairList, PairsHeader, VerificationPair};
use crate::error::PairsError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Upper bound on the capacity reserved from the header's pair count
const MAX_PREALLOCATED_PAIRS: usize = 1 << 16;

/// Open and parse a pairs file
pub fn load_pairs(path: &Path) -> Result<PairList, PairsError> {
    let file = File::open(path).map_err(|e| PairsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let pairs = parse_pairs(BufReader::new(file)).map_err(|e| match e {
        PairsError::Io { source, .. } => PairsError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        pairs = pairs.len(),
        matched = pairs.matched(),
        mismatched = pairs.mismatched(),
        "Loaded pairs file"
    );

    Ok(pairs)
}

/// Parse a pairs file from any buffered reader
pub fn parse_pairs<R: BufRead>(reader: R) -> Result<PairList, PairsError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(io_error)?;
                if line.trim().is_empty() {
                    continue;
                }
                break parse_header(&line)?;
            }
            None => return Err(PairsError::Empty),
        }
    };

    let block = header.pairs_per_fold.saturating_mul(2).max(1);
    let mut pairs = Vec::with_capacity(header.expected_pairs().min(MAX_PREALLOCATED_PAIRS));

    for (idx, line) in lines {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }

        let line_number = idx + 1;
        let fold = (pairs.len() / block).min(header.folds.saturating_sub(1));
        pairs.push(parse_pair(&line, line_number, fold)?);
    }

    if pairs.len() != header.expected_pairs() {
        tracing::warn!(
            expected = header.expected_pairs(),
            found = pairs.len(),
            "Pairs file header does not match the number of pairs"
        );
    }

    Ok(PairList { header, pairs })
}

fn io_error(source: std::io::Error) -> PairsError {
    PairsError::Io {
        path: Default::default(),
        source,
    }
}

fn parse_header(line: &str) -> Result<PairsHeader, PairsError> {
    let numbers = line
        .split_whitespace()
        .map(|field| {
            field.parse::<usize>().map_err(|_| PairsError::InvalidHeader {
                reason: format!("'{}' is not a count", field),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let header = match numbers.as_slice() {
        [pairs_per_fold] => PairsHeader {
            folds: 1,
            pairs_per_fold: *pairs_per_fold,
        },
        [folds, pairs_per_fold] if *folds > 0 => PairsHeader {
            folds: *folds,
            pairs_per_fold: *pairs_per_fold,
        },
        [_, _] => {
            return Err(PairsError::InvalidHeader {
                reason: "fold count must be positive".to_string(),
            })
        }
        _ => {
            return Err(PairsError::InvalidHeader {
                reason: format!("expected 1 or 2 counts, found {}", numbers.len()),
            })
        }
    };

    if header.checked_expected_pairs().is_none() {
        return Err(PairsError::InvalidHeader {
            reason: format!(
                "{} folds of {} pairs overflows the pair count",
                header.folds, header.pairs_per_fold
            ),
        });
    }

    Ok(header)
}

fn parse_pair(line: &str, line_number: usize, fold: usize) -> Result<VerificationPair, PairsError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    match fields.as_slice() {
        [name, first, second] => Ok(VerificationPair {
            kind: PairKind::Matched,
            first: ImageRef::new(*name, parse_index(first, line_number)?),
            second: ImageRef::new(*name, parse_index(second, line_number)?),
            fold,
        }),
        [first_name, first, second_name, second] => Ok(VerificationPair {
            kind: PairKind::Mismatched,
            first: ImageRef::new(*first_name, parse_index(first, line_number)?),
            second: ImageRef::new(*second_name, parse_index(second, line_number)?),
            fold,
        }),
        _ => Err(PairsError::FieldCount {
            line: line_number,
            found: fields.len(),
        }),
    }
}

fn parse_index(value: &str, line: usize) -> Result<u32, PairsError> {
    match value.parse::<u32>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(PairsError::InvalidIndex {
            line,
            value: value.to_string(),
        }),
    }
}
