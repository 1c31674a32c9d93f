//! Best-pair search over a match set.
//!
//! The score of a pair is `|Δmemory_kb| + |Δcpu_ticks|`. Kilobytes and ticks
//! are summed as-is, without unit normalisation.
//!
//! The search is an exhaustive nested loop over `i < j`, so it costs O(N²)
//! pair evaluations. This is the dominant cost of a scan cycle and the main
//! scalability limit; it stays exact because the tie-break (first pair in
//! enumeration order wins) is observable.

use serde::Serialize;

use crate::error::PairError;
use crate::process::{MatchSet, ProcessRecord};

/// How the pair was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    Searched {
        evaluated_pairs: u64,
    },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestPairResult {
    pub score: u64,
    pub first: ProcessRecord,
    pub second: ProcessRecord,
    /// Positions of `first` and `second` in the match set.
    pub first_index: usize,
    pub second_index: usize,
    pub selection: Selection,
}

impl BestPairResult {
    pub fn identity(&self) -> PairIdentity {
        PairIdentity {
            first: (self.first.pid, self.first.command.clone()),
            second: (self.second.pid, self.second.command.clone()),
            score: self.score,
        }
    }
}

/// Stable identity of a best pair, compared across monitor cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairIdentity {
    pub first: (u32, String),
    pub second: (u32, String),
    pub score: u64,
}

pub fn pair_score(a: &ProcessRecord, b: &ProcessRecord) -> u64 {
    a.memory_kb
        .abs_diff(b.memory_kb)
        .saturating_add(a.cpu_ticks.abs_diff(b.cpu_ticks))
}

/// Exhaustive search for the pair with the minimal score.
pub fn find_best_pair(set: &MatchSet) -> Result<BestPairResult, PairError> {
    set.ensure_pairable()?;
    let records = set.records();

    let mut best: Option<(u64, usize, usize)> = None;
    let mut evaluated: u64 = 0;

    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            let score = pair_score(&records[i], &records[j]);
            evaluated += 1;
            // Strictly smaller only: ties keep the earlier pair.
            if best.map_or(true, |(s, _, _)| score < s) {
                best = Some((score, i, j));
            }
        }
    }

    let (score, i, j) = best.ok_or(PairError::InsufficientData {
        found: records.len(),
    })?;

    Ok(BestPairResult {
        score,
        first: records[i].clone(),
        second: records[j].clone(),
        first_index: i,
        second_index: j,
        selection: Selection::Searched {
            evaluated_pairs: evaluated,
        },
    })
}

/// Returns the records at the two given indices without searching.
pub fn select_pair(set: &MatchSet, first: usize, second: usize) -> Result<BestPairResult, PairError> {
    let invalid = PairError::InvalidSelection {
        first,
        second,
        len: set.len(),
    };
    if first == second {
        return Err(invalid);
    }
    let (a, b) = match (set.get(first), set.get(second)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(invalid),
    };

    Ok(BestPairResult {
        score: pair_score(a, b),
        first: a.clone(),
        second: b.clone(),
        first_index: first,
        second_index: second,
        selection: Selection::Manual,
    })
}

/// Manual override when given, otherwise the exhaustive search.
pub fn resolve_pair(
    set: &MatchSet,
    manual: Option<(usize, usize)>,
) -> Result<BestPairResult, PairError> {
    match manual {
        Some((first, second)) => select_pair(set, first, second),
        None => find_best_pair(set),
    }
}
