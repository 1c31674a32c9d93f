//! Filter predicates that turn a scan into a match set.

use serde::Serialize;

use crate::error::PairError;
use crate::process::record::{sort_records, ProcessRecord, SortField, SortOrder};

/// Active filter predicates. Unset options match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub min_memory_kb: u64,
    pub max_memory_kb: Option<u64>,
    pub min_cpu_ticks: u64,
    pub command: Option<String>,
    pub owner: Option<String>,
}

/// Owner filter: a purely numeric value compares uids, anything else names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    Uid(u32),
    Name(String),
}

impl OwnerFilter {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u32>() {
            Ok(uid) => OwnerFilter::Uid(uid),
            Err(_) => OwnerFilter::Name(value.trim().to_lowercase()),
        }
    }

    pub fn matches(&self, record: &ProcessRecord) -> bool {
        match self {
            OwnerFilter::Uid(uid) => record.uid == *uid,
            OwnerFilter::Name(name) => record.user.to_lowercase() == *name,
        }
    }
}

impl FilterCriteria {
    /// True if the record satisfies every active predicate.
    pub fn matches(&self, record: &ProcessRecord) -> bool {
        self.matches_with(record, self.owner.as_deref().map(OwnerFilter::parse).as_ref())
    }

    fn matches_with(&self, record: &ProcessRecord, owner: Option<&OwnerFilter>) -> bool {
        if record.memory_kb < self.min_memory_kb {
            return false;
        }
        if let Some(max) = self.max_memory_kb {
            if record.memory_kb > max {
                return false;
            }
        }
        if record.cpu_ticks < self.min_cpu_ticks {
            return false;
        }
        if let Some(sub) = self.command.as_deref() {
            if !sub.is_empty() && !record.command.contains(sub) {
                return false;
            }
        }
        if let Some(owner) = owner {
            if !owner.matches(record) {
                return false;
            }
        }
        true
    }
}

/// Records that survived the filters for one scan cycle, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchSet {
    records: Vec<ProcessRecord>,
}

impl MatchSet {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProcessRecord> {
        self.records.get(index)
    }

    pub fn sort(&mut self, field: SortField, order: SortOrder) {
        sort_records(&mut self.records, field, order);
    }

    /// Fails with `InsufficientData` unless at least two records are present.
    pub fn ensure_pairable(&self) -> Result<(), PairError> {
        if self.records.len() < 2 {
            return Err(PairError::InsufficientData {
                found: self.records.len(),
            });
        }
        Ok(())
    }

    pub fn into_records(self) -> Vec<ProcessRecord> {
        self.records
    }
}

/// Applies the criteria to every record, keeping input order.
pub fn filter_records(records: Vec<ProcessRecord>, criteria: &FilterCriteria) -> MatchSet {
    let owner = criteria.owner.as_deref().map(OwnerFilter::parse);
    MatchSet::new(
        records
            .into_iter()
            .filter(|r| criteria.matches_with(r, owner.as_ref()))
            .collect(),
    )
}
