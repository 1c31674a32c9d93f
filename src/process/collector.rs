//! Scan + filter + sort, producing the match set for one cycle.

use tracing::debug;

use crate::error::PairError;
use crate::process::filter::{filter_records, FilterCriteria, MatchSet};
use crate::process::record::{SortField, SortOrder};
use crate::process::scanner::RecordSource;

pub struct ProcessCollector<'a> {
    source: &'a dyn RecordSource,
    criteria: FilterCriteria,
    sort_field: SortField,
    sort_order: SortOrder,
}

impl<'a> ProcessCollector<'a> {
    pub fn new(source: &'a dyn RecordSource, criteria: FilterCriteria) -> Self {
        Self {
            source,
            criteria,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Filtered and sorted records, with no minimum size.
    pub fn collect_matches(&self) -> MatchSet {
        let report = self.source.scan();
        let scanned = report.records.len();
        let mut set = filter_records(report.records, &self.criteria);
        set.sort(self.sort_field, self.sort_order);
        debug!(
            "Scan: {} parsed, {} vanished, {} unreadable, {} matched",
            scanned,
            report.vanished,
            report.unreadable,
            set.len()
        );
        set
    }

    /// Like `collect_matches`, but requires at least two records.
    pub fn collect(&self) -> Result<MatchSet, PairError> {
        let set = self.collect_matches();
        set.ensure_pairable()?;
        Ok(set)
    }
}
