use std::collections::HashSet;

use crate::domain::change::{ChangeType, NormalizedChange};
use crate::domain::value_objects::TableName;

/// Global change counts. Field order is the rendered order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_changes: usize,
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// Number of changes recorded against one table. Always derived, count >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table: TableName,
    pub count: usize,
}

/// The complete outcome of comparing two files.
///
/// Only the aggregator builds one, and nothing mutates it afterwards:
/// formatters and reporters read it through the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    base_identifier: String,
    compare_identifier: String,
    has_changes: bool,
    summary: Summary,
    table_summaries: Vec<TableSummary>,
    changes: Vec<NormalizedChange>,
}

impl ComparisonResult {
    pub(crate) fn from_parts(
        base_identifier: String,
        compare_identifier: String,
        summary: Summary,
        table_summaries: Vec<TableSummary>,
        changes: Vec<NormalizedChange>,
    ) -> Self {
        Self {
            base_identifier,
            compare_identifier,
            has_changes: summary.total_changes > 0,
            summary,
            table_summaries,
            changes,
        }
    }

    pub fn base_identifier(&self) -> &str {
        &self.base_identifier
    }

    pub fn compare_identifier(&self) -> &str {
        &self.compare_identifier
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn total_changes(&self) -> usize {
        self.summary.total_changes
    }

    pub fn table_summaries(&self) -> &[TableSummary] {
        &self.table_summaries
    }

    pub fn changes(&self) -> &[NormalizedChange] {
        &self.changes
    }

    /// Changes of one kind, in engine order.
    pub fn changes_of(&self, kind: ChangeType) -> impl Iterator<Item = &NormalizedChange> {
        self.changes.iter().filter(move |c| c.change_type() == kind)
    }
}

/// Checks every structural invariant of a [`ComparisonResult`].
///
/// Independent of the aggregator so tests can use it as an oracle.
pub fn validate(result: &ComparisonResult) -> bool {
    let s = &result.summary;

    let counts_agree = s.total_changes == s.inserts + s.updates + s.deletes
        && s.total_changes == result.changes.len();

    let per_kind_agree = s.inserts == result.changes_of(ChangeType::Insert).count()
        && s.updates == result.changes_of(ChangeType::Update).count()
        && s.deletes == result.changes_of(ChangeType::Delete).count();

    let flag_agrees = result.has_changes == (s.total_changes > 0);

    let tables_sum =
        result.table_summaries.iter().map(|t| t.count).sum::<usize>() == s.total_changes;

    let mut seen = HashSet::new();
    let tables_well_formed = result
        .table_summaries
        .iter()
        .all(|t| t.count >= 1 && seen.insert(t.table.as_str()));

    let empty_when_unchanged = s.total_changes > 0
        || (result.table_summaries.is_empty() && result.changes.is_empty());

    counts_agree
        && per_kind_agree
        && flag_agrees
        && tables_sum
        && tables_well_formed
        && empty_when_unchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Payload;

    fn change(table: &str, kind: ChangeType) -> NormalizedChange {
        NormalizedChange::try_new(0, table, kind, Payload::new()).unwrap()
    }

    fn table(name: &str, count: usize) -> TableSummary {
        TableSummary {
            table: TableName(name.to_string()),
            count,
        }
    }

    #[test]
    fn empty_result_is_valid() {
        let result = ComparisonResult::from_parts(
            "a.gpkg".into(),
            "b.gpkg".into(),
            Summary::default(),
            vec![],
            vec![],
        );
        assert!(!result.has_changes());
        assert!(validate(&result));
    }

    #[test]
    fn consistent_result_is_valid() {
        let result = ComparisonResult::from_parts(
            "a".into(),
            "b".into(),
            Summary {
                total_changes: 2,
                inserts: 1,
                updates: 0,
                deletes: 1,
            },
            vec![table("roads", 1), table("rivers", 1)],
            vec![
                change("roads", ChangeType::Insert),
                change("rivers", ChangeType::Delete),
            ],
        );
        assert!(result.has_changes());
        assert!(validate(&result));
    }

    #[test]
    fn mismatched_totals_fail_validation() {
        let result = ComparisonResult::from_parts(
            "a".into(),
            "b".into(),
            Summary {
                total_changes: 2,
                inserts: 1,
                updates: 0,
                deletes: 0,
            },
            vec![table("roads", 2)],
            vec![
                change("roads", ChangeType::Insert),
                change("roads", ChangeType::Insert),
            ],
        );
        assert!(!validate(&result));
    }

    #[test]
    fn duplicate_table_summaries_fail_validation() {
        let result = ComparisonResult::from_parts(
            "a".into(),
            "b".into(),
            Summary {
                total_changes: 2,
                inserts: 2,
                updates: 0,
                deletes: 0,
            },
            vec![table("roads", 1), table("roads", 1)],
            vec![
                change("roads", ChangeType::Insert),
                change("roads", ChangeType::Insert),
            ],
        );
        assert!(!validate(&result));
    }

    #[test]
    fn zero_count_table_summary_fails_validation() {
        let result = ComparisonResult::from_parts(
            "a".into(),
            "b".into(),
            Summary {
                total_changes: 1,
                inserts: 0,
                updates: 1,
                deletes: 0,
            },
            vec![table("roads", 1), table("rivers", 0)],
            vec![change("roads", ChangeType::Update)],
        );
        assert!(!validate(&result));
    }

    #[test]
    fn per_kind_counts_must_match_the_changes() {
        let result = ComparisonResult::from_parts(
            "a".into(),
            "b".into(),
            Summary {
                total_changes: 1,
                inserts: 1,
                updates: 0,
                deletes: 0,
            },
            vec![table("roads", 1)],
            vec![change("roads", ChangeType::Delete)],
        );
        assert!(!validate(&result));
    }
}
