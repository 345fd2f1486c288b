use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::domain::{
    change::{ChangeType, NormalizedChange},
    comparison::{ComparisonResult, Summary, TableSummary},
    value_objects::TableName,
};

// ─── Accumulator ───

/// Running counts for one aggregation pass.
///
/// Each call to [`aggregate`] owns a fresh tally, so several comparisons in
/// one process never share counters.
#[derive(Debug, Default)]
pub(crate) struct ChangeTally {
    summary: Summary,
    tables: Vec<TableSummary>,
    positions: HashMap<String, usize>,
}

impl ChangeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one change. The first change seen for a table fixes that
    /// table's position in the final summary list.
    pub fn record(&mut self, change: &NormalizedChange) {
        let s = &mut self.summary;
        s.total_changes += 1;
        match change.change_type() {
            ChangeType::Insert => s.inserts += 1,
            ChangeType::Update => s.updates += 1,
            ChangeType::Delete => s.deletes += 1,
        }

        let name = change.table().as_str();
        match self.positions.get(name) {
            Some(&pos) => self.tables[pos].count += 1,
            None => {
                self.positions.insert(name.to_string(), self.tables.len());
                self.tables.push(TableSummary {
                    table: TableName(name.to_string()),
                    count: 1,
                });
            }
        }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    fn finish(
        self,
        base_id: String,
        compare_id: String,
        changes: Vec<NormalizedChange>,
    ) -> ComparisonResult {
        ComparisonResult::from_parts(base_id, compare_id, self.summary, self.tables, changes)
    }
}

// ─── Aggregation ───

/// Builds the comparison result in a single pass over `changes`.
///
/// Table summaries come out in first-seen order, not sorted by name or
/// count, so identical engine output always renders identically.
#[instrument(
    name = "aggregate",
    skip_all,
    fields(base = %base_id.as_ref(), compare = %compare_id.as_ref(), changes = changes.len()),
    level = "debug"
)]
pub fn aggregate(
    base_id: impl AsRef<str>,
    compare_id: impl AsRef<str>,
    changes: Vec<NormalizedChange>,
) -> ComparisonResult {
    let mut tally = ChangeTally::new();
    for change in &changes {
        tally.record(change);
    }

    debug!(
        total = tally.summary().total_changes,
        tables = tally.tables.len(),
        "aggregate completed"
    );

    tally.finish(
        base_id.as_ref().to_string(),
        compare_id.as_ref().to_string(),
        changes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::validate;
    use crate::domain::value_objects::Payload;
    use proptest::prelude::*;

    fn change(table: &str, kind: ChangeType) -> NormalizedChange {
        NormalizedChange::try_new(0, table, kind, Payload::new()).unwrap()
    }

    fn table_order(result: &ComparisonResult) -> Vec<(&str, usize)> {
        result
            .table_summaries()
            .iter()
            .map(|t| (t.table.as_str(), t.count))
            .collect()
    }

    #[test]
    fn empty_changes_produce_an_unchanged_result() {
        let result = aggregate("base.gpkg", "compare.gpkg", vec![]);

        assert!(!result.has_changes());
        assert_eq!(result.total_changes(), 0);
        assert!(result.table_summaries().is_empty());
        assert!(result.changes().is_empty());
        assert!(validate(&result));
    }

    #[test]
    fn single_layer_scenario_counts_each_kind() {
        let changes = vec![
            change("my_layer", ChangeType::Insert),
            change("my_layer", ChangeType::Insert),
            change("my_layer", ChangeType::Update),
            change("my_layer", ChangeType::Update),
            change("my_layer", ChangeType::Delete),
        ];

        let result = aggregate("base.gpkg", "compare.gpkg", changes);

        assert!(result.has_changes());
        assert_eq!(
            *result.summary(),
            Summary {
                total_changes: 5,
                inserts: 2,
                updates: 2,
                deletes: 1,
            }
        );
        assert_eq!(table_order(&result), vec![("my_layer", 5)]);
        assert!(validate(&result));
    }

    #[test]
    fn tables_keep_first_seen_order() {
        let changes = vec![
            change("B", ChangeType::Insert),
            change("A", ChangeType::Delete),
            change("B", ChangeType::Update),
            change("A", ChangeType::Insert),
        ];

        let result = aggregate("x", "y", changes);

        assert_eq!(table_order(&result), vec![("B", 2), ("A", 2)]);
    }

    #[test]
    fn order_is_neither_alphabetical_nor_by_count() {
        let changes = vec![
            change("zebra", ChangeType::Insert),
            change("alpha", ChangeType::Insert),
            change("alpha", ChangeType::Insert),
            change("alpha", ChangeType::Insert),
        ];

        let result = aggregate("x", "y", changes);

        assert_eq!(table_order(&result), vec![("zebra", 1), ("alpha", 3)]);
    }

    #[test]
    fn changes_keep_engine_order() {
        let changes = vec![
            change("roads", ChangeType::Delete),
            change("rivers", ChangeType::Insert),
        ];

        let result = aggregate("x", "y", changes.clone());

        assert_eq!(result.changes(), changes.as_slice());
        assert_eq!(result.base_identifier(), "x");
        assert_eq!(result.compare_identifier(), "y");
    }

    #[test]
    fn separate_passes_do_not_share_counts() {
        let first = aggregate("a", "b", vec![change("roads", ChangeType::Insert)]);
        let second = aggregate("a", "b", vec![change("roads", ChangeType::Insert)]);

        assert_eq!(first.total_changes(), 1);
        assert_eq!(second.total_changes(), 1);
    }

    fn arb_change() -> impl Strategy<Value = NormalizedChange> {
        let kind = prop_oneof![
            Just(ChangeType::Insert),
            Just(ChangeType::Update),
            Just(ChangeType::Delete),
        ];
        ("[a-e]", kind).prop_map(|(table, kind)| change(&table, kind))
    }

    proptest! {
        #[test]
        fn aggregate_always_satisfies_invariants(changes in prop::collection::vec(arb_change(), 0..64)) {
            let len = changes.len();
            let result = aggregate("base", "compare", changes);
            let s = result.summary();

            prop_assert!(validate(&result));
            prop_assert_eq!(s.total_changes, s.inserts + s.updates + s.deletes);
            prop_assert_eq!(s.total_changes, len);
            prop_assert_eq!(result.has_changes(), len > 0);
            prop_assert_eq!(
                result.table_summaries().iter().map(|t| t.count).sum::<usize>(),
                s.total_changes
            );
        }

        #[test]
        fn table_summaries_follow_first_appearance(changes in prop::collection::vec(arb_change(), 0..64)) {
            let mut expected: Vec<&str> = Vec::new();
            for c in &changes {
                if !expected.contains(&c.table().as_str()) {
                    expected.push(c.table().as_str());
                }
            }
            let expected: Vec<String> = expected.into_iter().map(str::to_string).collect();

            let result = aggregate("base", "compare", changes);
            let actual: Vec<String> = result
                .table_summaries()
                .iter()
                .map(|t| t.table.0.clone())
                .collect();

            prop_assert_eq!(actual, expected);
        }
    }
}
