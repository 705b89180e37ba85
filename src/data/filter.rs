use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Column, Record, SalaryDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column → set of allowed values.
/// An absent column is unconstrained; an empty set matches nothing.
pub type FilterSelection = BTreeMap<Column, BTreeSet<CellValue>>;

/// Initialise a [`FilterSelection`] with every sidebar value selected.
pub fn init_filter_selection(dataset: &SalaryDataset) -> FilterSelection {
    Column::SIDEBAR
        .iter()
        .map(|col| {
            let values = dataset.unique_values.get(col).cloned().unwrap_or_default();
            (*col, values)
        })
        .collect()
}

/// Whether a single record satisfies every constraint in `selection`.
pub fn matches(record: &Record, selection: &FilterSelection) -> bool {
    Constraints::new(selection).admits(record)
}

/// Allowed values of one column, keyed by what the record stores so rows
/// are checked without building a `CellValue` each.
enum Allowed<'s> {
    Years(BTreeSet<i64>),
    Text(BTreeSet<&'s str>),
}

/// A selection prepared for checking many records.
struct Constraints<'s> {
    columns: Vec<(Column, Allowed<'s>)>,
}

impl<'s> Constraints<'s> {
    fn new(entries: impl IntoIterator<Item = (&'s Column, &'s BTreeSet<CellValue>)>) -> Self {
        let columns = entries
            .into_iter()
            .map(|(&column, values)| {
                let allowed = match column {
                    Column::WorkYear => Allowed::Years(
                        values
                            .iter()
                            .filter_map(|v| match v {
                                CellValue::Integer(y) => Some(*y),
                                CellValue::Text(_) => None,
                            })
                            .collect(),
                    ),
                    _ => Allowed::Text(
                        values
                            .iter()
                            .filter_map(|v| match v {
                                CellValue::Text(t) => Some(t.as_str()),
                                CellValue::Integer(_) => None,
                            })
                            .collect(),
                    ),
                };
                (column, allowed)
            })
            .collect();
        Self { columns }
    }

    /// An empty allowed set admits nothing.
    fn admits(&self, record: &Record) -> bool {
        self.columns.iter().all(|(column, allowed)| match allowed {
            Allowed::Years(years) => years.contains(&record.work_year),
            Allowed::Text(values) => values.contains(record.text(*column)),
        })
    }
}

// ---------------------------------------------------------------------------
// FilteredTable – borrowed view of the passing rows
// ---------------------------------------------------------------------------

/// Records of a dataset passing all active filters, in source order.
#[derive(Debug, Clone)]
pub struct FilteredTable<'a> {
    dataset: &'a SalaryDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredTable<'a> {
    /// The whole dataset, unfiltered.
    #[cfg(test)]
    pub(crate) fn all(dataset: &'a SalaryDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the passing records in the underlying dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    /// Narrow further to records whose `column` equals `value`.
    pub fn narrow(&self, column: Column, value: &CellValue) -> FilteredTable<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| self.dataset.records[i].holds(column, value))
            .collect();
        FilteredTable {
            dataset: self.dataset,
            indices,
        }
    }
}

/// Return the records that pass all active filters.
///
/// A record passes a column filter when:
/// * The column is not present in `selection` → passes (no constraint)
/// * The allowed set for that column is empty → nothing selected → fails
/// * The record's value for that column is in the allowed set → passes
pub fn filter<'a>(dataset: &'a SalaryDataset, selection: &FilterSelection) -> FilteredTable<'a> {
    // Columns with every value selected constrain nothing; skip their lookups.
    let constraints = Constraints::new(selection.iter().filter(|(col, allowed)| {
        match dataset.unique_values.get(*col) {
            Some(all_vals) => allowed.is_empty() || !all_vals.is_subset(allowed),
            None => true,
        }
    }));

    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| constraints.admits(r))
        .map(|(i, _)| i)
        .collect();

    FilteredTable { dataset, indices }
}
