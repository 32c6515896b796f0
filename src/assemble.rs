//! Table assembly: partition routing, per-partition ordering and merging.

use std::cmp::Ordering;

use log::{debug, info};

use crate::{
    data::Value,
    profile::{Partition, SortKey},
    schema::{CanonicalRow, CanonicalTable},
};

fn sort_text(value: Option<Value>, case_insensitive: bool) -> Option<String> {
    value.map(|v| {
        let text = v.as_display();
        if case_insensitive {
            text.to_lowercase()
        } else {
            text
        }
    })
}

/// Orders rows by the given keys; empty cells sort after every value.
pub fn compare_rows(a: &CanonicalRow, b: &CanonicalRow, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = sort_text(a.value(key.column), key.case_insensitive);
        let right = sort_text(b.value(key.column), key.case_insensitive);
        let ordering = match (left, right) {
            (Some(l), Some(r)) => l.cmp(&r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable sort in place.
pub fn sort_rows(rows: &mut [CanonicalRow], keys: &[SortKey]) {
    if !keys.is_empty() {
        rows.sort_by(|a, b| compare_rows(a, b, keys));
    }
}

/// Routes each row to the first partition whose zone matches, sorts every
/// partition by its own keys and concatenates them in declaration order.
pub fn assemble(rows: Vec<CanonicalRow>, partitions: &[Partition]) -> CanonicalTable {
    let mut buckets: Vec<Vec<CanonicalRow>> = vec![Vec::new(); partitions.len()];
    for row in rows {
        match partitions
            .iter()
            .position(|p| p.matches(row.zone.as_deref()))
        {
            Some(index) => buckets[index].push(row),
            None => debug!("Dropping row for zone {:?}: no partition", row.zone),
        }
    }

    let mut ordered = Vec::new();
    for (partition, mut bucket) in partitions.iter().zip(buckets) {
        sort_rows(&mut bucket, &partition.sort);
        ordered.extend(bucket);
    }
    CanonicalTable::new(ordered)
}

/// Concatenates several tables and stably re-sorts them with `keys`.
pub fn merge(tables: Vec<CanonicalTable>, keys: &[SortKey]) -> CanonicalTable {
    let count = tables.len();
    let mut rows: Vec<CanonicalRow> = tables.into_iter().flat_map(|t| t.rows).collect();
    sort_rows(&mut rows, keys);
    info!("Merged {count} table(s) into {} row(s)", rows.len());
    CanonicalTable::new(rows)
}
