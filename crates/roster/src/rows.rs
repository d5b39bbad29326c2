//! Row filtering and de-duplication.

use std::collections::HashSet;

use tracing::debug;

use crate::IdentityRecord;

/// Build identity records from raw sheet rows.
///
/// The first row is a header and is skipped. Columns 0, 1 and 2 are the
/// ID, name and class label. Rows with a missing or blank value in any of
/// those columns are dropped, as are repeats of an `(id, class)` pair
/// (the first occurrence wins). Input order is preserved.
pub fn records_from_rows<I, R>(rows: I) -> Vec<IdentityRecord>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut records = Vec::new();
    let mut dropped_incomplete = 0usize;
    let mut dropped_duplicate = 0usize;

    for row in rows.into_iter().skip(1) {
        let Some(record) = parse_row(row.as_ref()) else {
            dropped_incomplete += 1;
            continue;
        };

        let key = (record.id.clone(), record.class_label.clone());
        if !seen.insert(key) {
            dropped_duplicate += 1;
            continue;
        }
        records.push(record);
    }

    debug!(
        kept = records.len(),
        dropped_incomplete, dropped_duplicate, "Filtered roster rows"
    );

    records
}

fn parse_row(cells: &[String]) -> Option<IdentityRecord> {
    let cell = |i: usize| -> Option<String> {
        let v = cells.get(i)?.trim();
        if v.is_empty() { None } else { Some(v.to_string()) }
    };

    Some(IdentityRecord {
        id: cell(0)?,
        name: cell(1)?,
        class_label: cell(2)?,
    })
}
