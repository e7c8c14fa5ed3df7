//! Column sorting for inventory tables.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

use crate::models::inventory::InventoryEntry;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Filename,
    UploadDate,
    FileSizeRaw,
}

impl SortKey {
    /// Value of the header's `data-sort` attribute.
    pub fn attr(self) -> &'static str {
        match self {
            SortKey::Filename => "filename",
            SortKey::UploadDate => "upload_date",
            SortKey::FileSizeRaw => "file_size_raw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => " \u{25b2}",
            SortDirection::Desc => " \u{25bc}",
        }
    }
}

/// Active sort of one tenant's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// State after a click on `key`.
    ///
    /// Only a click on the active ascending column flips to descending;
    /// anything else sorts ascending. There is no way back to "unsorted".
    pub fn after_click(current: Option<SortState>, key: SortKey) -> SortState {
        let direction = match current {
            Some(state) if state.key == key && state.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        SortState { key, direction }
    }
}

/// Sort entries in place. Descending order is the exact reverse of
/// ascending, ties included, so the result does not depend on the order the
/// rows were in before.
pub fn sort_entries(entries: &mut [InventoryEntry], state: SortState) {
    match state.direction {
        SortDirection::Asc => entries.sort_by(|a, b| compare(a, b, state.key)),
        SortDirection::Desc => entries.sort_by(|a, b| compare(b, a, state.key)),
    }
}

/// Ascending total order on entries by `key`; ties fall back to the id.
pub fn compare(a: &InventoryEntry, b: &InventoryEntry, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Filename => natural_cmp(&a.filename, &b.filename),
        SortKey::UploadDate => parse_timestamp(&a.upload_date).cmp(&parse_timestamp(&b.upload_date)),
        SortKey::FileSizeRaw => a.file_size_raw.cmp(&b.file_size_raw),
    };
    primary
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.filename.cmp(&b.filename))
}

/// Upload timestamps as stored by the host; unparsable values sort first.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Case-insensitive comparison that orders digit runs by numeric value, so
/// "file2" sorts before "file10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks(a);
    let mut right = Chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_chunks(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
    // equal ignoring case and leading zeros
    a.cmp(b)
}

fn compare_chunks(x: &str, y: &str) -> Ordering {
    let x_digits = x.starts_with(|c: char| c.is_ascii_digit());
    let y_digits = y.starts_with(|c: char| c.is_ascii_digit());
    if x_digits && y_digits {
        let x = x.trim_start_matches('0');
        let y = y.trim_start_matches('0');
        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
    } else {
        x.chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase))
    }
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a>(&'a str);

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.0.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(chunk)
    }
}
