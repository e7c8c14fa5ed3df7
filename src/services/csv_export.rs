//! CSV export of a tenant inventory.
//!
//! The table starts with a UTF-8 byte-order mark so spreadsheet tools pick
//! the right encoding, followed by a fixed header row.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::inventory::ExportRow;

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row, in column order.
pub const HEADER: [&str; 4] = ["Filename", "Direct Link", "Upload Date", "File Size"];

/// Label placed between the tenant name and the date in export filenames.
pub const EXPORT_LABEL: &str = "WordPress PDF listing";

// Characters stripped from download filenames.
const UNSAFE_FILENAME_CHARS: &[char] = &[
    '?', '[', ']', '/', '\\', '=', '<', '>', ':', ';', ',', '\'', '"', '&', '$', '#', '*', '(',
    ')', '|', '~', '`', '!', '{', '}', '%', '+', '\u{2019}', '\u{ab}', '\u{bb}', '\u{201d}',
    '\u{201c}',
];

/// Encode rows as a BOM-prefixed CSV table.
///
/// Same rows in the same order always give the same bytes.
pub fn encode(rows: &[ExportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.filename.as_str(),
            row.url.as_str(),
            row.upload_date.as_str(),
            row.file_size.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// Download filename for a tenant export taken on `date`.
pub fn export_filename(tenant_name: &str, date: NaiveDate) -> String {
    sanitize_filename(&format!(
        "{} - {} - {}.csv",
        tenant_name,
        EXPORT_LABEL,
        date.format("%Y-%m-%d")
    ))
}

/// Remove characters that are unsafe in filenames.
///
/// Control and reserved characters are dropped, whitespace runs collapse to a
/// single space, and leading or trailing dots, dashes, underscores and
/// spaces are trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for ch in name.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch.is_control() || UNSAFE_FILENAME_CHARS.contains(&ch) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out.trim_matches(|c: char| matches!(c, '.' | '-' | '_' | ' '))
        .to_string()
}
