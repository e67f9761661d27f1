use crate::RankedEntry;

pub const CSV_HEADER: &str = "Word,Count";

/// Serializes ranked entries as `Word,Count` CSV, one line per entry.
///
/// Words are written verbatim. A word containing a comma, quote or line
/// break produces a malformed row; see [`has_unescaped_fields`].
pub fn to_csv(rows: &[RankedEntry]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(rows.iter().map(|row| format!("{},{}", row.word, row.count)));
    lines.join("\n")
}

/// Returns true when any word would break the unquoted CSV layout.
pub fn has_unescaped_fields(rows: &[RankedEntry]) -> bool {
    rows.iter()
        .any(|row| row.word.contains(&[',', '"', '\n', '\r'][..]))
}
