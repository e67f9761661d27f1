use histogram_core::{HistogramViewModel, RankedEntry, Status};

use super::constants::{BAR_GLYPH, BAR_WIDTH, MAX_LABEL_CHARS};

/// Renders the whole screen as lines of text.
pub fn render(view: &HistogramViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Word Frequency Histogram: {}", view.source_url));
    lines.push(status_line(view));

    if view.can_export {
        lines.push(format!(
            "Tokens: {} | Distinct: {} | Showing top {} | Fetched: {}",
            format_with_commas(view.total_tokens as u64),
            format_with_commas(view.distinct_tokens as u64),
            view.rows.len(),
            view.fetched_utc.as_deref().unwrap_or("-")
        ));
        lines.push(String::new());
        if view.rows.is_empty() {
            lines.push("No data".to_string());
        } else {
            lines.extend(chart_lines(&view.rows, view.max_count()));
        }
        lines.push(String::new());
        lines.push("[submit] [export]".to_string());
    } else {
        lines.push("[submit]".to_string());
    }
    lines
}

fn status_line(view: &HistogramViewModel) -> String {
    let status = match &view.status {
        Status::Idle => "Idle".to_string(),
        Status::Fetching => "Fetching...".to_string(),
        Status::Ready => "Ready".to_string(),
        Status::FetchFailed { reason } => format!("Fetch failed: {reason}"),
        Status::InvalidUrl { input } => format!("Invalid URL: {input:?}"),
        Status::Exported { path } => format!("Exported to {path}"),
        Status::ExportFailed { reason } => format!("Export failed: {reason}"),
    };
    let mut line = format!("Status: {status} | Top K: {}", view.top_k);
    if view.in_flight {
        let received = view.received_bytes.unwrap_or(0);
        line.push_str(&format!(" | Received: {} bytes", format_with_commas(received)));
    }
    line
}

/// One horizontal bar per row, in row order, scaled to `max_count`.
fn chart_lines(rows: &[RankedEntry], max_count: u32) -> Vec<String> {
    let labels: Vec<String> = rows.iter().map(|row| truncate_label(&row.word)).collect();
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let count_width = max_count.to_string().len();

    rows.iter()
        .zip(labels)
        .map(|(row, label)| {
            let pad = label_width - label.chars().count();
            format!(
                "{label}{spaces} | {count:>count_width$} {bar}",
                spaces = " ".repeat(pad),
                count = row.count,
                bar = BAR_GLYPH.repeat(bar_len(row.count, max_count)),
            )
        })
        .collect()
}

fn bar_len(count: u32, max_count: u32) -> usize {
    if max_count == 0 {
        return 0;
    }
    let scaled = (u64::from(count) * BAR_WIDTH as u64).div_ceil(u64::from(max_count));
    scaled as usize
}

fn truncate_label(word: &str) -> String {
    if word.chars().count() <= MAX_LABEL_CHARS {
        return word.to_string();
    }
    let mut label: String = word.chars().take(MAX_LABEL_CHARS - 1).collect();
    label.push('…');
    label
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
