use crate::file_node::Size;
use chrono::{DateTime, Local};
use number_prefix::NumberPrefix;

pub fn format_size(size: u64) -> String {
    match NumberPrefix::binary(size as f64) {
        NumberPrefix::Standalone(bytes) => format!("{} B", bytes),
        NumberPrefix::Prefixed(prefix, n) => format!("{:.1} {}B", n, prefix),
    }
}

/// Like `format_size`, with `?` for unknown sizes and `+` for partial totals
pub fn format_measured(size: Size) -> String {
    match size {
        Size::Exact(bytes) => format_size(bytes),
        Size::Partial(bytes) => format!("{}+", format_size(bytes)),
        Size::Unknown => "?".to_string(),
    }
}

/// Local date for a creation timestamp in seconds since the epoch
pub fn format_created(created: Option<f64>) -> String {
    created
        .and_then(|secs| DateTime::from_timestamp(secs.trunc() as i64, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render a progress bar using Unicode block characters (1/8 to 8/8 precision)
pub fn render_bar(percent: f64, width: usize) -> String {
    const PARTIAL_CHARS: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];

    let fraction = percent / 100.0 * width as f64;
    let full_blocks = fraction.floor() as usize;
    let partial = ((fraction - full_blocks as f64) * 8.0).round() as usize;

    let mut bar = "█".repeat(full_blocks.min(width));
    if full_blocks < width
        && partial > 0
        && let Some(c) = PARTIAL_CHARS.get((partial - 1).min(6))
    {
        bar.push(*c);
    }
    bar
}
