//! Greedy word wrap against the static font-metric tables.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than the given widths (in points).
///
/// `first_width` applies to the first line only (for text that follows an
/// inline label); every later line uses `width`. Words wider than a whole line
/// are split by character. Whitespace-only text returns no lines.
pub fn wrap_lines(
    text: &str,
    metrics: &FontMetricTable,
    font_size: f32,
    first_width: f32,
    width: f32,
) -> Vec<String> {
    let space_w = metrics.space_width * font_size;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    let limit = |lines: &Vec<String>| if lines.is_empty() { first_width } else { width };

    for word in text.split_whitespace() {
        let word_w = metrics.width_pt(word, font_size);
        let space = if current.is_empty() { 0.0 } else { space_w };

        if current_width + space + word_w <= limit(&lines) {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width += space + word_w;
            continue;
        }

        // Word does not fit on the current line.
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if word_w <= limit(&lines) {
            current.push_str(word);
            current_width = word_w;
        } else {
            for ch in word.chars() {
                let ch_w = metrics.width_pt(ch.encode_utf8(&mut [0; 4]), font_size);
                if !current.is_empty() && current_width + ch_w > limit(&lines) {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += ch_w;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
