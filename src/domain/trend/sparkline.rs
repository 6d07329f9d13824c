//! Compact glyph-per-sample trend rendering.
//!
//! Deterministic for identical input; degrades to a fallback string instead
//! of failing on empty or flat windows.

use crate::shared::types::HistoryEntry;

/// Intensity glyphs, lowest to highest
const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Rendered when every sampled price is equal (includes single-sample windows)
const FLAT_GLYPH: char = '▄';

/// Rendered when the window holds no samples at all
pub const EMPTY_FALLBACK: &str = "(no price history yet)";

/// Most recent samples considered by the sparkline
pub const SPARKLINE_WINDOW: usize = 50;

/// Render the most recent `SPARKLINE_WINDOW` entries as one glyph per sample
pub fn sparkline(entries: &[HistoryEntry]) -> String {
    let skip = entries.len().saturating_sub(SPARKLINE_WINDOW);
    let window = &entries[skip..];

    if window.is_empty() {
        return EMPTY_FALLBACK.to_string();
    }

    let min = window.iter().map(|e| e.price).min().unwrap_or(0);
    let max = window.iter().map(|e| e.price).max().unwrap_or(0);

    if min == max {
        return std::iter::repeat(FLAT_GLYPH).take(window.len()).collect();
    }

    let span = (max - min) as f64;
    window
        .iter()
        .map(|entry| {
            let normalized = (entry.price - min) as f64 / span;
            let index = (normalized * 7.0).round().clamp(0.0, 7.0) as usize;
            GLYPHS[index]
        })
        .collect()
}
