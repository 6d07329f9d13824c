//! Axis-labeled ASCII line graph over a history window.
//!
//! Pure and deterministic; returns an explicit fallback string instead of a
//! malformed graph when there is not enough data to draw a line.

use crate::shared::types::HistoryEntry;

/// Returned for windows with fewer than two samples
pub const INSUFFICIENT_DATA_FALLBACK: &str = "(not enough samples to graph)";

const MARKER: char = '•';
const TIME_LABEL_FORMAT: &str = "%m-%d %H:%M";

/// Fixed-size price/time chart renderer
#[derive(Debug, Clone, Copy)]
pub struct LineGraph {
    /// Plot rows, top row = window max
    pub height: usize,
    /// Plot columns = samples shown, most recent last
    pub width: usize,
}

impl Default for LineGraph {
    fn default() -> Self {
        Self { height: 10, width: 40 }
    }
}

impl LineGraph {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height: height.max(2),
            width: width.max(2),
        }
    }

    /// Render the most recent `width` entries; requires at least 2 samples
    pub fn render(&self, entries: &[HistoryEntry]) -> String {
        let skip = entries.len().saturating_sub(self.width);
        let window = &entries[skip..];

        if window.len() < 2 {
            return INSUFFICIENT_DATA_FALLBACK.to_string();
        }

        let min = window.iter().map(|e| e.price).min().unwrap_or(0);
        let max = window.iter().map(|e| e.price).max().unwrap_or(0);
        let span = (max - min) as f64;
        let row_step = span / (self.height - 1) as f64;

        // Row index per sample: nearest row, i.e. within half a row-step
        let sample_rows: Vec<usize> = window
            .iter()
            .map(|entry| {
                if span == 0.0 {
                    self.height / 2
                } else {
                    (((max - entry.price) as f64) / row_step).round() as usize
                }
            })
            .collect();

        let mut lines = Vec::with_capacity(self.height + 2);
        for row in 0..self.height {
            let row_value = if span == 0.0 {
                max as f64
            } else {
                max as f64 - row as f64 * row_step
            };

            let mut plot = String::with_capacity(window.len());
            for sample_row in &sample_rows {
                plot.push(if *sample_row == row { MARKER } else { ' ' });
            }
            lines.push(format!("{:>6} ┤{}", row_value.round() as u32, plot));
        }

        // Baseline axis aligned under the plot area
        lines.push(format!("{}└{}", " ".repeat(7), "─".repeat(window.len())));

        // Chronological start/end labels beneath the axis
        let start = window[0].timestamp.format(TIME_LABEL_FORMAT).to_string();
        let end = window[window.len() - 1]
            .timestamp
            .format(TIME_LABEL_FORMAT)
            .to_string();
        let gap = window.len().saturating_sub(start.chars().count() + end.chars().count());
        lines.push(format!("{}{}{}{}", " ".repeat(8), start, " ".repeat(gap.max(1)), end));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entries(prices: &[u32]) -> Vec<HistoryEntry> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| HistoryEntry {
                price,
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_too_few_samples_falls_back() {
        let graph = LineGraph::default();
        assert_eq!(graph.render(&[]), INSUFFICIENT_DATA_FALLBACK);
        assert_eq!(graph.render(&entries(&[7000])), INSUFFICIENT_DATA_FALLBACK);
    }

    #[test]
    fn test_extremes_land_on_top_and_bottom_rows() {
        let graph = LineGraph::default();
        let rendered = graph.render(&entries(&[5000, 10000]));
        let lines: Vec<&str> = rendered.lines().collect();

        // height rows + baseline + time labels
        assert_eq!(lines.len(), graph.height + 2);

        // max sample (column 1) on the top row, min sample (column 0) on the
        // bottom plot row
        assert_eq!(lines[0].chars().nth(9), Some(MARKER));
        assert_eq!(lines[graph.height - 1].chars().nth(8), Some(MARKER));

        assert!(lines[0].starts_with(" 10000 ┤"));
        assert!(lines[graph.height - 1].starts_with("  5000 ┤"));
        assert!(lines[graph.height].contains('└'));
    }

    #[test]
    fn test_every_sample_gets_exactly_one_marker() {
        let graph = LineGraph::default();
        let samples = entries(&[6300, 7000, 7300, 8000, 6300]);
        let rendered = graph.render(&samples);
        let markers = rendered.chars().filter(|c| *c == MARKER).count();
        assert_eq!(markers, samples.len());
    }

    #[test]
    fn test_window_is_capped_at_width() {
        let graph = LineGraph::default();
        let prices: Vec<u32> = (0..60).map(|i| 5000 + (i % 7) * 300).collect();
        let rendered = graph.render(&entries(&prices));
        let markers = rendered.chars().filter(|c| *c == MARKER).count();
        assert_eq!(markers, graph.width);
    }

    #[test]
    fn test_flat_data_renders_on_middle_row() {
        let graph = LineGraph::default();
        let rendered = graph.render(&entries(&[7000, 7000, 7000]));
        let lines: Vec<&str> = rendered.lines().collect();
        let middle = graph.height / 2;
        assert_eq!(lines[middle].chars().filter(|c| *c == MARKER).count(), 3);
    }

    #[test]
    fn test_custom_dimensions() {
        let graph = LineGraph::new(4, 10);
        let prices: Vec<u32> = (0..20).map(|i| 6000 + i * 100).collect();
        let rendered = graph.render(&entries(&prices));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4 + 2);
        let markers = rendered.chars().filter(|c| *c == MARKER).count();
        assert_eq!(markers, 10);
    }

    #[test]
    fn test_render_is_deterministic() {
        let graph = LineGraph::default();
        let samples = entries(&[6300, 7200, 6800, 7500]);
        assert_eq!(graph.render(&samples), graph.render(&samples));
    }

    #[test]
    fn test_time_labels_are_chronological() {
        let graph = LineGraph::default();
        let rendered = graph.render(&entries(&[6300, 7000]));
        let label_line = rendered.lines().last().unwrap();
        // 1_700_000_000 = 2023-11-14 22:13:20 UTC; second sample one hour on
        assert!(label_line.contains("11-14 22:13"));
        assert!(label_line.contains("11-14 23:13"));
    }
}
