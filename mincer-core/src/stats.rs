//! Compression statistics

use crate::config::HtmlCompressorConfig;
use crate::placeholder::{BlockStore, Category};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Size measurements of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HtmlMetrics {
    /// Document length in bytes
    pub filesize: usize,
    /// Whitespace characters in the document
    pub empty_chars: usize,
    /// Summed length of all inline `<script>` blocks
    pub inline_script_size: usize,
    /// Summed length of all inline `<style>` blocks
    pub inline_style_size: usize,
    /// Summed length of all inline event handler values
    pub inline_event_size: usize,
}

impl HtmlMetrics {
    fn document(document: &str) -> Self {
        Self {
            filesize: document.len(),
            empty_chars: document.chars().filter(|c| c.is_whitespace()).count(),
            ..Self::default()
        }
    }

    fn inline_sizes(&mut self, store: &BlockStore) {
        self.inline_script_size = store.size(Category::Script);
        self.inline_style_size = store.size(Category::Style);
        self.inline_event_size = store.size(Category::Event);
    }
}

/// Before/after record of one `compress` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompressionStatistics {
    pub original_metrics: HtmlMetrics,
    pub compressed_metrics: HtmlMetrics,
    /// Bytes kept verbatim in protected blocks
    pub preserved_size: usize,
    /// Wall time of the call
    pub time: Duration,
}

impl CompressionStatistics {
    /// Size reduction as a percentage of the original size.
    pub fn savings_percent(&self) -> f64 {
        let original = self.original_metrics.filesize;
        if original == 0 {
            return 0.0;
        }
        let saved = original.saturating_sub(self.compressed_metrics.filesize);
        saved as f64 * 100.0 / original as f64
    }
}

impl fmt::Display for CompressionStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("File size", self.original_metrics.filesize, self.compressed_metrics.filesize),
            ("Empty chars", self.original_metrics.empty_chars, self.compressed_metrics.empty_chars),
            (
                "Inline scripts",
                self.original_metrics.inline_script_size,
                self.compressed_metrics.inline_script_size,
            ),
            (
                "Inline styles",
                self.original_metrics.inline_style_size,
                self.compressed_metrics.inline_style_size,
            ),
            (
                "Inline events",
                self.original_metrics.inline_event_size,
                self.compressed_metrics.inline_event_size,
            ),
        ];

        writeln!(f, "{:<16}{:>12}{:>12}", "", "Original", "Compressed")?;
        for (label, original, compressed) in rows {
            writeln!(f, "{:<16}{:>12}{:>12}", label, original, compressed)?;
        }
        writeln!(f, "{:<16}{:>12}", "Preserved", self.preserved_size)?;
        writeln!(f, "{:<16}{:>11.2}%", "Savings", self.savings_percent())?;
        write!(f, "{:<16}{:>10}ms", "Time", self.time.as_millis())
    }
}

/// Collects a [`CompressionStatistics`] across the stages of one call.
pub(crate) struct Recorder {
    started: Instant,
    statistics: CompressionStatistics,
}

impl Recorder {
    pub(crate) fn start(document: &str) -> Self {
        Self {
            started: Instant::now(),
            statistics: CompressionStatistics {
                original_metrics: HtmlMetrics::document(document),
                ..CompressionStatistics::default()
            },
        }
    }

    /// Block sizes right after extraction.
    pub(crate) fn extracted(&mut self, store: &BlockStore) {
        self.statistics.original_metrics.inline_sizes(store);
    }

    /// Block sizes after minification, plus everything that stayed verbatim.
    pub(crate) fn processed(&mut self, store: &BlockStore, config: &HtmlCompressorConfig) {
        self.statistics.compressed_metrics.inline_sizes(store);

        let mut preserved: usize = store
            .categories()
            .filter(|category| {
                !matches!(
                    category,
                    Category::Script | Category::Style | Category::Event | Category::Percent
                )
            })
            .map(|category| store.size(category))
            .sum();

        if !config.compress_javascript {
            preserved += store.size(Category::Script);
        }
        if !config.compress_css {
            preserved += store.size(Category::Style);
        }
        if !config.remove_javascript_protocol {
            preserved += store.size(Category::Event);
        }
        self.statistics.preserved_size = preserved;
    }

    pub(crate) fn finish(mut self, output: &str) -> CompressionStatistics {
        let inline = self.statistics.compressed_metrics;
        self.statistics.compressed_metrics = HtmlMetrics {
            inline_script_size: inline.inline_script_size,
            inline_style_size: inline.inline_style_size,
            inline_event_size: inline.inline_event_size,
            ..HtmlMetrics::document(output)
        };
        self.statistics.time = self.started.elapsed();
        self.statistics
    }
}
