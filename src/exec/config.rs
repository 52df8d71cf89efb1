//! Translator configuration

/// Per-translator tunables, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Mutations queued per batch-writer flush
    pub batch_size: usize,
    /// Partition scans opened per read; 1 disables partitioning
    pub scan_partitions: usize,
}

impl TranslatorConfig {
    /// Creates a config, clamping both knobs to at least 1.
    pub fn new(batch_size: usize, scan_partitions: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            scan_partitions: scan_partitions.max(1),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 2048,
            scan_partitions: 1,
        }
    }
}
