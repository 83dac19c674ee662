use crate::types::{BlockRow, WindowResult};

/// Groups consecutive window results into reporting blocks.
///
/// A block is flushed when it holds `averaging_window` windows, or early when the
/// caller ends a contig. Block numbers come from the running window counter:
/// `running_windows / averaging_window` at flush time. A short block at the end of a
/// contig can therefore repeat the number of the block before it.
#[derive(Debug, Clone)]
pub struct BlockAggregator {
    averaging_window: u64,
    running_windows: u64,
    windows: u64,
    length_sum: u64,
    het_sum: u64,
    valid_sum: u64,
}

impl BlockAggregator {
    /// `running_windows` seeds the counter when resuming; pass 0 for a fresh scan.
    pub fn new(averaging_window: u64, running_windows: u64) -> Self {
        Self {
            averaging_window: averaging_window.max(1),
            running_windows,
            windows: 0,
            length_sum: 0,
            het_sum: 0,
            valid_sum: 0,
        }
    }

    /// Windows processed over the whole scan, including any resumed count
    pub fn running_windows(&self) -> u64 {
        self.running_windows
    }

    /// Add one window. Returns a row when the block is full.
    pub fn push(&mut self, contig: &str, result: WindowResult) -> Option<BlockRow> {
        self.running_windows += 1;
        self.windows += 1;
        self.length_sum += result.length;
        self.het_sum += result.heterozygous_count;
        self.valid_sum += result.valid_site_count;

        if self.windows == self.averaging_window {
            self.flush(contig)
        } else {
            None
        }
    }

    /// Emit the current block, whatever its size, and reset. `None` if it is empty.
    pub fn flush(&mut self, contig: &str) -> Option<BlockRow> {
        if self.windows == 0 {
            return None;
        }

        let n = self.windows as f64;
        let avg_proportion_heterozygous = if self.length_sum > 0 {
            self.het_sum as f64 / self.length_sum as f64
        } else {
            0.0
        };
        let row = BlockRow {
            contig: contig.to_string(),
            avg_window_length: self.length_sum as f64 / n,
            avg_heterozygous_count: self.het_sum as f64 / n,
            block_number: self.running_windows / self.averaging_window,
            avg_proportion_heterozygous,
            windows: self.windows,
            valid_sites: self.valid_sum,
        };

        self.windows = 0;
        self.length_sum = 0;
        self.het_sum = 0;
        self.valid_sum = 0;

        Some(row)
    }
}
