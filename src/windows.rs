use crate::types::Window;

/// Iterator over fixed-size half-open windows of one contig.
///
/// Window `k` covers `[k * window_size, min((k + 1) * window_size, contig_length))`.
/// The last window is truncated at the contig end.
#[derive(Debug, Clone)]
pub struct Windows {
    contig_length: u64,
    window_size: u64,
    next: u64,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.window_size == 0 {
            return None;
        }
        let start = self.next.checked_mul(self.window_size)?;
        if start >= self.contig_length {
            return None;
        }
        let end = start.saturating_add(self.window_size).min(self.contig_length);
        let window = Window {
            index: self.next,
            start,
            end,
        };
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = window_count(self.contig_length, self.window_size).saturating_sub(self.next);
        let n = usize::try_from(remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Windows {}

/// Windows of a contig starting at window index `first`.
///
/// `window_size` must be positive (checked by `ScanConfig::validate`); a zero size yields nothing.
pub fn windows_from(contig_length: u64, window_size: u64, first: u64) -> Windows {
    Windows {
        contig_length,
        window_size,
        next: first,
    }
}

/// Windows of a contig starting at a coordinate offset.
///
/// The offset is rounded down to a window boundary. A contig no longer than the
/// offset produces no windows.
pub fn windows_at(contig_length: u64, window_size: u64, offset: u64) -> Windows {
    let first = if window_size == 0 { 0 } else { offset / window_size };
    windows_from(contig_length, window_size, first)
}

/// Number of windows covering a contig (ceiling division).
pub fn window_count(contig_length: u64, window_size: u64) -> u64 {
    if window_size == 0 {
        0
    } else {
        contig_length.div_ceil(window_size)
    }
}
