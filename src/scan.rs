use crate::accumulator::accumulate_window;
use crate::aggregator::BlockAggregator;
use crate::error::ConfigError;
use crate::output::RowWriter;
use crate::source::VariantSource;
use crate::types::{BlockRow, ResumeState};
use crate::windows::windows_at;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Windows between "Processed N windows" messages
const REPORT_EVERY: u64 = 10_000;

/// Parameters of a gVCF scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Window size in base pairs
    pub window_size: u64,
    /// Number of windows averaged into one output row
    pub averaging_window: u64,
    pub resume: bool,
    pub quiet: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_size: 1000,
            averaging_window: 1000,
            resume: false,
            quiet: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::NonPositiveWindowSize);
        }
        if self.averaging_window == 0 {
            return Err(ConfigError::NonPositiveAveragingWindow);
        }
        Ok(())
    }
}

/// Totals of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub contigs_scanned: u64,
    /// Contigs before the resume point, or with nothing left past the resume offset
    pub contigs_skipped: u64,
    /// Contigs cut short by a fetch error
    pub contigs_abandoned: u64,
    pub windows: u64,
    pub rows: u64,
}

/// Destination for block rows
pub trait RowSink {
    fn write_row(&mut self, row: &BlockRow) -> Result<()>;
}

impl RowSink for RowWriter {
    fn write_row(&mut self, row: &BlockRow) -> Result<()> {
        RowWriter::write_row(self, row)
    }
}

impl RowSink for Vec<BlockRow> {
    fn write_row(&mut self, row: &BlockRow) -> Result<()> {
        self.push(row.clone());
        Ok(())
    }
}

fn make_progress_bar(quiet: bool, len: u64) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("  [{elapsed_precise}/{eta_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}

/// Scan every contig of `source` in declaration order and write one row per block.
///
/// Contigs declared before `resume.contig` are skipped, the resumed contig starts at
/// `resume.start_offset`, and later contigs start at zero. A fetch error abandons the
/// rest of the current contig: the windows already counted are flushed as a partial
/// block and the scan moves on to the next contig.
pub fn scan<S, W>(source: &mut S, sink: &mut W, config: &ScanConfig, resume: &ResumeState) -> Result<ScanSummary>
where
    S: VariantSource + ?Sized,
    W: RowSink + ?Sized,
{
    config.validate()?;
    let quiet = config.quiet;

    let contigs = source.contigs().to_vec();
    let mut agg = BlockAggregator::new(config.averaging_window, resume.running_window_count);
    let mut summary = ScanSummary::default();
    let mut waiting_for = resume.contig.as_deref();

    for contig in &contigs {
        let offset = match waiting_for {
            Some(name) if name != contig.name => {
                summary.contigs_skipped += 1;
                continue;
            }
            Some(_) => {
                waiting_for = None;
                resume.start_offset
            }
            None => 0,
        };

        let windows = windows_at(contig.length, config.window_size, offset);
        if windows.len() == 0 {
            progress!(quiet, "Skipping contig: {} (nothing past offset {})", contig.name, offset);
            summary.contigs_skipped += 1;
            continue;
        }

        progress!(quiet, "Processing contig: {}", contig.name);
        let pb = make_progress_bar(quiet, windows.len() as u64);
        pb.set_message(contig.name.clone());

        let mut contig_windows: u64 = 0;
        let mut abandoned = false;
        for window in windows {
            let result = match accumulate_window(source, &contig.name, window) {
                Ok(r) => r,
                Err(e) => {
                    pb.suspend(|| {
                        eprintln!(
                            "Error fetching records for {}:{}-{}: {}",
                            contig.name, window.start, window.end, e
                        )
                    });
                    abandoned = true;
                    break;
                }
            };

            contig_windows += 1;
            summary.windows += 1;
            pb.inc(1);

            if let Some(row) = agg.push(&contig.name, result) {
                sink.write_row(&row)?;
                summary.rows += 1;
            }

            if contig_windows % REPORT_EVERY == 0 {
                pb.suspend(|| progress!(quiet, "Processed {} windows on contig {}", contig_windows, contig.name));
            }
        }
        pb.finish_and_clear();

        // blocks never span contigs
        if let Some(row) = agg.flush(&contig.name) {
            sink.write_row(&row)?;
            summary.rows += 1;
        }

        if abandoned {
            summary.contigs_abandoned += 1;
            progress!(quiet, "Abandoned contig: {} after {} windows", contig.name, contig_windows);
        } else {
            summary.contigs_scanned += 1;
            progress!(quiet, "Finished processing contig: {}", contig.name);
        }
    }

    if let Some(name) = waiting_for {
        anyhow::bail!(ConfigError::UnknownResumeContig(name.to_string()));
    }
    progress!(quiet, "Windows counted over the whole scan: {}", agg.running_windows());

    Ok(summary)
}
