use crate::error::{ConfigError, ResumeError};
use crate::types::{Contig, ResumeState};
use crate::windows::window_count;
use anyhow::Result;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// What the last line of a previous output file holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastRow {
    /// No file, or an empty one
    Missing,
    /// Only the header was written
    HeaderOnly,
    Row { contig: String, block_number: u64 },
}

/// Read the last non-empty line of a block table.
pub fn read_last_row(path: &Path) -> Result<LastRow, ResumeError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LastRow::Missing),
        Err(e) => return Err(e.into()),
    };
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut last: Option<ByteRecord> = None;
    let mut record = ByteRecord::new();
    while rdr.read_byte_record(&mut record)? {
        last = Some(record.clone());
    }

    let Some(last) = last else {
        return Ok(LastRow::Missing);
    };
    parse_row(&last)
}

fn parse_row(record: &ByteRecord) -> Result<LastRow, ResumeError> {
    let line = || {
        record
            .iter()
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join("\t")
    };

    let contig = record
        .get(0)
        .map(|c| String::from_utf8_lossy(c).trim().to_string())
        .unwrap_or_default();
    if contig.starts_with("Contig") {
        return Ok(LastRow::HeaderOnly);
    }
    if contig.is_empty() || record.len() < 5 {
        return Err(ResumeError::Malformed(line()));
    }

    let block_number = std::str::from_utf8(&record[3])
        .ok()
        .and_then(|b| b.trim().parse::<u64>().ok())
        .ok_or_else(|| ResumeError::Malformed(line()))?;

    Ok(LastRow::Row { contig, block_number })
}

/// Resume position after the block `block_number` was flushed on `contig`.
///
/// Blocks restart at every contig but are numbered from the whole-scan window counter,
/// so full block `j` of `contig` carries the number `preceding / averaging_window + j`,
/// where `preceding` counts the windows of the contigs declared before it. Scanning
/// restarts after block `j`; on the first contig the offset is
/// `block_number * averaging_window * window_size`.
pub fn resume_from(
    contigs: &[Contig],
    contig: &str,
    block_number: u64,
    window_size: u64,
    averaging_window: u64,
) -> Result<ResumeState, ConfigError> {
    let idx = contigs
        .iter()
        .position(|c| c.name == contig)
        .ok_or_else(|| ConfigError::UnknownResumeContig(contig.to_string()))?;

    let preceding: u64 = contigs[..idx]
        .iter()
        .map(|c| window_count(c.length, window_size))
        .sum();
    let blocks_here = block_number.saturating_sub(preceding / averaging_window.max(1));
    let windows_here = blocks_here.saturating_mul(averaging_window);

    Ok(ResumeState {
        contig: Some(contig.to_string()),
        start_offset: windows_here.saturating_mul(window_size),
        running_window_count: preceding + windows_here,
    })
}

/// Work out where to continue from a previous output file.
///
/// A missing file, a header-only file or an unreadable last row all start fresh; the
/// last case is reported as a warning. A contig that the variant source does not
/// declare is a configuration error.
pub fn detect(
    path: &Path,
    contigs: &[Contig],
    window_size: u64,
    averaging_window: u64,
    quiet: bool,
) -> Result<ResumeState> {
    let last = match read_last_row(path) {
        Ok(last) => last,
        Err(ResumeError::Io(e)) => return Err(anyhow::Error::new(e).context("Failed to read previous output")),
        Err(e) => {
            eprintln!("Warning: cannot resume from {} ({}); starting fresh", path.display(), e);
            return Ok(ResumeState::fresh());
        }
    };

    match last {
        LastRow::Missing | LastRow::HeaderOnly => {
            if !quiet {
                eprintln!("No completed blocks in {}; starting fresh", path.display());
            }
            Ok(ResumeState::fresh())
        }
        LastRow::Row { contig, block_number } => {
            let state = resume_from(contigs, &contig, block_number, window_size, averaging_window)?;
            if !quiet {
                eprintln!(
                    "Resuming at {}:{} after block {} ({} windows already processed)",
                    contig, state.start_offset, block_number, state.running_window_count
                );
            }
            Ok(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "Contig\tAvg_Window_Length\tAvg_Heterozygous_Count\tWindow_Block_Number\tAvg_Proportion_Heterozygous\n";

    fn write(dir: &tempfile::TempDir, text: &str) -> std::path::PathBuf {
        let path = dir.path().join("out.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    fn contigs() -> Vec<Contig> {
        vec![
            Contig::new("chr1", 2_500_000),
            Contig::new("chr2", 1_500_500),
            Contig::new("chr3", 800_000),
        ]
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_last_row(&dir.path().join("nope.txt")).unwrap(), LastRow::Missing);
    }

    #[test]
    fn test_empty_and_header_only() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_last_row(&write(&dir, "")).unwrap(), LastRow::Missing);
        assert_eq!(read_last_row(&write(&dir, HEADER)).unwrap(), LastRow::HeaderOnly);
    }

    #[test]
    fn test_last_row_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{HEADER}chr1\t1000.00\t0.50\t1\t0.000500\nchr1\t1000.00\t0.40\t2\t0.000400\n");
        assert_eq!(
            read_last_row(&write(&dir, &text)).unwrap(),
            LastRow::Row { contig: "chr1".to_string(), block_number: 2 }
        );
    }

    #[test]
    fn test_malformed_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{HEADER}chr1\t1000.00\t0.50\tx\t0.000500\n");
        assert!(matches!(read_last_row(&write(&dir, &text)), Err(ResumeError::Malformed(_))));
        let truncated = format!("{HEADER}chr1\t1000.0");
        assert!(matches!(read_last_row(&write(&dir, &truncated)), Err(ResumeError::Malformed(_))));
    }

    #[test]
    fn test_offset_on_first_contig() {
        let state = resume_from(&contigs(), "chr1", 2, 1000, 1000).unwrap();
        assert_eq!(state.contig.as_deref(), Some("chr1"));
        assert_eq!(state.start_offset, 2_000_000);
        assert_eq!(state.running_window_count, 2000);
    }

    #[test]
    fn test_offset_on_later_contig() {
        // chr1 contributes 2500 windows; the first full chr2 block flushes at 3500 -> 3
        let state = resume_from(&contigs(), "chr2", 3, 1000, 1000).unwrap();
        assert_eq!(state.start_offset, 1_000_000);
        assert_eq!(state.running_window_count, 3500);

        // a number no chr2 block can carry restarts chr2 from zero
        let state = resume_from(&contigs(), "chr2", 2, 1000, 1000).unwrap();
        assert_eq!(state.start_offset, 0);
        assert_eq!(state.running_window_count, 2500);

        // chr3 follows 2500 + 1501 windows
        let state = resume_from(&contigs(), "chr3", 4, 1000, 1000).unwrap();
        assert_eq!(state.start_offset, 0);
        assert_eq!(state.running_window_count, 4001);
    }

    #[test]
    fn test_unknown_contig() {
        assert_eq!(
            resume_from(&contigs(), "chrZ", 1, 1000, 1000),
            Err(ConfigError::UnknownResumeContig("chrZ".to_string()))
        );
    }

    #[test]
    fn test_detect_falls_back_to_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, &format!("{HEADER}garbage line\n"));
        assert!(detect(&path, &contigs(), 1000, 1000, true).unwrap().is_fresh());

        let path = write(&dir, HEADER);
        assert!(detect(&path, &contigs(), 1000, 1000, true).unwrap().is_fresh());
    }

    #[test]
    fn test_detect_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, &format!("{HEADER}chr1\t1000.00\t0.50\t2\t0.000500\n"));
        let state = detect(&path, &contigs(), 1000, 1000, true).unwrap();
        assert_eq!(state.start_offset, 2_000_000);
    }

    #[test]
    fn test_detect_unknown_contig_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, &format!("{HEADER}chrZ\t1000.00\t0.50\t2\t0.000500\n"));
        assert!(detect(&path, &contigs(), 1000, 1000, true).is_err());
    }
}
