//! Base-composition heterozygosity of reference sequences in fixed windows.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use bio::io::fasta;
use csv::Writer;
use std::io::{Read, Write};
use std::path::Path;

/// One full window of a FASTA record
#[derive(Debug, Clone, PartialEq)]
pub struct FastaWindow {
    pub header: String,
    /// 1-based, restarts for every record
    pub bin_number: u64,
    pub heterozygosity: f64,
}

/// Fraction of counted bases that differ from the most common base.
///
/// Only uppercase `A`, `C`, `G` and `T` are counted; anything else (soft-masked
/// bases, `N`, IUPAC codes) is ignored. Returns 0 when nothing was counted.
pub fn window_heterozygosity(seq: &[u8]) -> f64 {
    let mut counts = [0u64; 4];
    for base in seq {
        match base {
            b'A' => counts[0] += 1,
            b'C' => counts[1] += 1,
            b'G' => counts[2] += 1,
            b'T' => counts[3] += 1,
            _ => {}
        }
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    (total - max) as f64 / total as f64
}

/// Full, non-overlapping windows of one sequence. A trailing partial window is dropped.
pub fn sequence_windows(header: &str, seq: &[u8], window_size: usize) -> Vec<FastaWindow> {
    if window_size == 0 {
        return Vec::new();
    }
    seq.chunks_exact(window_size)
        .enumerate()
        .map(|(i, chunk)| FastaWindow {
            header: header.to_string(),
            bin_number: i as u64 + 1,
            heterozygosity: window_heterozygosity(chunk),
        })
        .collect()
}

/// Read every record of a FASTA stream and compute its windows, in file order.
pub fn fasta_windows<R: Read>(input: R, window_size: usize) -> Result<Vec<FastaWindow>> {
    if window_size == 0 {
        return Err(ConfigError::NonPositiveWindowSize.into());
    }
    let reader = fasta::Reader::new(input);
    let mut windows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse FASTA record {}", i + 1))?;
        windows.extend(sequence_windows(record.id(), record.seq(), window_size));
    }
    Ok(windows)
}

/// Write windows as `Header,Bin Number,Heterozygosity` CSV.
pub fn write_windows<W: Write>(windows: &[FastaWindow], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["Header", "Bin Number", "Heterozygosity"])?;
    for w in windows {
        wtr.write_record(&[
            w.header.clone(),
            w.bin_number.to_string(),
            format!("{:.6}", w.heterozygosity),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Compute windows for a FASTA file and write them to `output`. Returns the window count.
pub fn run(genome: &Path, output: &Path, window_size: usize) -> Result<usize> {
    if window_size == 0 {
        return Err(ConfigError::NonPositiveWindowSize.into());
    }
    let input = std::fs::File::open(genome)
        .with_context(|| format!("Failed to open genome file: {}", genome.display()))?;
    let windows = fasta_windows(input, window_size)?;
    let out = std::fs::File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    write_windows(&windows, out)?;
    Ok(windows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FASTA: &str = ">chrA desc\nAAAACCGGTT\nAAAAAAAA\n>chrB\nACGTNNNNnnacgt\n";

    #[test]
    fn test_window_heterozygosity() {
        assert_eq!(window_heterozygosity(b"AAAA"), 0.0);
        assert_relative_eq!(window_heterozygosity(b"AACG"), 0.5);
        assert_relative_eq!(window_heterozygosity(b"ACGT"), 0.75);
        assert_eq!(window_heterozygosity(b"NNNN"), 0.0);
        assert_eq!(window_heterozygosity(b"acgt"), 0.0);
        assert_relative_eq!(window_heterozygosity(b"AANNC"), 1.0 / 3.0);
    }

    #[test]
    fn test_partial_window_dropped() {
        let w = sequence_windows("s", b"AAAACCCCGG", 4);
        assert_eq!(w.len(), 2);
        assert_eq!(w[1].bin_number, 2);
        assert_eq!(w[0].heterozygosity, 0.0);
        assert!(sequence_windows("s", b"AAA", 4).is_empty());
    }

    #[test]
    fn test_bins_restart_per_record() {
        let windows = fasta_windows(FASTA.as_bytes(), 6).unwrap();
        let labels: Vec<(&str, u64)> = windows.iter().map(|w| (w.header.as_str(), w.bin_number)).collect();
        assert_eq!(labels, vec![("chrA", 1), ("chrA", 2), ("chrA", 3), ("chrB", 1), ("chrB", 2)]);
        // chrA bin 1 = AAAACC
        assert_relative_eq!(windows[0].heterozygosity, 2.0 / 6.0);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(fasta_windows(FASTA.as_bytes(), 0).is_err());
    }

    #[test]
    fn test_output_is_deterministic() {
        let render = || {
            let windows = fasta_windows(FASTA.as_bytes(), 4).unwrap();
            let mut buf = Vec::new();
            write_windows(&windows, &mut buf).unwrap();
            buf
        };
        let first = render();
        assert_eq!(first, render());
        let text = String::from_utf8(first).unwrap();
        assert!(text.starts_with("Header,Bin Number,Heterozygosity\nchrA,1,0.000000\n"));
    }

    #[test]
    fn test_run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let genome = dir.path().join("g.fa");
        let out = dir.path().join("het.csv");
        std::fs::write(&genome, FASTA).unwrap();
        assert_eq!(run(&genome, &out, 6).unwrap(), 5);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 6);
    }
}
