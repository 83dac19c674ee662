use crate::types::BlockRow;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::Path;

pub const HEADER: [&str; 5] = [
    "Contig",
    "Avg_Window_Length",
    "Avg_Heterozygous_Count",
    "Window_Block_Number",
    "Avg_Proportion_Heterozygous",
];

/// Tab-separated block table. Every row is flushed as soon as it is written,
/// so an interrupted run keeps all completed blocks.
pub struct RowWriter {
    wtr: Writer<File>,
    rows: u64,
}

impl RowWriter {
    /// Create (or truncate) the table and write the header.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = Self::from_file(file);
        writer.write_header()?;
        Ok(writer)
    }

    /// Open the table for appending. The header is written only when the file is new or empty.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open output file for appending: {}", path.display()))?;
        let empty = file.metadata()?.len() == 0;
        let mut writer = Self::from_file(file);
        if empty {
            writer.write_header()?;
        }
        Ok(writer)
    }

    fn from_file(file: File) -> Self {
        let wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .from_writer(file);
        Self { wtr, rows: 0 }
    }

    fn write_header(&mut self) -> Result<()> {
        self.wtr.write_record(HEADER)?;
        self.wtr.flush()?;
        Ok(())
    }

    pub fn write_row(&mut self, row: &BlockRow) -> Result<()> {
        self.wtr.write_record(&[
            row.contig.clone(),
            format!("{:.2}", row.avg_window_length),
            format!("{:.2}", row.avg_heterozygous_count),
            row.block_number.to_string(),
            format!("{:.6}", row.avg_proportion_heterozygous),
        ])?;
        self.wtr.flush().context("Failed to flush output row")?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written by this writer (header excluded)
    pub fn rows(&self) -> u64 {
        self.rows
    }
}
