use crate::error::FetchError;
use crate::source::{SiteIter, VariantSource};
use crate::types::{Contig, Genotype, Site};
use anyhow::{Context, Result};
use rust_htslib::bcf::header::HeaderRecord;
use rust_htslib::bcf::record::GenotypeAllele;
use rust_htslib::{bcf, bcf::Read};
use std::path::Path;

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Indexed (tabix or CSI) VCF/BCF file read through htslib.
pub struct IndexedVcf {
    reader: bcf::IndexedReader,
    contigs: Vec<Contig>,
}

impl IndexedVcf {
    /// Open a bgzipped, indexed VCF or a BCF. Only the first sample is used.
    pub fn open(path: &Path, quiet: bool) -> Result<Self> {
        let reader = bcf::IndexedReader::from_path(path).with_context(|| {
            format!(
                "Failed to open indexed VCF {} (is it bgzipped with a .tbi/.csi index?)",
                path.display()
            )
        })?;

        let header = reader.header();
        let sample_count = header.sample_count();
        if sample_count == 0 {
            anyhow::bail!("VCF has no samples; a single-sample gVCF is required");
        }
        let first = header
            .samples()
            .first()
            .map(|s| String::from_utf8_lossy(s).to_string())
            .unwrap_or_default();
        progress!(quiet, "Sample: {} (1 of {})", first, sample_count);

        let contigs = declared_contigs(header.header_records(), quiet);
        if contigs.is_empty() {
            anyhow::bail!("VCF header declares no contigs with a length");
        }
        progress!(quiet, "Contigs declared: {}", contigs.len());

        Ok(Self { reader, contigs })
    }
}

/// Contigs with a declared length, in header order.
fn declared_contigs(records: Vec<HeaderRecord>, quiet: bool) -> Vec<Contig> {
    let mut contigs = Vec::new();
    for record in records {
        let HeaderRecord::Contig { values, .. } = record else {
            continue;
        };
        let Some(name) = values.get("ID") else {
            continue;
        };
        match values.get("length").and_then(|l| l.parse::<u64>().ok()) {
            Some(length) => contigs.push(Contig::new(name.clone(), length)),
            None => progress!(quiet, "Warning: contig {} has no declared length, skipping", name),
        }
    }
    contigs
}

/// Convert an htslib genotype into allele calls. Phasing is dropped.
fn convert_genotype(gt: &[GenotypeAllele]) -> Genotype {
    Genotype::new(gt.iter().map(|a| a.index()).collect())
}

fn site_from_record(record: &bcf::Record) -> Site {
    let genotype = record
        .genotypes()
        .ok()
        .map(|gts| convert_genotype(&gts.get(0)));
    Site {
        pos: record.pos().max(0) as u64,
        genotype,
    }
}

impl VariantSource for IndexedVcf {
    fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<SiteIter<'_>, FetchError> {
        if start >= end {
            return Err(FetchError::InvalidInterval { start, end });
        }
        let rid = self
            .reader
            .header()
            .name2rid(contig.as_bytes())
            .map_err(|_| FetchError::UnknownContig(contig.to_string()))?;

        // htslib regions are 0-based inclusive
        self.reader.fetch(rid, start, Some(end - 1))?;

        let records = self.reader.records().map(|r| -> Result<Site, FetchError> {
            let record = r?;
            Ok(site_from_record(&record))
        });
        Ok(Box::new(records))
    }
}
