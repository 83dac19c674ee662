use crate::error::FetchError;
use crate::types::{Contig, Site};
use std::collections::HashMap;

/// Records overlapping a fetched interval, in position order
pub type SiteIter<'a> = Box<dyn Iterator<Item = Result<Site, FetchError>> + 'a>;

/// A coordinate-indexed store of single-sample variant records.
pub trait VariantSource {
    /// Contigs in header declaration order
    fn contigs(&self) -> &[Contig];

    /// Records overlapping the half-open interval `[start, end)` of `contig`.
    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<SiteIter<'_>, FetchError>;
}

/// Variant source held in memory. Records are sorted by position on insertion.
///
/// A record overlaps an interval when its position lies inside it; reference
/// blocks spanning several positions are stored as one record per position.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    contigs: Vec<Contig>,
    sites: HashMap<String, Vec<Site>>,
}

impl MemorySource {
    pub fn new(contigs: Vec<Contig>) -> Self {
        Self {
            contigs,
            sites: HashMap::new(),
        }
    }

    pub fn with_sites(mut self, contig: &str, sites: impl IntoIterator<Item = Site>) -> Self {
        let entry = self.sites.entry(contig.to_string()).or_default();
        entry.extend(sites);
        entry.sort_by_key(|s| s.pos);
        self
    }
}

impl VariantSource for MemorySource {
    fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    fn fetch(&mut self, contig: &str, start: u64, end: u64) -> Result<SiteIter<'_>, FetchError> {
        let declared = self
            .contigs
            .iter()
            .find(|c| c.name == contig)
            .ok_or_else(|| FetchError::UnknownContig(contig.to_string()))?;
        if start >= end || end > declared.length {
            return Err(FetchError::InvalidInterval { start, end });
        }

        let sites = self.sites.get(contig).map(Vec::as_slice).unwrap_or(&[]);
        let lo = sites.partition_point(|s| s.pos < start);
        let hi = sites.partition_point(|s| s.pos < end);
        Ok(Box::new(sites[lo..hi].iter().cloned().map(Ok)))
    }
}
