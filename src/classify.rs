use crate::types::{Genotype, Site};

/// Check whether a genotype is the biallelic heterozygous call `0/1` (or `1/0`).
///
/// Only diploid calls with exactly the alleles 0 and 1 count. `1/2`, `0/2`,
/// homozygous calls, partially missing calls and polyploid calls do not.
pub fn is_heterozygous(gt: &Genotype) -> bool {
    matches!(gt.alleles.as_slice(), [Some(0), Some(1)] | [Some(1), Some(0)])
}

/// Classification of one record inside a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteClass {
    pub heterozygous: bool,
    /// Every fetched record is a valid site, with or without a genotype
    pub valid: bool,
}

pub fn classify(site: &Site) -> SiteClass {
    SiteClass {
        heterozygous: site.genotype.as_ref().is_some_and(is_heterozygous),
        valid: true,
    }
}
