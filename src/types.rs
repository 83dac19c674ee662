/// A contig declared in the variant source header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub length: u64,
}

impl Contig {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Allele calls of one sample, in the order they were written (phasing ignored).
/// `None` is a missing call (`.`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    pub alleles: Vec<Option<u32>>,
}

impl Genotype {
    pub fn new(alleles: Vec<Option<u32>>) -> Self {
        Self { alleles }
    }

    /// Diploid call with both alleles present, e.g. `Genotype::diploid(0, 1)` for `0/1`.
    pub fn diploid(a: u32, b: u32) -> Self {
        Self::new(vec![Some(a), Some(b)])
    }
}

/// One variant (or reference block) record, first sample only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub pos: u64, // 0-based
    pub genotype: Option<Genotype>,
}

/// Half-open interval `[start, end)` on one contig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub index: u64,
    pub start: u64,
    pub end: u64,
}

impl Window {
    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

/// Counts for a single window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowResult {
    pub length: u64,
    pub heterozygous_count: u64,
    pub valid_site_count: u64,
}

impl WindowResult {
    /// Heterozygous calls per base pair of the window
    pub fn proportion_heterozygous(&self) -> f64 {
        if self.length > 0 {
            self.heterozygous_count as f64 / self.length as f64
        } else {
            0.0
        }
    }
}

/// One output row: averages over a block of consecutive windows
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRow {
    pub contig: String,
    pub avg_window_length: f64,
    pub avg_heterozygous_count: f64,
    pub block_number: u64,
    pub avg_proportion_heterozygous: f64,
    pub windows: u64,
    pub valid_sites: u64,
}

/// Where a scan starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    /// Contig to resume on; `None` scans every contig from zero
    pub contig: Option<String>,
    /// Coordinate on `contig` at which scanning restarts (a window boundary)
    pub start_offset: u64,
    /// Windows already processed by the interrupted run, seeds block numbering
    pub running_window_count: u64,
}

impl ResumeState {
    pub fn fresh() -> Self {
        Self {
            contig: None,
            start_offset: 0,
            running_window_count: 0,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.contig.is_none()
    }
}

impl Default for ResumeState {
    fn default() -> Self {
        Self::fresh()
    }
}
