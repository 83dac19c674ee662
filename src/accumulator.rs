use crate::classify::classify;
use crate::error::FetchError;
use crate::source::VariantSource;
use crate::types::{Window, WindowResult};

/// Tally heterozygous calls and valid sites over the records overlapping one window.
///
/// Any fetch or read error aborts the window; nothing is counted for it.
pub fn accumulate_window<S: VariantSource + ?Sized>(
    source: &mut S,
    contig: &str,
    window: Window,
) -> Result<WindowResult, FetchError> {
    let mut result = WindowResult {
        length: window.length(),
        ..WindowResult::default()
    };

    for site in source.fetch(contig, window.start, window.end)? {
        let class = classify(&site?);
        if class.heterozygous {
            result.heterozygous_count += 1;
        }
        if class.valid {
            result.valid_site_count += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::types::{Contig, Genotype, Site};
    use approx::assert_relative_eq;

    fn site(pos: u64, gt: Option<(u32, u32)>) -> Site {
        Site {
            pos,
            genotype: gt.map(|(a, b)| Genotype::diploid(a, b)),
        }
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![Contig::new("chr1", 25)]).with_sites(
            "chr1",
            vec![
                site(0, Some((0, 0))),
                site(3, Some((0, 1))),
                site(4, Some((1, 1))),
                site(7, Some((1, 2))),
                site(9, None),
                site(12, Some((0, 1))),
                site(22, Some((1, 0))),
            ],
        )
    }

    #[test]
    fn test_counts_within_window() {
        let mut src = source();
        let w = Window { index: 0, start: 0, end: 10 };
        let r = accumulate_window(&mut src, "chr1", w).unwrap();
        assert_eq!(r.length, 10);
        assert_eq!(r.heterozygous_count, 1);
        assert_eq!(r.valid_site_count, 5);
        assert_relative_eq!(r.proportion_heterozygous(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_truncated_last_window() {
        let mut src = source();
        let w = Window { index: 2, start: 20, end: 25 };
        let r = accumulate_window(&mut src, "chr1", w).unwrap();
        assert_eq!(r.length, 5);
        assert_eq!(r.heterozygous_count, 1);
        assert_eq!(r.valid_site_count, 1);
    }

    #[test]
    fn test_empty_window() {
        let mut src = source();
        let w = Window { index: 1, start: 13, end: 20 };
        let r = accumulate_window(&mut src, "chr1", w).unwrap();
        assert_eq!(r, WindowResult { length: 7, heterozygous_count: 0, valid_site_count: 0 });
        assert_eq!(r.proportion_heterozygous(), 0.0);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let mut src = source();
        let w = Window { index: 3, start: 30, end: 40 };
        assert!(accumulate_window(&mut src, "chr1", w).is_err());
        assert!(accumulate_window(&mut src, "chrUn", Window { index: 0, start: 0, end: 10 }).is_err());
    }
}
