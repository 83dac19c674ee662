pub mod accumulator;
pub mod aggregator;
pub mod classify;
pub mod error;
pub mod fasta;
pub mod output;
pub mod resume;
pub mod scan;
pub mod source;
pub mod types;
pub mod vcf_parser;
pub mod windows;
