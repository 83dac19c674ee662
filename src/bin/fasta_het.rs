use anyhow::Result;
use clap::Parser;
use het_windows::fasta;
use std::path::Path;

#[derive(Parser)]
#[command(name = "fasta-het")]
#[command(version)]
#[command(about = "Calculate base-composition heterozygosity in non-overlapping windows of a genome", long_about = None)]
struct Args {
    /// Genome file in FASTA format
    genome_file: String,

    /// Window size in base pairs
    #[arg(short, long = "window_size", default_value = "1000000")]
    window_size: usize,

    /// Output CSV file
    #[arg(short, long = "output_file", default_value = "heterozygosity_results.csv")]
    output_file: String,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !Path::new(&args.genome_file).exists() {
        anyhow::bail!("Genome file not found: {}", args.genome_file);
    }

    let n = fasta::run(
        Path::new(&args.genome_file),
        Path::new(&args.output_file),
        args.window_size,
    )?;

    if !args.quiet {
        eprintln!("{} windows; results written to {}", n, args.output_file);
    }
    Ok(())
}
