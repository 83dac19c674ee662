use anyhow::Result;
use clap::Parser;
use het_windows::output::RowWriter;
use het_windows::resume;
use het_windows::scan::{scan, ScanConfig};
use het_windows::source::VariantSource;
use het_windows::types::ResumeState;
use het_windows::vcf_parser::IndexedVcf;
use std::path::Path;

#[derive(Parser)]
#[command(name = "het-windows")]
#[command(version)]
#[command(about = "Count heterozygous sites per window in a single-sample gVCF", long_about = None)]
struct Args {
    /// Input gVCF (bgzipped with a .tbi/.csi index, or BCF)
    input_variants: String,

    /// Output table (tab-separated)
    output_path: String,

    /// Window size in base pairs
    #[arg(long = "window_size", default_value = "1000")]
    window_size: u64,

    /// Number of windows to average into one output row
    #[arg(long = "averaging_window", default_value = "1000")]
    averaging_window: u64,

    /// Resume from the last row of an existing output file
    #[arg(long)]
    resume: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

macro_rules! progress {
    ($quiet:expr) => {
        if !$quiet {
            eprintln!();
        }
    };
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ScanConfig {
        window_size: args.window_size,
        averaging_window: args.averaging_window,
        resume: args.resume,
        quiet: args.quiet,
    };
    config.validate()?;

    if !Path::new(&args.input_variants).exists() {
        anyhow::bail!("Input file not found: {}", args.input_variants);
    }

    progress!(args.quiet, "gVCF Heterozygosity Windows");
    progress!(args.quiet, "=========================================");
    progress!(args.quiet, "Input gVCF: {}", args.input_variants);
    progress!(args.quiet, "Output: {}", args.output_path);
    progress!(args.quiet, "Window size: {} bp", config.window_size);
    progress!(args.quiet, "Averaging window: {} windows", config.averaging_window);
    progress!(args.quiet, "Resume: {}", config.resume);
    progress!(args.quiet);

    let mut source = IndexedVcf::open(Path::new(&args.input_variants), args.quiet)?;
    let output_path = Path::new(&args.output_path);

    let state = if config.resume {
        resume::detect(
            output_path,
            source.contigs(),
            config.window_size,
            config.averaging_window,
            config.quiet,
        )?
    } else {
        ResumeState::fresh()
    };

    let mut writer = if config.resume {
        RowWriter::append(output_path)?
    } else {
        RowWriter::create(output_path)?
    };

    let summary = scan(&mut source, &mut writer, &config, &state)?;

    progress!(args.quiet);
    progress!(args.quiet, "Contigs scanned: {}", summary.contigs_scanned);
    progress!(args.quiet, "Contigs skipped: {}", summary.contigs_skipped);
    if summary.contigs_abandoned > 0 {
        progress!(args.quiet, "Contigs abandoned after fetch errors: {}", summary.contigs_abandoned);
    }
    progress!(args.quiet, "Windows processed: {}", summary.windows);
    progress!(args.quiet, "Done! {} rows written to: {}", writer.rows(), args.output_path);

    Ok(())
}
