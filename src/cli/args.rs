use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "genome_stat",
    version,
    about = "Assembly statistics (N50/L50, GC%, length distribution) for batches of FASTA files"
)]
pub struct Cli {
    /// File listing one FASTA path per line, or '-' to read the list from stdin.
    pub input: PathBuf,

    /// Worker pool size; 0 means one worker per available core.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}
