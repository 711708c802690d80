use crate::core::stats::FileStatistics;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Fixed column order; downstream tooling keys on these names.
pub const HEADER: &str =
    "Genome\t#Contigs\tGC\t#N_character\tContig_longest\tContig_minimum\tN90\tL90\tN50\tL50\tN75\tL75";

pub fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(HEADER.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// One row per file. The row is formatted in full first and written with a
/// single call, so a concurrent batch never interleaves partial rows.
pub fn write_row<W: Write>(out: &mut W, stats: &FileStatistics) -> io::Result<()> {
    let row = format_row(stats);
    out.write_all(row.as_bytes())?;
    out.flush()
}

pub fn format_row(stats: &FileStatistics) -> String {
    // Thresholds ascend 25/50/75/90; the table wants 90, 50, 75.
    let [_n25, n50, n75, n90] = stats.nx;
    let mut row = String::with_capacity(128);
    let _ = write!(
        row,
        "{}\t{}\t{:.4}\t{}\t{}\t{}",
        stats.source_name,
        stats.record_count,
        stats.gc_percent,
        stats.n_count(),
        stats.max_length,
        stats.min_length,
    );
    for entry in [n90, n50, n75] {
        let _ = write!(row, "\t{}\t{}", entry.n_value, entry.l_value);
    }
    row.push('\n');
    row
}
