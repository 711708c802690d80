use crate::core::error::{FileFailure, StatError};
use crate::core::fasta;
use crate::core::io::SourceBytes;
use crate::core::stats::{self, FileStatistics};
use crate::report::tsv;
use anyhow::{Context, Result};
use crossbeam_channel as channel;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

pub struct BatchConfig {
    pub inputs: Vec<PathBuf>,
    pub threads: usize,
}

pub struct BatchOutcome {
    pub rows_written: usize,
    pub failures: Vec<FileFailure>,
}

#[derive(Clone, Copy, Debug, Default)]
struct WorkerStats {
    files: u64,
    bases: u64,
    busy: Duration,
}

/// The whole pipeline for one file: open (and inflate), parse, reduce.
/// Pure with respect to file content; no state survives the call.
pub fn process_file(path: &Path) -> Result<FileStatistics, StatError> {
    let source = SourceBytes::open(path)?;
    stats::compute(&path.display().to_string(), fasta::records(source.bytes()))
}

/// Fan the input list out over a worker pool and stream rows to `out` in
/// completion order. The pool lives and dies inside this call; the calling
/// thread is the only writer, so header and rows never interleave.
///
/// Per-file failures go to stderr (when the batch has more than one file)
/// and into the returned outcome; they never abort sibling files. Only a
/// broken output stream is fatal here.
pub fn run<W: Write>(cfg: &BatchConfig, out: &mut W) -> Result<BatchOutcome> {
    let trace = trace_enabled();
    let t_total = Instant::now();
    let threads = cfg.threads.max(1);
    let report_inline = cfg.inputs.len() > 1;

    tsv::write_header(out).context("failed to write output header")?;

    let (job_tx, job_rx) = channel::bounded::<PathBuf>(threads * 2);
    let (result_tx, result_rx) =
        channel::unbounded::<(PathBuf, Result<FileStatistics, StatError>)>();

    let inputs = cfg.inputs.clone();
    let producer = thread::spawn(move || {
        for path in inputs {
            if job_tx.send(path).is_err() {
                return;
            }
        }
    });

    let mut workers = Vec::with_capacity(threads);
    for _ in 0..threads {
        let rx = job_rx.clone();
        let tx = result_tx.clone();
        workers.push(thread::spawn(move || {
            let mut wstats = WorkerStats::default();
            for path in rx.iter() {
                let t_file = Instant::now();
                let result = process_file(&path);
                wstats.files += 1;
                wstats.busy += t_file.elapsed();
                if let Ok(file_stats) = &result {
                    wstats.bases += file_stats.total_length;
                }
                if tx.send((path, result)).is_err() {
                    break;
                }
            }
            wstats
        }));
    }
    drop(job_rx);
    drop(result_tx);

    let mut rows_written = 0usize;
    let mut failures = Vec::new();
    for (path, result) in result_rx.iter() {
        match result {
            Ok(file_stats) => {
                tsv::write_row(out, &file_stats).context("failed to write output row")?;
                rows_written += 1;
            }
            Err(error) => {
                if report_inline {
                    eprintln!("genome_stat: {}: {}", path.display(), error);
                }
                failures.push(FileFailure { path, error });
            }
        }
    }

    let _ = producer.join();
    let mut total = WorkerStats::default();
    for worker in workers {
        if let Ok(wstats) = worker.join() {
            total.files += wstats.files;
            total.bases += wstats.bases;
            total.busy += wstats.busy;
        }
    }
    if trace {
        eprintln!(
            "GENOME_STAT_TRACE worker.files={} worker.bases={} worker.busy={} engine.total={}",
            total.files,
            total.bases,
            fmt_dur(total.busy),
            fmt_dur(t_total.elapsed())
        );
    }

    Ok(BatchOutcome {
        rows_written,
        failures,
    })
}

fn trace_enabled() -> bool {
    matches!(env::var("GENOME_STAT_TRACE").as_deref(), Ok("1"))
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_fasta(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn run_batch(inputs: Vec<PathBuf>, threads: usize) -> (Vec<String>, BatchOutcome) {
        let cfg = BatchConfig { inputs, threads };
        let mut out = Vec::new();
        let outcome = run(&cfg, &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (lines, outcome)
    }

    #[test]
    fn single_file_row_matches_hand_computed_statistics() {
        let dir = tempfile::tempdir().unwrap();
        // Lengths 100/90/80/70/60; the last record carries the only Ns.
        let mut body = String::new();
        body.push_str(&format!(">c1 first\n{}{}\n", "G".repeat(30), "A".repeat(70)));
        body.push_str(&format!(">c2\n{}\n", "C".repeat(90)));
        body.push_str(&format!(">c3\n{}\n", "A".repeat(80)));
        body.push_str(&format!(">c4\n{}\n", "T".repeat(70)));
        body.push_str(&format!(">c5\n{}NN\n", "T".repeat(58)));
        let path = write_fasta(&dir, "a.fna", &body);

        let stats = process_file(&path).unwrap();
        assert_eq!(stats.record_count, 5);
        assert_eq!(stats.total_length, 400);
        assert_eq!(stats.n_count(), 2);
        assert_eq!(stats.max_length, 100);
        assert_eq!(stats.min_length, 60);
        // G+C = 120 of 398 unambiguous bases.
        assert!((stats.gc_percent - 100.0 * 120.0 / 398.0).abs() < 1e-9);

        let (lines, outcome) = run_batch(vec![path.clone()], 1);
        assert_eq!(outcome.rows_written, 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(lines[0], tsv::HEADER);
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields[0], path.display().to_string());
        assert_eq!(fields[1], "5");
        assert_eq!(fields[3], "2");
        assert_eq!(fields[4], "100");
        assert_eq!(fields[5], "60");
        // N90/L90, N50/L50, N75/L75.
        assert_eq!(&fields[6..], &["60", "5", "90", "2", "70", "4"]);
    }

    #[test]
    fn gzip_input_matches_plain_input() {
        let dir = tempfile::tempdir().unwrap();
        let body = ">s1\nACGTACGTNN\n>s2\nGGGCCC\n";
        let plain = write_fasta(&dir, "g.fna", body);

        let gz_path = dir.path().join("g.fna.gz");
        let file = std::fs::File::create(&gz_path).unwrap();
        let mut enc = GzEncoder::new(file, Compression::default());
        std::io::Write::write_all(&mut enc, body.as_bytes()).unwrap();
        enc.finish().unwrap();

        let a = process_file(&plain).unwrap();
        let b = process_file(&gz_path).unwrap();
        assert_eq!(a.record_count, b.record_count);
        assert_eq!(a.total_length, b.total_length);
        assert_eq!(a.gc_percent, b.gc_percent);
        assert_eq!(a.n_count(), b.n_count());
        assert_eq!(a.nx, b.nx);
    }

    #[test]
    fn sequential_order_matches_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..10)
            .map(|i| {
                write_fasta(
                    &dir,
                    &format!("f{i}.fna"),
                    &format!(">s\n{}\n", "ACGT".repeat(i + 1)),
                )
            })
            .collect();

        let (lines, outcome) = run_batch(inputs.clone(), 1);
        assert_eq!(outcome.rows_written, 10);
        for (line, path) in lines[1..].iter().zip(&inputs) {
            assert!(line.starts_with(&path.display().to_string()));
        }
    }

    #[test]
    fn thread_count_does_not_change_the_row_set() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..50)
            .map(|i| {
                write_fasta(
                    &dir,
                    &format!("f{i:02}.fna"),
                    &format!(
                        ">s{i}\n{}\n>t{i}\n{}\n",
                        "ACGT".repeat(i + 1),
                        "GGCC".repeat(50 - i)
                    ),
                )
            })
            .collect();

        let (seq_lines, seq_outcome) = run_batch(inputs.clone(), 1);
        let (par_lines, par_outcome) = run_batch(inputs, 8);
        assert_eq!(seq_outcome.rows_written, 50);
        assert_eq!(par_outcome.rows_written, 50);
        assert_eq!(seq_lines[0], par_lines[0]);

        let seq_set: BTreeSet<&String> = seq_lines[1..].iter().collect();
        let par_set: BTreeSet<&String> = par_lines[1..].iter().collect();
        assert_eq!(seq_set, par_set);
    }

    #[test]
    fn failed_files_are_skipped_without_aborting_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_fasta(&dir, "good.fna", ">s\nACGT\n");
        let empty = write_fasta(&dir, "empty.fna", "");
        let missing = dir.path().join("missing.fna");
        let headerless = write_fasta(&dir, "headerless.fna", "ACGT\n");
        let all_n = write_fasta(&dir, "ns.fna", ">s\nNNNN\n");

        let (lines, outcome) = run_batch(vec![good, empty, missing, headerless, all_n], 2);
        assert_eq!(outcome.rows_written, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(outcome.failures.len(), 4);

        let kinds: Vec<_> = outcome
            .failures
            .iter()
            .map(|f| match f.error {
                StatError::EmptyInput => "empty",
                StatError::Io(_) => "io",
                StatError::MalformedInput { .. } => "malformed",
                StatError::UndefinedRatio => "ratio",
                StatError::DuplicateIdentifier { .. } => "dup",
            })
            .collect();
        assert!(kinds.contains(&"empty"));
        assert!(kinds.contains(&"io"));
        assert!(kinds.contains(&"malformed"));
        assert!(kinds.contains(&"ratio"));
    }

    #[test]
    fn duplicate_identifier_fails_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "dup.fna", ">s\nAC\n>s\nGT\n");
        let err = process_file(&path).unwrap_err();
        assert!(matches!(err, StatError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn empty_batch_emits_header_only() {
        let (lines, outcome) = run_batch(Vec::new(), 4);
        assert_eq!(lines, vec![tsv::HEADER.to_string()]);
        assert_eq!(outcome.rows_written, 0);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn processing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fasta(&dir, "r.fna", ">a\nACGTN\n>b\nGGGG\n");
        let first = process_file(&path).unwrap();
        let second = process_file(&path).unwrap();
        assert_eq!(tsv::format_row(&first), tsv::format_row(&second));
    }
}
