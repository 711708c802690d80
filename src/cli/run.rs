use crate::cli::args::Cli;
use crate::core::engine::{self, BatchConfig};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(args: Cli) -> Result<()> {
    let trace = trace_enabled();
    let t0 = Instant::now();

    let t_list = Instant::now();
    let list = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read input list from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read input list {}", args.input.display()))?
    };
    let inputs: Vec<PathBuf> = list
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();
    stage_done(trace, "input-list", t_list);
    if trace {
        eprintln!("GENOME_STAT_TRACE files={}", inputs.len());
    }

    let threads = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };

    let single_file = inputs.len() == 1;
    let cfg = BatchConfig { inputs, threads };

    let t_engine = Instant::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = engine::run(&cfg, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    stage_done(trace, "engine", t_engine);

    if trace {
        eprintln!(
            "GENOME_STAT_TRACE rows={} failures={} total={}",
            outcome.rows_written,
            outcome.failures.len(),
            fmt_dur(t0.elapsed())
        );
    }

    // A one-file batch has nothing to continue past; its failure is the
    // invocation's failure. Multi-file batches already reported per file.
    if single_file && !outcome.failures.is_empty() {
        let failure = &outcome.failures[0];
        bail!("{}: {}", failure.path.display(), failure.error);
    }

    Ok(())
}

fn trace_enabled() -> bool {
    matches!(env::var("GENOME_STAT_TRACE").as_deref(), Ok("1"))
}

fn stage_done(trace: bool, name: &str, t: Instant) {
    if trace {
        eprintln!(
            "GENOME_STAT_TRACE stage={} time={}",
            name,
            fmt_dur(t.elapsed())
        );
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
