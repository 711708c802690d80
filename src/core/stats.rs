use crate::core::error::StatError;
use crate::core::fasta::SequenceRecord;
use crate::simd;

/// Percentile thresholds computed for every file, ascending.
pub const NX_THRESHOLDS: [u8; 4] = [25, 50, 75, 90];

/// Case-insensitive base counts for a whole file, accumulated in one
/// streaming pass. `other` holds IUPAC ambiguity codes besides N so that
/// a + c + g + t + n + other always equals the total length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseTotals {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
    pub n: u64,
    pub other: u64,
}

impl BaseTotals {
    pub fn count(seq: &[u8]) -> Self {
        let (a, c, g, t, n) = simd::count_bases(seq);
        let other = seq.len() as u64 - (a + c + g + t + n);
        Self {
            a,
            c,
            g,
            t,
            n,
            other,
        }
    }

    pub fn add_assign(&mut self, rhs: &BaseTotals) {
        self.a += rhs.a;
        self.c += rhs.c;
        self.g += rhs.g;
        self.t += rhs.t;
        self.n += rhs.n;
        self.other += rhs.other;
    }

    /// GC denominator: unambiguous bases only.
    pub fn atgc(&self) -> u64 {
        self.a + self.t + self.g + self.c
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NxEntry {
    pub threshold: u8,
    pub n_value: u64,
    pub l_value: u64,
}

/// The full reduction of one FASTA file. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct FileStatistics {
    pub source_name: String,
    pub record_count: u64,
    pub total_length: u64,
    pub gc_percent: f64,
    pub bases: BaseTotals,
    pub min_length: u64,
    pub max_length: u64,
    pub mean_length: f64,
    pub median_length: f64,
    /// One entry per `NX_THRESHOLDS` value, in ascending threshold order.
    pub nx: [NxEntry; 4],
}

impl FileStatistics {
    pub fn nx(&self, threshold: u8) -> Option<NxEntry> {
        self.nx.iter().copied().find(|e| e.threshold == threshold)
    }

    pub fn n_count(&self) -> u64 {
        self.bases.n
    }
}

/// Reduce a record stream to one `FileStatistics`. Loader errors pass
/// through unchanged; a file with no records or no A/T/G/C bases is a
/// typed failure, never a division by zero.
pub fn compute<I>(source_name: &str, records: I) -> Result<FileStatistics, StatError>
where
    I: IntoIterator<Item = Result<SequenceRecord, StatError>>,
{
    let mut lengths: Vec<u64> = Vec::new();
    let mut bases = BaseTotals::default();
    for record in records {
        let record = record?;
        lengths.push(record.seq.len() as u64);
        bases.add_assign(&BaseTotals::count(&record.seq));
    }
    if lengths.is_empty() {
        return Err(StatError::EmptyInput);
    }
    let atgc = bases.atgc();
    if atgc == 0 {
        return Err(StatError::UndefinedRatio);
    }

    let record_count = lengths.len() as u64;
    let total_length: u64 = lengths.iter().sum();
    let gc_percent = 100.0 * (bases.g + bases.c) as f64 / atgc as f64;

    // Stable descending sort; input order is the tie-break for equal lengths.
    lengths.sort_by(|a, b| b.cmp(a));
    let max_length = lengths[0];
    let min_length = lengths[lengths.len() - 1];
    let mean_length = total_length as f64 / record_count as f64;
    let mid = lengths.len() / 2;
    let median_length = if lengths.len() % 2 == 1 {
        lengths[mid] as f64
    } else {
        (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
    };

    // One cumulative pass over the sorted lengths serves every threshold.
    // Rank r crosses threshold p when cumulative * 100 >= total * p, kept
    // in integers to dodge float boundary error.
    let mut nx = [NxEntry {
        threshold: 0,
        n_value: 0,
        l_value: 0,
    }; 4];
    let mut next = 0usize;
    let mut cumulative = 0u64;
    for (rank, &len) in lengths.iter().enumerate() {
        cumulative += len;
        while next < NX_THRESHOLDS.len()
            && cumulative * 100 >= total_length * NX_THRESHOLDS[next] as u64
        {
            nx[next] = NxEntry {
                threshold: NX_THRESHOLDS[next],
                n_value: len,
                l_value: rank as u64 + 1,
            };
            next += 1;
        }
        if next == NX_THRESHOLDS.len() {
            break;
        }
    }
    // Every threshold is <= 100, so the pass crosses all of them.
    debug_assert_eq!(next, NX_THRESHOLDS.len());

    Ok(FileStatistics {
        source_name: source_name.to_string(),
        record_count,
        total_length,
        gc_percent,
        bases,
        min_length,
        max_length,
        mean_length,
        median_length,
        nx,
    })
}
