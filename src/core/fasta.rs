use crate::core::error::StatError;
use memchr::memchr;
use std::collections::HashSet;

/// One FASTA record: the header truncated at the first ASCII whitespace,
/// and the concatenation of its sequence lines with terminators stripped.
/// Case is preserved as read; consumers fold case where they need to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

pub fn records(data: &[u8]) -> RecordIter<'_> {
    RecordIter {
        data,
        pos: 0,
        line: 1,
        seen: HashSet::new(),
        done: false,
    }
}

/// Single-pass record iterator over one file's bytes. Finite and not
/// restartable; reprocessing a file means reopening it. The first error
/// ends iteration for the whole file.
pub struct RecordIter<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    seen: HashSet<String>,
    done: bool,
}

impl<'a> RecordIter<'a> {
    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let (line, advance) = match memchr(b'\n', rest) {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        self.line += 1;
        match line.last() {
            Some(b'\r') => Some(&line[..line.len() - 1]),
            _ => Some(line),
        }
    }

    fn at_header(&self) -> bool {
        self.pos < self.data.len() && self.data[self.pos] == b'>'
    }
}

impl Iterator for RecordIter<'_> {
    type Item = Result<SequenceRecord, StatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let header = loop {
            let line_no = self.line;
            let line = self.next_line()?;
            if line.is_empty() {
                continue;
            }
            if line[0] == b'>' {
                break line;
            }
            self.done = true;
            return Some(Err(StatError::MalformedInput { line: line_no }));
        };

        let name = &header[1..];
        let id_end = name
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .unwrap_or(name.len());
        let id = String::from_utf8_lossy(&name[..id_end]).into_owned();
        if !self.seen.insert(id.clone()) {
            self.done = true;
            return Some(Err(StatError::DuplicateIdentifier { id }));
        }

        let mut seq = Vec::new();
        while !self.at_header() {
            let Some(line) = self.next_line() else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            seq.extend_from_slice(line);
        }
        Some(Ok(SequenceRecord { id, seq }))
    }
}
