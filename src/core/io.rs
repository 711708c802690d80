use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// Compression is decided by the filename alone; a mislabeled file surfaces
/// as a decompression error on the file that carries it, never as a guess.
pub fn detect_input_kind(path: &Path) -> InputKind {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("gz") => InputKind::Gzip,
        _ => InputKind::Plain,
    }
}

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

/// The raw bytes of one input file, mapped when plain and inflated to an
/// owned buffer when gzip-compressed. `MultiGzDecoder` drains multi-member
/// streams, which also covers bgzip output.
pub enum SourceBytes {
    Mapped(MmapSource),
    Owned(Vec<u8>),
}

impl SourceBytes {
    pub fn open(path: &Path) -> io::Result<Self> {
        match detect_input_kind(path) {
            InputKind::Plain => {
                let meta = std::fs::metadata(path)?;
                if meta.len() == 0 {
                    // Zero-length mappings are platform-dependent.
                    return Ok(SourceBytes::Owned(Vec::new()));
                }
                Ok(SourceBytes::Mapped(MmapSource::open(path)?))
            }
            InputKind::Gzip => {
                let file = File::open(path)?;
                let mut decoder = MultiGzDecoder::new(BufReader::new(file));
                let mut buf = Vec::new();
                decoder.read_to_end(&mut buf)?;
                Ok(SourceBytes::Owned(buf))
            }
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            SourceBytes::Mapped(source) => source.bytes(),
            SourceBytes::Owned(buf) => buf,
        }
    }
}
