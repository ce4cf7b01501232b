//! reference sequences for peak extraction
//!
//! Peaks are turned into sequences through [`SequenceSource`], so the export
//! step does not care whether the bases come from an in-memory genome
//! (FASTA, gzipped FASTA or 2bit) or from anything else that can answer
//! interval queries.

use crate::error::{Error, Result};

use flate2::read::MultiGzDecoder;
use log::{info, warn};
use twobit::TwoBitFile;

use std::{
    borrow::Cow,
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Something that can return the bases of a half-open interval `[start, end)`.
pub trait SequenceSource {
    /// Returns `None` if the chromosome is unknown or the interval does not fit on it.
    fn subsequence(&self, chrom: &str, start: u64, end: u64) -> Option<Cow<'_, [u8]>>;
}

/// Whole reference genome held in memory, keyed by chromosome name.
#[derive(Debug, Default, Clone)]
pub struct Genome {
    sequences: HashMap<Vec<u8>, Vec<u8>>,
}

impl Genome {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, chrom: &str) -> Option<&[u8]> {
        self.sequences.get(chrom.as_bytes()).map(Vec::as_slice)
    }
}

impl<K, V> FromIterator<(K, V)> for Genome
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Genome {
            sequences: iter
                .into_iter()
                .map(|(chrom, seq)| (chrom.into(), seq.into()))
                .collect(),
        }
    }
}

impl SequenceSource for Genome {
    fn subsequence(&self, chrom: &str, start: u64, end: u64) -> Option<Cow<'_, [u8]>> {
        if start >= end {
            return None;
        }

        let seq = self.get(chrom)?;
        let range = usize::try_from(start).ok()?..usize::try_from(end).ok()?;
        seq.get(range).map(Cow::Borrowed)
    }
}

/// Loads a reference genome, picking the reader from the file extension.
pub fn get_sequences<P: AsRef<Path>>(sequence: P) -> Result<Genome> {
    let sequence = sequence.as_ref();
    info!("Reading sequences from file {}", sequence.display());

    let name = sequence
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let genome = match sequence.extension().and_then(|ext| ext.to_str()) {
        Some("2bit") => from_2bit(sequence)?,
        Some("fa" | "fasta" | "fna") => from_fa(sequence)?,
        Some("gz") if [".fa.gz", ".fasta.gz", ".fna.gz"].iter().any(|s| name.ends_with(s)) => {
            from_fa(sequence)?
        }
        _ => {
            return Err(Error::UnsupportedReference {
                file: sequence.display().to_string(),
            });
        }
    };

    if genome.is_empty() {
        warn!("WARN: no sequences found in {}", sequence.display());
    } else {
        info!(
            "Read {} sequences from file {}",
            genome.len(),
            sequence.display()
        );
    }

    Ok(genome)
}

/// Loads every chromosome of a 2bit file, keeping soft-masked bases lowercase.
fn from_2bit(twobit: &Path) -> Result<Genome> {
    let reference_error = |reason: String| Error::Reference {
        file: twobit.display().to_string(),
        reason,
    };

    let mut genome = TwoBitFile::open_and_read(twobit)
        .map_err(|e| reference_error(e.to_string()))?
        .enable_softmask(true);

    let mut sequences = HashMap::new();
    for chr in genome.chrom_names() {
        let seq = genome
            .read_sequence(&chr, ..)
            .map_err(|e| reference_error(format!("{}: {}", chr, e)))?;

        sequences.insert(chr.into_bytes(), seq.into_bytes());
    }

    Ok(Genome { sequences })
}

/// Loads a FASTA file (optionally gzipped); records are keyed by the first
/// word of their header.
fn from_fa(path: &Path) -> Result<Genome> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    let reader: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    parse_fasta(reader).map_err(|e| Error::io(path, e))
}

fn parse_fasta<R: BufRead>(mut reader: R) -> std::io::Result<Genome> {
    let mut acc = HashMap::new();
    let mut line = Vec::new();
    let mut header: Option<Vec<u8>> = None;
    let mut seq = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        if line.ends_with(b"\n") {
            line.pop();
        }

        if line.ends_with(b"\r") {
            line.pop();
        }

        if line.is_empty() {
            continue;
        }

        if line[0] == b'>' {
            let name = line[1..]
                .split(|b| b.is_ascii_whitespace())
                .next()
                .unwrap_or_default()
                .to_vec();

            if let Some(prev_header) = header.replace(name) {
                acc.insert(prev_header, std::mem::take(&mut seq));
            }
        } else {
            seq.extend_from_slice(&line);
        }
    }

    if let Some(last_header) = header {
        acc.insert(last_header, seq);
    }

    Ok(Genome { sequences: acc })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fasta_multiline_and_header_words() {
        let text = ">chr1 assembled chromosome\nAACC\nggtt\r\n\n>chr2\nTTT\n";
        let genome = parse_fasta(text.as_bytes()).unwrap();

        assert_eq!(genome.len(), 2);
        assert_eq!(genome.get("chr1"), Some(&b"AACCggtt"[..]));
        assert_eq!(genome.get("chr2"), Some(&b"TTT"[..]));
        assert_eq!(genome.get("chr1 assembled chromosome"), None);
    }

    #[test]
    fn test_reference_without_records_is_empty() {
        let genome = parse_fasta("\n\n".as_bytes()).unwrap();

        assert!(genome.is_empty());
        assert!(genome.subsequence("chr1", 0, 1).is_none());
    }

    #[test]
    fn test_subsequence_is_half_open() {
        let genome: Genome = [("chr1", "AACCGGTT")].into_iter().collect();

        assert_eq!(genome.subsequence("chr1", 0, 4).as_deref(), Some(&b"AACC"[..]));
        assert_eq!(genome.subsequence("chr1", 6, 8).as_deref(), Some(&b"TT"[..]));
    }

    #[test]
    fn test_subsequence_rejects_unplaceable_intervals() {
        let genome: Genome = [("chr1", "AACCGGTT")].into_iter().collect();

        assert!(genome.subsequence("chr2", 0, 4).is_none());
        assert!(genome.subsequence("chr1", 4, 9).is_none());
        assert!(genome.subsequence("chr1", 4, 4).is_none());
        assert!(genome.subsequence("chr1", 5, 2).is_none());
    }

    #[test]
    fn test_unsupported_reference_extension() {
        assert!(matches!(
            get_sequences("genome.txt"),
            Err(Error::UnsupportedReference { .. })
        ));
        assert!(matches!(
            get_sequences("regions.bed.gz"),
            Err(Error::UnsupportedReference { .. })
        ));
    }
}
