//! BED and FASTA output of selected peaks

use crate::{filter::Threshold, genome::SequenceSource, record::PeakRecord, replicates::Group};

use log::warn;

use std::{
    fmt,
    io::{self, Write},
    path::Path,
};

/// Peak coordinates as written to BED, copied verbatim from the peak record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl From<&PeakRecord> for Interval {
    fn from(peak: &PeakRecord) -> Self {
        Interval {
            chrom: peak.chrom.clone(),
            start: peak.start,
            end: peak.end,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Outcome of a FASTA export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastaSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Label of the assayed factor, taken from the input file name up to the
/// first `_` (`CREB_merged.gff` -> `CREB`).
pub fn entity_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.split_once('_') {
        Some((label, _)) => label.to_string(),
        None => name,
    }
}

/// Common stem of both output files, e.g. `CREB_G2_replicatesEqualTo_2`.
pub fn output_stem(label: &str, group: Group, threshold: Threshold) -> String {
    format!("{}_{}_{}", label, group, threshold)
}

/// Writes `chrom\tstart\tend` lines, no header.
pub fn write_bed<W: Write>(intervals: &[Interval], mut writer: W) -> io::Result<()> {
    for interval in intervals {
        writeln!(
            writer,
            "{}\t{}\t{}",
            interval.chrom, interval.start, interval.end
        )?;
    }

    writer.flush()
}

/// Writes one `>chrom:start-end` entry per interval the source can place;
/// the others are skipped with a warning.
pub fn write_fasta<S, W>(
    intervals: &[Interval],
    source: &S,
    mut writer: W,
) -> io::Result<FastaSummary>
where
    S: SequenceSource + ?Sized,
    W: Write,
{
    let mut summary = FastaSummary::default();

    for interval in intervals {
        match source.subsequence(&interval.chrom, interval.start, interval.end) {
            Some(seq) => {
                writer.write_all(b">")?;
                writer.write_all(interval.to_string().as_bytes())?;
                writer.write_all(b"\n")?;
                writer.write_all(&seq)?;
                writer.write_all(b"\n")?;
                summary.written += 1;
            }
            None => {
                warn!(
                    "WARN: cannot extract {} from the reference, skipping",
                    interval
                );
                summary.skipped += 1;
            }
        }
    }

    writer.flush()?;

    Ok(summary)
}
