//! merged-peak annotation records
//!
//! The merged-peak file is GFF-like: a fixed two-line preamble followed by
//! nine tab-separated columns, the last one holding `gene_id "<samples>"`.

use crate::{
    consts::{GFF_COLUMNS, PREAMBLE_LINES},
    error::{Error, Result},
};

use flate2::read::MultiGzDecoder;
use log::{info, warn};
use serde::Deserialize;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// A single row of the merged-peak file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeakRecord {
    pub chrom: String,
    pub source: String,
    pub method: String,
    pub start: u64,
    pub end: u64,
    pub score: String,
    pub strand: String,
    pub phase: String,
    pub attributes: String,
    /// 1-based line in the input file.
    #[serde(skip)]
    pub line: usize,
}

impl std::fmt::Display for PeakRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{} (line {})", self.chrom, self.start, self.end, self.line)
    }
}

/// Reads every record of a merged-peak file, `.gz` input included.
pub fn read_peaks<P: AsRef<Path>>(path: P) -> Result<Vec<PeakRecord>> {
    let path = path.as_ref();
    info!("Reading peaks from file {}", path.display());

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    let peaks = parse_peaks(reader, &path.display().to_string())?;

    if peaks.is_empty() {
        warn!("WARN: no records found in {}", path.display());
    } else {
        info!("Read {} peaks from file {}", peaks.len(), path.display());
    }

    Ok(peaks)
}

/// Parses records from any buffered source; `origin` names the source in errors.
pub fn parse_peaks<R: BufRead>(mut reader: R, origin: &str) -> Result<Vec<PeakRecord>> {
    let mut skipped = Vec::new();
    for _ in 0..PREAMBLE_LINES {
        skipped.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut skipped)
            .map_err(|e| Error::io(origin, e))?;

        if bytes_read == 0 {
            return Ok(Vec::new());
        }
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut peaks = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| Error::ParseRecord {
            file: origin.to_string(),
            line: source.position().map_or(0, |pos| pos.line() as usize) + PREAMBLE_LINES,
            source,
        })?;

        let line = record
            .position()
            .map(|pos| pos.line() as usize + PREAMBLE_LINES)
            .unwrap_or(PREAMBLE_LINES + peaks.len() + 1);

        if record.len() != GFF_COLUMNS {
            return Err(Error::ColumnCount {
                file: origin.to_string(),
                line,
                found: record.len(),
            });
        }

        let mut peak: PeakRecord = record.deserialize(None).map_err(|source| Error::ParseRecord {
            file: origin.to_string(),
            line,
            source,
        })?;
        peak.line = line;
        peaks.push(peak);
    }

    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "##gff-version 3\n##merged peaks\n";

    fn parse(body: &str) -> Result<Vec<PeakRecord>> {
        let text = format!("{PREAMBLE}{body}");
        parse_peaks(text.as_bytes(), "test.gff")
    }

    #[test]
    fn test_reads_nine_columns_after_preamble() {
        let peaks = parse(
            "chr1\tmerge\tpeak\t100\t250\t.\t+\t.\tgene_id \"S_1_GR_1a_1\"\n\
             chr2\tmerge\tpeak\t5\t60\t12.5\t-\t0\tgene_id \"S_2_GR_2b_1,S_3_GR_2c_1\"\n",
        )
        .unwrap();

        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].chrom, "chr1");
        assert_eq!((peaks[0].start, peaks[0].end), (100, 250));
        assert_eq!(peaks[0].line, 3);
        assert_eq!(peaks[1].score, "12.5");
        assert_eq!(peaks[1].attributes, "gene_id \"S_2_GR_2b_1,S_3_GR_2c_1\"");
        assert_eq!(peaks[1].line, 4);
    }

    #[test]
    fn test_preamble_is_skipped_even_if_it_looks_like_data() {
        let text = "chr9\ta\tb\t1\t2\t.\t+\t.\tgene_id \"x\"\n\
                    chr9\ta\tb\t3\t4\t.\t+\t.\tgene_id \"x\"\n\
                    chr1\ta\tb\t5\t6\t.\t+\t.\tgene_id \"S_1_GR_1a_1\"\n";
        let peaks = parse_peaks(text.as_bytes(), "test.gff").unwrap();

        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].start, 5);
    }

    #[test]
    fn test_wrong_column_count_is_fatal() {
        let err = parse("chr1\tmerge\tpeak\t100\t250\t.\t+\n").unwrap_err();

        match err {
            Error::ColumnCount { line, found, .. } => {
                assert_eq!(line, 3);
                assert_eq!(found, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_integer_coordinate_is_fatal() {
        let err = parse("chr1\tmerge\tpeak\tabc\t250\t.\t+\t.\tgene_id \"S_1_GR_1a_1\"\n")
            .unwrap_err();

        assert!(matches!(err, Error::ParseRecord { line: 3, .. }));
    }

    #[test]
    fn test_short_file_has_no_records() {
        assert!(parse_peaks("##only one line\n".as_bytes(), "x").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_lines_are_ignored() {
        let peaks = parse("\nchr1\tm\tp\t1\t2\t.\t+\t.\tgene_id \"S_1_GR_1a_1\"\n\n").unwrap();
        assert_eq!(peaks.len(), 1);
    }
}
