//! fixed formats of the merged-peak annotation file

/// Lines at the top of the merged-peak file that carry no records.
pub const PREAMBLE_LINES: usize = 2;

/// Columns of a merged-peak record: chr, source, method, start, end, score, strand, phase, geneID.
pub const GFF_COLUMNS: usize = 9;

/// Locates the comma-separated sample list inside the attribute column.
pub const SAMPLE_LIST_PATTERN: &str = r#"^gene_id "(?P<samples>.+)""#;

/// Schema of one sample token: `S_<n>_<antibody>_<group><replicate>..._<n>`.
pub const SAMPLE_TOKEN_PATTERN: &str = concat!(
    r"^S_\d+_[GR,pCREB]+_",
    r"(?P<group>[[:alnum:]])(?P<replicate>[[:alnum:]])\w*_\d+"
);

/// Human-readable form of the sample schema, reported on malformed tokens.
pub const SAMPLE_TOKEN_FORMAT: &str = r"S_\d+_[GR,pCREB]+_(\w+)_\d+";

pub const BED_EXTENSION: &str = "bed";
pub const FASTA_EXTENSION: &str = "fasta";
