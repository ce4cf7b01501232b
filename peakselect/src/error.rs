pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("ERROR: cannot read or write \"{file}\": {source}")]
    FileIo {
        file: String,
        source: std::io::Error,
    },

    #[error("ERROR: line {line} in \"{file}\" has {found} columns, expected 9")]
    ColumnCount {
        file: String,
        line: usize,
        found: usize,
    },

    #[error("ERROR: cannot parse record on line {line} in \"{file}\": {source}")]
    ParseRecord {
        file: String,
        line: usize,
        source: csv::Error,
    },

    #[error("ERROR: no gene_id \"<samples>\" entry on line {line}: {field}")]
    MissingSampleList { line: usize, field: String },

    #[error("ERROR: Sample Name: {sample} does not fit in the format described in regex: {pattern}")]
    MalformedSample {
        sample: String,
        pattern: &'static str,
    },

    #[error("ERROR: Sample Name: {sample} has group '{group}', expected one of 1, 2, 3, 4")]
    UnknownGroup { sample: String, group: char },

    #[error("ERROR: invalid replicate threshold: {reason}")]
    Threshold { reason: &'static str },

    #[error("ERROR: unsupported reference format \"{file}\", expected FASTA (.gz) or .2bit")]
    UnsupportedReference { file: String },

    #[error("ERROR: cannot load reference \"{file}\": {reason}")]
    Reference { file: String, reason: String },
}

impl Error {
    pub(crate) fn io(file: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::FileIo {
            file: file.as_ref().display().to_string(),
            source,
        }
    }
}
