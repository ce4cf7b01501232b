//! select merged peaks by replicate support
//!
//! Reads the merged-peak GFF, keeps the peaks found in enough replicates of
//! one experimental group and writes their locations (BED) and sequences (FASTA).

use crate::{
    error::{Error, Result},
    filter::Threshold,
    replicates::Group,
};

use clap::{ArgGroup, Parser};
use log::Level;

use std::{fmt, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
#[command(group(
    ArgGroup::new("threshold")
        .required(true)
        .args(["equal_or_greater_than", "equal_to"])
))]
pub struct Args {
    /// Path to the merged-peak file (GFF-like, optionally .gz)
    #[arg(short = 'g', long)]
    pub gff: PathBuf,

    /// Group to filter on
    #[arg(long, value_enum)]
    pub group: Group,

    /// Keep peaks found in this many replicates of the group or more
    #[arg(long = "equal_or_greater_than", value_name = "N")]
    pub equal_or_greater_than: Option<usize>,

    /// Keep peaks found in exactly this many replicates of the group
    #[arg(long = "equal_to", value_name = "N")]
    pub equal_to: Option<usize>,

    /// Path to reference genome (.fa, .fa.gz, or .2bit)
    #[arg(short = 's', long)]
    pub sequence: PathBuf,

    /// Output directory for the BED and FASTA files
    #[arg(short = 'o', long, default_value = ".")]
    pub outdir: PathBuf,

    /// Label used in output names instead of the one taken from the GFF file name
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// Logging verbosity level
    #[arg(short = 'L', long, default_value = "info")]
    pub level: Level,
}

impl Args {
    /// Resolves the two mutually exclusive threshold flags into one value.
    ///
    /// Exactly one of `--equal_or_greater_than` and `--equal_to` must be set;
    /// `Args` built outside the argument parser are checked here as well.
    pub fn threshold(&self) -> Result<Threshold> {
        match (self.equal_or_greater_than, self.equal_to) {
            (Some(n), None) => Ok(Threshold::AtLeast(n)),
            (None, Some(n)) => Ok(Threshold::Exactly(n)),
            (None, None) => Err(Error::Threshold {
                reason: "one of --equal_or_greater_than or --equal_to is required",
            }),
            (Some(_), Some(_)) => Err(Error::Threshold {
                reason: "--equal_or_greater_than and --equal_to cannot be used together",
            }),
        }
    }
}

/// Formats the Args struct as a comma-separated string of key=value pairs.
impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let threshold = self
            .threshold()
            .map(|threshold| threshold.to_string())
            .unwrap_or_else(|_| "<invalid>".to_string());

        write!(
            f,
            "gff={}, group={}, threshold={}, sequence={}, outdir={}, label={}, level={}",
            self.gff.display(),
            self.group,
            threshold,
            self.sequence.display(),
            self.outdir.display(),
            self.label.as_deref().unwrap_or("<from gff>"),
            self.level,
        )
    }
}
