//! select merged peaks by replicate support
//!
//! Merged ChIP-seq peaks carry the list of samples each peak was called in.
//! This tool counts, per peak, how many distinct replicates of every
//! experimental group support it, keeps the peaks that pass a replicate
//! threshold for one group, and writes their locations (BED) and their
//! sequences from a reference genome (FASTA).
//!
//! # Usage
//!
//! ```bash
//! Usage: peakselect [OPTIONS] --gff <GFF> --group <GROUP> --sequence <SEQUENCE> <--equal_or_greater_than <N>|--equal_to <N>>
//!
//! Options:
//!   -g, --gff <GFF>                  Path to the merged-peak file (GFF-like, optionally .gz)
//!       --group <GROUP>              Group to filter on [possible values: G1, G2, G3, G4]
//!       --equal_or_greater_than <N>  Keep peaks found in this many replicates of the group or more
//!       --equal_to <N>               Keep peaks found in exactly this many replicates of the group
//!   -s, --sequence <SEQUENCE>        Path to reference genome (.fa, .fa.gz, or .2bit)
//!   -o, --outdir <OUTDIR>            Output directory for the BED and FASTA files [default: .]
//!   -l, --label <LABEL>              Label used in output names instead of the one taken from the GFF file name
//!   -L, --level <LEVEL>              Logging verbosity level [default: info]
//!   -h, --help                       Print help
//!   -V, --version                    Print version
//! ```
//!
//! Running `peakselect --gff CREB_merged.gff --group G2 --equal_to 2 -s rn6.fa`
//! writes `CREB_G2_replicatesEqualTo_2.bed` and `CREB_G2_replicatesEqualTo_2.fasta`.

pub mod cli;
pub mod consts;
pub mod core;
pub mod error;
pub mod export;
pub mod filter;
pub mod genome;
pub mod record;
pub mod replicates;

pub use cli::Args;
pub use crate::core::{Outputs, peakselect};
pub use error::{Error, Result};
pub use filter::Threshold;
pub use genome::{Genome, SequenceSource};
pub use replicates::{Group, GroupCounts};
