use crate::{
    cli::Args,
    consts::{BED_EXTENSION, FASTA_EXTENSION},
    error::{Error, Result},
    export::{FastaSummary, Interval, entity_label, output_stem, write_bed, write_fasta},
    filter::select_peaks,
    genome::{SequenceSource, get_sequences},
    record::read_peaks,
    replicates::count_peaks,
};

use log::info;

use std::{
    fs::{File, create_dir_all},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Paths of the files written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub bed: PathBuf,
    pub fasta: PathBuf,
}

/// Main processing function: count, filter, then export BED and FASTA.
///
/// Nothing is written until every peak has been counted and the reference
/// has been loaded.
pub fn peakselect(args: Args) -> Result<Outputs> {
    let threshold = args.threshold()?;
    let Args {
        gff,
        group,
        sequence,
        outdir,
        label,
        ..
    } = args;

    let peaks = count_peaks(read_peaks(&gff)?)?;
    let selected = select_peaks(peaks, group, threshold);
    let intervals: Vec<Interval> = selected
        .iter()
        .map(|p| Interval::from(&p.peak))
        .collect();

    let genome = get_sequences(&sequence)?;

    let label = label.unwrap_or_else(|| entity_label(&gff));
    let stem = output_stem(&label, group, threshold);
    let outputs = write_outputs(&intervals, &genome, &outdir, &stem)?;

    info!(
        "Wrote {} and {}",
        outputs.bed.display(),
        outputs.fasta.display()
    );

    Ok(outputs)
}

/// Writes `<stem>.bed` and `<stem>.fasta` into `outdir`.
pub fn write_outputs<S: SequenceSource + ?Sized>(
    intervals: &[Interval],
    source: &S,
    outdir: &Path,
    stem: &str,
) -> Result<Outputs> {
    create_dir_all(outdir).map_err(|e| Error::io(outdir, e))?;

    let outputs = Outputs {
        bed: outdir.join(format!("{}.{}", stem, BED_EXTENSION)),
        fasta: outdir.join(format!("{}.{}", stem, FASTA_EXTENSION)),
    };

    let bed = File::create(&outputs.bed).map_err(|e| Error::io(&outputs.bed, e))?;
    write_bed(intervals, BufWriter::new(bed)).map_err(|e| Error::io(&outputs.bed, e))?;
    info!("Wrote {} peaks to {}", intervals.len(), outputs.bed.display());

    let fasta = File::create(&outputs.fasta).map_err(|e| Error::io(&outputs.fasta, e))?;
    let FastaSummary { written, skipped } = write_fasta(intervals, source, BufWriter::new(fasta))
        .map_err(|e| Error::io(&outputs.fasta, e))?;
    info!(
        "Wrote {} sequences to {} ({} skipped)",
        written,
        outputs.fasta.display(),
        skipped
    );

    Ok(outputs)
}
