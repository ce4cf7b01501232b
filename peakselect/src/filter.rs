//! replicate-support thresholds

use crate::replicates::{CountedPeak, Group};

use log::info;

use std::fmt;

/// How many replicates of the selected group a peak must be found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// `count >= n`
    AtLeast(usize),
    /// `count == n`
    Exactly(usize),
}

impl Threshold {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Threshold::AtLeast(n) => count >= n,
            Threshold::Exactly(n) => count == n,
        }
    }
}

/// Describes the threshold the way output files are named,
/// e.g. `replicatesEqualOrGreaterThan_2`.
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::AtLeast(n) => write!(f, "replicatesEqualOrGreaterThan_{}", n),
            Threshold::Exactly(n) => write!(f, "replicatesEqualTo_{}", n),
        }
    }
}

/// Keeps the peaks whose support in `group` satisfies `threshold`, in input order.
pub fn select_peaks(
    peaks: Vec<CountedPeak>,
    group: Group,
    threshold: Threshold,
) -> Vec<CountedPeak> {
    let total = peaks.len();
    let selected: Vec<CountedPeak> = peaks
        .into_iter()
        .filter(|peak| threshold.accepts(peak.counts.get(group)))
        .collect();

    info!(
        "Kept {} of {} peaks with {} {}",
        selected.len(),
        total,
        group,
        threshold
    );

    selected
}
