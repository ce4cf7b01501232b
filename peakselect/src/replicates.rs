//! per-peak replicate support
//!
//! Every merged peak lists the samples it was called in. A sample token
//! encodes the experimental group and the replicate it belongs to, and
//! the support of a peak in a group is the number of distinct replicates
//! of that group among its samples.

use crate::{
    consts::{SAMPLE_LIST_PATTERN, SAMPLE_TOKEN_FORMAT, SAMPLE_TOKEN_PATTERN},
    error::{Error, Result},
    record::PeakRecord,
};

use clap::ValueEnum;
use log::{debug, info};
use rayon::prelude::*;
use regex::Regex;

use std::{collections::BTreeSet, fmt, sync::LazyLock};

static SAMPLE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SAMPLE_LIST_PATTERN).unwrap_or_else(|e| panic!("ERROR: invalid regex: {}", e))
});

static SAMPLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SAMPLE_TOKEN_PATTERN).unwrap_or_else(|e| panic!("ERROR: invalid regex: {}", e))
});

/// Experimental group a sample was assayed under.
///
/// Sample tokens carry the group as a single character (`1`..`4`); on the
/// command line and in output names the groups are `G1`..`G4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Group {
    #[value(name = "G1", alias = "1")]
    G1,
    #[value(name = "G2", alias = "2")]
    G2,
    #[value(name = "G3", alias = "3")]
    G3,
    #[value(name = "G4", alias = "4")]
    G4,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::G1, Group::G2, Group::G3, Group::G4];

    /// Maps the group character of a sample token to its group.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(Group::G1),
            '2' => Some(Group::G2),
            '3' => Some(Group::G3),
            '4' => Some(Group::G4),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Group::G1 => 0,
            Group::G2 => 1,
            Group::G3 => 2,
            Group::G4 => 3,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.index() + 1)
    }
}

/// Number of distinct replicates per group for a single peak.
///
/// Always holds a count for every group; groups without samples count zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupCounts([usize; 4]);

impl GroupCounts {
    pub fn get(&self, group: Group) -> usize {
        self.0[group.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Group, usize)> + '_ {
        Group::ALL.into_iter().map(|group| (group, self.get(group)))
    }
}

impl FromIterator<(Group, usize)> for GroupCounts {
    fn from_iter<I: IntoIterator<Item = (Group, usize)>>(iter: I) -> Self {
        let mut counts = GroupCounts::default();
        for (group, count) in iter {
            counts.0[group.index()] = count;
        }
        counts
    }
}

impl fmt::Display for GroupCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .iter()
            .map(|(group, count)| format!("{}={}", group, count))
            .collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Group and replicate encoded in one sample token, e.g. `S_12_GR_2b_1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleToken {
    pub group: Group,
    pub replicate: char,
}

impl SampleToken {
    /// Parses a sample token, failing on anything outside the sample schema.
    pub fn parse(sample: &str) -> Result<Self> {
        let malformed = || Error::MalformedSample {
            sample: sample.to_string(),
            pattern: SAMPLE_TOKEN_FORMAT,
        };

        let caps = SAMPLE_TOKEN.captures(sample).ok_or_else(malformed)?;
        let group_code = caps
            .name("group")
            .and_then(|m| m.as_str().chars().next())
            .ok_or_else(malformed)?;
        let replicate = caps
            .name("replicate")
            .and_then(|m| m.as_str().chars().next())
            .ok_or_else(malformed)?;

        let group = Group::from_code(group_code).ok_or_else(|| Error::UnknownGroup {
            sample: sample.to_string(),
            group: group_code,
        })?;

        Ok(SampleToken { group, replicate })
    }
}

/// A peak together with its replicate support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedPeak {
    pub peak: PeakRecord,
    pub counts: GroupCounts,
}

/// Returns the comma-separated sample list held in `gene_id "<samples>"`.
pub fn sample_list(attributes: &str) -> Option<&str> {
    SAMPLE_LIST
        .captures(attributes)
        .and_then(|caps| caps.name("samples"))
        .map(|m| m.as_str())
}

/// Counts distinct replicates per group among the samples of one peak.
pub fn count_replicates(peak: &PeakRecord) -> Result<GroupCounts> {
    let samples = sample_list(&peak.attributes).ok_or_else(|| Error::MissingSampleList {
        line: peak.line,
        field: peak.attributes.clone(),
    })?;

    let mut replicates: [BTreeSet<char>; 4] = Default::default();
    for sample in samples.split(',') {
        let token = SampleToken::parse(sample)?;
        replicates[token.group.index()].insert(token.replicate);
    }

    let counts: GroupCounts = Group::ALL
        .into_iter()
        .map(|group| (group, replicates[group.index()].len()))
        .collect();

    debug!("{} -> {}", peak, counts);

    Ok(counts)
}

/// Counts replicate support for every peak, keeping input order.
///
/// On failure the error of the earliest failing peak is returned.
pub fn count_peaks(peaks: Vec<PeakRecord>) -> Result<Vec<CountedPeak>> {
    info!("Counting replicate support for {} peaks", peaks.len());

    let counted: Vec<Result<CountedPeak>> = peaks
        .into_par_iter()
        .map(|peak| {
            let counts = count_replicates(&peak)?;
            Ok(CountedPeak { peak, counts })
        })
        .collect();

    counted.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(line: usize, samples: &str) -> PeakRecord {
        PeakRecord {
            chrom: "chr1".to_string(),
            source: "merge".to_string(),
            method: "peak".to_string(),
            start: 100 * line as u64,
            end: 100 * line as u64 + 50,
            score: ".".to_string(),
            strand: "+".to_string(),
            phase: ".".to_string(),
            attributes: format!("gene_id \"{}\"", samples),
            line,
        }
    }

    #[test]
    fn test_parse_sample_token() {
        assert_eq!(
            SampleToken::parse("S_12_GR_2b_1").unwrap(),
            SampleToken {
                group: Group::G2,
                replicate: 'b'
            }
        );
        assert_eq!(
            SampleToken::parse("S_3_pCREB_4a_10").unwrap(),
            SampleToken {
                group: Group::G4,
                replicate: 'a'
            }
        );
    }

    #[test]
    fn test_parse_uses_first_two_characters_of_group_field() {
        let token = SampleToken::parse("S_1_GR_1ax_2").unwrap();
        assert_eq!(token.group, Group::G1);
        assert_eq!(token.replicate, 'a');
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        let malformed = [
            "",
            "X_1_GR_1a_1",
            "S_1_GR_1a",
            "S_1_XX_1a_1",
            "S_1_GR_1_1",
            " S_1_GR_1a_1",
        ];

        for sample in malformed {
            match SampleToken::parse(sample) {
                Err(Error::MalformedSample { sample: s, pattern }) => {
                    assert_eq!(s, sample);
                    assert_eq!(pattern, SAMPLE_TOKEN_FORMAT);
                }
                other => panic!("{:?} should be malformed, got {:?}", sample, other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_unknown_group() {
        assert!(matches!(
            SampleToken::parse("S_1_GR_5a_1"),
            Err(Error::UnknownGroup { group: '5', .. })
        ));
    }

    #[test]
    fn test_sample_list_extraction() {
        assert_eq!(
            sample_list("gene_id \"S_1_GR_1a_1,S_2_GR_1b_1\""),
            Some("S_1_GR_1a_1,S_2_GR_1b_1")
        );
        assert_eq!(sample_list("ID=peak1"), None);
        assert_eq!(sample_list("gene_id \"\""), None);
    }

    #[test]
    fn test_counts_distinct_replicates_per_group() {
        let counts = count_replicates(&peak(
            1,
            "S_1_GR_1a_1,S_2_GR_1b_1,S_3_GR_2a_1,S_4_GR_2a_2,S_5_GR_2c_1,S_6_GR_3x_1",
        ))
        .unwrap();

        assert_eq!(counts.get(Group::G1), 2);
        assert_eq!(counts.get(Group::G2), 2);
        assert_eq!(counts.get(Group::G3), 1);
        assert_eq!(counts.get(Group::G4), 0);
    }

    #[test]
    fn test_counts_are_per_peak() {
        let counted = count_peaks(vec![peak(1, "S_1_GR_1a_1"), peak(2, "S_2_GR_1b_1")]).unwrap();

        assert_eq!(counted[0].counts.get(Group::G1), 1);
        assert_eq!(counted[1].counts.get(Group::G1), 1);
    }

    #[test]
    fn test_malformed_sample_aborts_counting() {
        let err = count_replicates(&peak(1, "S_1_GR_1a_1,bogus")).unwrap_err();
        assert!(matches!(err, Error::MalformedSample { ref sample, .. } if sample == "bogus"));

        let err = count_replicates(&peak(1, "S_1_GR_1a_1,")).unwrap_err();
        assert!(matches!(err, Error::MalformedSample { ref sample, .. } if sample.is_empty()));
    }

    #[test]
    fn test_missing_sample_list_is_fatal() {
        let mut record = peak(7, "S_1_GR_1a_1");
        record.attributes = "Name=peak7".to_string();

        assert!(matches!(
            count_replicates(&record),
            Err(Error::MissingSampleList { line: 7, .. })
        ));
    }

    #[test]
    fn test_count_peaks_reports_earliest_failure() {
        let err = count_peaks(vec![
            peak(3, "S_1_GR_1a_1"),
            peak(4, "first_bad"),
            peak(5, "second_bad"),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::MalformedSample { ref sample, .. } if sample == "first_bad"));
    }

    #[test]
    fn test_group_labels() {
        assert_eq!(<Group as ValueEnum>::from_str("G2", false), Ok(Group::G2));
        assert_eq!(<Group as ValueEnum>::from_str("4", false), Ok(Group::G4));
        assert!(<Group as ValueEnum>::from_str("G5", false).is_err());
        assert!(<Group as ValueEnum>::from_str("G12", false).is_err());
        assert_eq!(Group::from_code('3'), Some(Group::G3));
        assert_eq!(Group::from_code('a'), None);
        assert_eq!(Group::G3.to_string(), "G3");
        assert_eq!(
            GroupCounts::default().to_string(),
            "G1=0, G2=0, G3=0, G4=0"
        );
    }
}
