use super::{BandedMap, BankKey, OpenList, StatementBank, WritingSlots};
use crate::comments::domain::{Band, ConfigurationError, Subject, Variant, YearLevel};
use serde::Deserialize;
use std::collections::BTreeMap;

/// On-disk shape of a statement bank; banded slots are keyed by the band value as a string.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BankDocument {
    subject: Subject,
    year: YearLevel,
    variant: Variant,
    openers: Vec<String>,
    closers: Vec<String>,
    attitude: BTreeMap<String, String>,
    achievement: BTreeMap<String, String>,
    target: BTreeMap<String, String>,
    #[serde(default)]
    writing: Option<BTreeMap<String, String>>,
    #[serde(default)]
    writing_target: Option<BTreeMap<String, String>>,
}

pub(crate) fn parse_bank(origin: &str, json: &str) -> Result<StatementBank, ConfigurationError> {
    let document: BankDocument =
        serde_json::from_str(json).map_err(|source| ConfigurationError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    document.into_bank(origin)
}

impl BankDocument {
    fn into_bank(self, origin: &str) -> Result<StatementBank, ConfigurationError> {
        let invalid = |slot: &str, reason: String| ConfigurationError::InvalidBank {
            origin: origin.to_string(),
            reason: format!("{slot}: {reason}"),
        };

        let key = BankKey::new(self.subject, self.year, self.variant);
        let openers = OpenList::new(self.openers).map_err(|reason| invalid("openers", reason))?;
        let closers = OpenList::new(self.closers).map_err(|reason| invalid("closers", reason))?;
        let attitude = banded(self.attitude).map_err(|reason| invalid("attitude", reason))?;
        let achievement =
            banded(self.achievement).map_err(|reason| invalid("achievement", reason))?;
        let target = banded(self.target).map_err(|reason| invalid("target", reason))?;

        let writing = match (self.subject.has_writing(), self.writing, self.writing_target) {
            (true, Some(writing), Some(writing_target)) => Some(WritingSlots {
                achievement: banded(writing).map_err(|reason| invalid("writing", reason))?,
                target: banded(writing_target)
                    .map_err(|reason| invalid("writing_target", reason))?,
            }),
            (true, _, _) => {
                return Err(invalid(
                    "writing",
                    format!("{} banks need writing and writing_target", self.subject),
                ))
            }
            (false, None, None) => None,
            (false, _, _) => {
                return Err(invalid(
                    "writing",
                    format!("{} has no writing strand", self.subject),
                ))
            }
        };

        Ok(StatementBank {
            key,
            openers,
            closers,
            attitude,
            achievement,
            target,
            writing,
        })
    }
}

fn banded(raw: BTreeMap<String, String>) -> Result<BandedMap, String> {
    let mut entries = BTreeMap::new();
    for (key, text) in raw {
        let band = key
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(Band::new)
            .ok_or_else(|| format!("'{key}' is not a band value"))?;
        entries.insert(band, text);
    }
    BandedMap::new(entries)
}
