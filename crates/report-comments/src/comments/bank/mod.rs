mod document;
mod registry;

pub use registry::{BankRegistry, BankSource};

use super::domain::{Band, Subject, Variant, YearLevel};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BankKey {
    pub subject: Subject,
    pub year: YearLevel,
    pub variant: Variant,
}

impl BankKey {
    pub const fn new(subject: Subject, year: YearLevel, variant: Variant) -> Self {
        Self {
            subject,
            year,
            variant,
        }
    }

    /// Every combination the registry must cover.
    pub fn all() -> impl Iterator<Item = BankKey> {
        Subject::ordered().into_iter().flat_map(|subject| {
            YearLevel::ordered().into_iter().flat_map(move |year| {
                Variant::ordered()
                    .into_iter()
                    .map(move |variant| BankKey::new(subject, year, variant))
            })
        })
    }
}

impl fmt::Display for BankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year {} variant {}",
            self.subject, self.year, self.variant
        )
    }
}

/// Candidate phrases of which one is drawn uniformly per comment. Never empty.
#[derive(Debug, Clone)]
pub struct OpenList(Vec<String>);

impl OpenList {
    pub(crate) fn new(phrases: Vec<String>) -> Result<Self, String> {
        if phrases.is_empty() {
            return Err("list has no phrases".to_string());
        }
        if let Some(position) = phrases.iter().position(|phrase| phrase.trim().is_empty()) {
            return Err(format!("phrase {} is blank", position + 1));
        }
        Ok(Self(phrases))
    }

    pub fn phrases(&self) -> &[String] {
        &self.0
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.0.choose(rng).map(String::as_str).unwrap_or_default()
    }
}

/// One template per band; construction guarantees every band is present.
#[derive(Debug, Clone)]
pub struct BandedMap(BTreeMap<Band, String>);

impl BandedMap {
    pub(crate) fn new(entries: BTreeMap<Band, String>) -> Result<Self, String> {
        let missing: Vec<String> = Band::all()
            .filter(|band| !entries.contains_key(band))
            .map(|band| band.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing bands {}", missing.join(", ")));
        }
        if let Some((band, _)) = entries.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(format!("band {band} has blank text"));
        }
        Ok(Self(entries))
    }

    pub fn get(&self, band: Band) -> &str {
        self.0.get(&band).map(String::as_str).unwrap_or_default()
    }
}

/// Reading/writing split used by subjects with a writing strand.
#[derive(Debug, Clone)]
pub struct WritingSlots {
    pub achievement: BandedMap,
    pub target: BandedMap,
}

/// Immutable template collection for one subject, year and variant.
#[derive(Debug, Clone)]
pub struct StatementBank {
    key: BankKey,
    openers: OpenList,
    closers: OpenList,
    attitude: BandedMap,
    achievement: BandedMap,
    target: BandedMap,
    writing: Option<WritingSlots>,
}

impl StatementBank {
    pub fn key(&self) -> BankKey {
        self.key
    }

    pub fn openers(&self) -> &OpenList {
        &self.openers
    }

    pub fn closers(&self) -> &OpenList {
        &self.closers
    }

    pub fn attitude(&self) -> &BandedMap {
        &self.attitude
    }

    /// Reading for English, the subject strand otherwise.
    pub fn achievement(&self) -> &BandedMap {
        &self.achievement
    }

    pub fn target(&self) -> &BandedMap {
        &self.target
    }

    pub fn writing(&self) -> Option<&WritingSlots> {
        self.writing.as_ref()
    }
}
