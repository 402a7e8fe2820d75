use super::document::parse_bank;
use super::{BankKey, StatementBank};
use crate::comments::domain::{ConfigurationError, Subject, Variant, YearLevel};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Lookup seam used by the generator and the batch driver.
pub trait BankSource: Send + Sync {
    fn resolve(
        &self,
        subject: Subject,
        year: YearLevel,
        variant: Variant,
    ) -> Result<&StatementBank, ConfigurationError>;
}

const EMBEDDED_BANKS: &[(&str, &str)] = &[
    ("year5_english_v1.json", include_str!("../../../data/banks/year5_english_v1.json")),
    ("year5_english_v2.json", include_str!("../../../data/banks/year5_english_v2.json")),
    ("year5_maths_v1.json", include_str!("../../../data/banks/year5_maths_v1.json")),
    ("year5_maths_v2.json", include_str!("../../../data/banks/year5_maths_v2.json")),
    ("year5_science_v1.json", include_str!("../../../data/banks/year5_science_v1.json")),
    ("year5_science_v2.json", include_str!("../../../data/banks/year5_science_v2.json")),
    ("year7_english_v1.json", include_str!("../../../data/banks/year7_english_v1.json")),
    ("year7_english_v2.json", include_str!("../../../data/banks/year7_english_v2.json")),
    ("year7_maths_v1.json", include_str!("../../../data/banks/year7_maths_v1.json")),
    ("year7_maths_v2.json", include_str!("../../../data/banks/year7_maths_v2.json")),
    ("year7_science_v1.json", include_str!("../../../data/banks/year7_science_v1.json")),
    ("year7_science_v2.json", include_str!("../../../data/banks/year7_science_v2.json")),
    ("year8_english_v1.json", include_str!("../../../data/banks/year8_english_v1.json")),
    ("year8_english_v2.json", include_str!("../../../data/banks/year8_english_v2.json")),
    ("year8_maths_v1.json", include_str!("../../../data/banks/year8_maths_v1.json")),
    ("year8_maths_v2.json", include_str!("../../../data/banks/year8_maths_v2.json")),
    ("year8_science_v1.json", include_str!("../../../data/banks/year8_science_v1.json")),
    ("year8_science_v2.json", include_str!("../../../data/banks/year8_science_v2.json")),
];

/// Statement banks loaded once at startup and validated for full coverage.
#[derive(Debug)]
pub struct BankRegistry {
    banks: HashMap<BankKey, StatementBank>,
}

impl BankRegistry {
    /// Banks compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigurationError> {
        Self::from_documents(EMBEDDED_BANKS.iter().copied())
    }

    /// Every `*.json` file in `dir`, replacing the embedded set wholesale.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigurationError> {
        let dir = dir.as_ref();
        let io_error = |source| ConfigurationError::Io {
            origin: dir.display().to_string(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let json = std::fs::read_to_string(&path).map_err(|source| ConfigurationError::Io {
                origin: path.display().to_string(),
                source,
            })?;
            documents.push((path.display().to_string(), json));
        }

        Self::from_documents(
            documents
                .iter()
                .map(|(origin, json)| (origin.as_str(), json.as_str())),
        )
    }

    pub fn from_documents<'a, I>(documents: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut banks = HashMap::new();
        for (origin, json) in documents {
            let bank = parse_bank(origin, json)?;
            let key = bank.key();
            if banks.insert(key, bank).is_some() {
                return Err(ConfigurationError::InvalidBank {
                    origin: origin.to_string(),
                    reason: format!("duplicate registration for {key}"),
                });
            }
        }

        let registry = Self { banks };
        registry.validate()?;
        info!(banks = registry.banks.len(), "statement banks registered");
        Ok(registry)
    }

    /// Fails on the first subject/year/variant combination without a bank.
    fn validate(&self) -> Result<(), ConfigurationError> {
        match BankKey::all().find(|key| !self.banks.contains_key(key)) {
            Some(key) => Err(ConfigurationError::MissingBank {
                subject: key.subject,
                year: key.year,
                variant: key.variant,
            }),
            None => Ok(()),
        }
    }

    pub fn select_bank(
        &self,
        subject: Subject,
        year: YearLevel,
        variant: Variant,
    ) -> Result<&StatementBank, ConfigurationError> {
        self.banks
            .get(&BankKey::new(subject, year, variant))
            .ok_or(ConfigurationError::MissingBank {
                subject,
                year,
                variant,
            })
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

impl BankSource for BankRegistry {
    fn resolve(
        &self,
        subject: Subject,
        year: YearLevel,
        variant: Variant,
    ) -> Result<&StatementBank, ConfigurationError> {
        self.select_bank(subject, year, variant)
    }
}
