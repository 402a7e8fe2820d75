use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    #[serde(alias = "English")]
    English,
    #[serde(alias = "Maths", alias = "math", alias = "Math")]
    Maths,
    #[serde(alias = "Science")]
    Science,
}

impl Subject {
    pub const fn ordered() -> [Self; 3] {
        [Self::English, Self::Maths, Self::Science]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Maths => "Maths",
            Self::Science => "Science",
        }
    }

    /// English reports a separate writing strand with its own target.
    pub const fn has_writing(self) -> bool {
        matches!(self, Self::English)
    }

    pub(crate) const fn achievement_prefix(self) -> Option<&'static str> {
        match self {
            Self::English => Some("In reading,"),
            Self::Maths | Self::Science => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(Self::English),
            "maths" | "math" | "mathematics" => Ok(Self::Maths),
            "science" => Ok(Self::Science),
            other => Err(format!(
                "unknown subject '{other}': expected English, Maths or Science"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum YearLevel {
    Year5,
    Year7,
    Year8,
}

impl YearLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Year5, Self::Year7, Self::Year8]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Year5 => 5,
            Self::Year7 => 7,
            Self::Year8 => 8,
        }
    }
}

impl TryFrom<u8> for YearLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Year5),
            7 => Ok(Self::Year7),
            8 => Ok(Self::Year8),
            other => Err(format!("unsupported year {other}: expected 5, 7 or 8")),
        }
    }
}

impl From<YearLevel> for u8 {
    fn from(value: YearLevel) -> Self {
        value.number()
    }
}

impl FromStr for YearLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("Year ")
            .or_else(|| trimmed.strip_prefix("year "))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .map_err(|_| format!("unsupported year '{trimmed}': expected 5, 7 or 8"))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Alternate phrasing set registered for the same subject and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Variant {
    First,
    Second,
}

impl Variant {
    pub const fn ordered() -> [Self; 2] {
        [Self::First, Self::Second]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    pub const fn alternate(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl TryFrom<u8> for Variant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(format!("unknown variant {other}: expected 1 or 2")),
        }
    }
}

impl From<Variant> for u8 {
    fn from(value: Variant) -> Self {
        value.number()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// How a generation call picks between the registered phrasing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantChoice {
    Fixed(Variant),
    /// Uniform draw on every call; repeats across calls are allowed.
    #[default]
    Random,
}

impl VariantChoice {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Variant {
        match self {
            Self::Fixed(variant) => variant,
            Self::Random if rng.gen_bool(0.5) => Variant::Second,
            Self::Random => Variant::First,
        }
    }
}

impl From<Option<Variant>> for VariantChoice {
    fn from(value: Option<Variant>) -> Self {
        value.map_or(Self::Random, Self::Fixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    /// Lenient parse: anything that is not recognisably male or female is unspecified.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unspecified,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unspecified => "Unspecified",
        }
    }

    pub const fn pronouns(self) -> Pronouns {
        match self {
            Self::Male => Pronouns::new("he", "his"),
            Self::Female => Pronouns::new("she", "her"),
            Self::Unspecified => Pronouns::new("they", "their"),
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.label().to_string()
    }
}

/// Subject and possessive forms; object and reflexive forms are derived from the subject form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronouns {
    pub subject: &'static str,
    pub possessive: &'static str,
}

impl Pronouns {
    pub const fn new(subject: &'static str, possessive: &'static str) -> Self {
        Self {
            subject,
            possessive,
        }
    }

    pub fn object(&self) -> &'static str {
        match self.subject {
            "he" => "him",
            "she" => "her",
            _ => "them",
        }
    }

    pub fn reflexive(&self) -> &'static str {
        match self.subject {
            "he" => "himself",
            "she" => "herself",
            _ => "themselves",
        }
    }
}

/// One of the nine assessment levels used as a statement-bank key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Band(u8);

impl Band {
    pub const VALUES: [u8; 9] = [90, 85, 80, 75, 70, 65, 60, 55, 40];

    pub fn all() -> impl Iterator<Item = Band> {
        Self::VALUES.into_iter().map(Band)
    }

    pub fn new(value: u32) -> Option<Self> {
        Self::VALUES
            .iter()
            .copied()
            .find(|band| u32::from(*band) == value)
            .map(Band)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<Band> for u8 {
    fn from(value: Band) -> Self {
        value.0
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandSlot {
    Attitude,
    Achievement,
    Target,
}

impl BandSlot {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attitude => "attitude",
            Self::Achievement => "achievement",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for BandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Details for one student, as typed into the form or read from one CSV row.
///
/// Band scores stay raw here; the generator validates them against [`Band::VALUES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    pub subject: Subject,
    pub year: YearLevel,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub attitude: u32,
    pub achievement: u32,
    pub target: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addendum: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthStatus {
    /// At least fifty characters of headroom under the budget.
    Comfortable,
    NearLimit,
}

impl LengthStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Comfortable => "Perfect length",
            Self::NearLimit => "Near limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedComment {
    text: String,
}

impl GeneratedComment {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn length_status(&self, char_budget: usize) -> LengthStatus {
        if self.char_count() + 50 < char_budget {
            LengthStatus::Comfortable
        } else {
            LengthStatus::NearLimit
        }
    }
}

impl fmt::Display for GeneratedComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("{slot} band {value} is not one of 90, 85, 80, 75, 70, 65, 60, 55, 40")]
    InvalidBand { slot: BandSlot, value: u32 },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Problems with the registered statement banks themselves, never with a student's input.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no statement bank registered for {subject} year {year} variant {variant}")]
    MissingBank {
        subject: Subject,
        year: YearLevel,
        variant: Variant,
    },
    #[error("statement bank {origin} is invalid: {reason}")]
    InvalidBank { origin: String, reason: String },
    #[error("statement bank {origin} is not valid JSON: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
    #[error("could not read statement banks from {origin}: {source}")]
    Io {
        origin: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_accepts_only_the_fixed_domain() {
        let accepted: Vec<u8> = (0..=120).filter_map(Band::new).map(Band::value).collect();
        assert_eq!(accepted, vec![40, 55, 60, 65, 70, 75, 80, 85, 90]);
        assert!(Band::new(45).is_none());
        assert!(Band::new(999).is_none());
        assert_eq!(Band::all().count(), 9);
    }

    #[test]
    fn gender_parsing_is_lenient() {
        assert_eq!(Gender::from_label(" Female "), Gender::Female);
        assert_eq!(Gender::from_label("M"), Gender::Male);
        assert_eq!(Gender::from_label("non-binary"), Gender::Unspecified);
        assert_eq!(Gender::from_label(""), Gender::Unspecified);
    }

    #[test]
    fn pronoun_forms_follow_gender() {
        let she = Gender::Female.pronouns();
        assert_eq!((she.subject, she.possessive), ("she", "her"));
        assert_eq!((she.object(), she.reflexive()), ("her", "herself"));

        let they = Gender::Unspecified.pronouns();
        assert_eq!((they.subject, they.possessive), ("they", "their"));
        assert_eq!((they.object(), they.reflexive()), ("them", "themselves"));

        assert_eq!(Gender::Male.pronouns().reflexive(), "himself");
    }

    #[test]
    fn subject_and_year_parse_from_form_values() {
        assert_eq!("Maths".parse::<Subject>(), Ok(Subject::Maths));
        assert_eq!("mathematics".parse::<Subject>(), Ok(Subject::Maths));
        assert!("History".parse::<Subject>().is_err());
        assert_eq!("7".parse::<YearLevel>(), Ok(YearLevel::Year7));
        assert_eq!("Year 8".parse::<YearLevel>(), Ok(YearLevel::Year8));
        assert!("6".parse::<YearLevel>().is_err());
        assert!("seven".parse::<YearLevel>().is_err());
    }

    #[test]
    fn student_input_deserializes_from_form_json() {
        let input: StudentInput = serde_json::from_str(
            r#"{"subject":"English","year":5,"name":"sarah","gender":"Female",
                "attitude":75,"achievement":80,"target":85}"#,
        )
        .expect("valid payload");
        assert_eq!(input.subject, Subject::English);
        assert_eq!(input.year, YearLevel::Year5);
        assert_eq!(input.gender, Gender::Female);
        assert!(input.addendum.is_none());

        let bad_year = serde_json::from_str::<StudentInput>(
            r#"{"subject":"maths","year":6,"name":"x","attitude":75,"achievement":75,"target":75}"#,
        );
        assert!(bad_year.is_err());
    }

    #[test]
    fn length_status_leaves_fifty_characters_of_headroom() {
        let short = GeneratedComment::new("a".repeat(448));
        assert_eq!(short.length_status(499), LengthStatus::Comfortable);
        let long = GeneratedComment::new("a".repeat(449));
        assert_eq!(long.length_status(499), LengthStatus::NearLimit);
    }

    #[test]
    fn generated_comment_counts_words_and_characters() {
        let comment = GeneratedComment::new("Zoë read  widely. She improved.".to_string());
        assert_eq!(comment.char_count(), 31);
        assert_eq!(comment.word_count(), 5);
        assert_eq!(Variant::First.alternate(), Variant::Second);
    }

    #[test]
    fn random_choice_reaches_both_variants() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let drawn: std::collections::HashSet<Variant> = (0..64)
            .map(|_| VariantChoice::Random.resolve(&mut rng))
            .collect();
        assert_eq!(drawn.len(), 2);
        assert_eq!(
            VariantChoice::Fixed(Variant::Second).resolve(&mut rng),
            Variant::Second
        );
    }
}
