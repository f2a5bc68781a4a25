use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format used for record timestamps in summaries.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// ────────────────────────────────────────────────────────────────────────────
// Form enumerations
// ────────────────────────────────────────────────────────────────────────────

/// MYP year, 1 through 5. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MypLevel(u8);

impl MypLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = MypLevel> {
        (Self::MIN..=Self::MAX).map(MypLevel)
    }
}

impl Default for MypLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for MypLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MypLevel::new(value).ok_or_else(|| {
            format!(
                "MYP level must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<MypLevel> for u8 {
    fn from(level: MypLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MypLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Algebra,
    Number,
    Geometry,
    Statistics,
    Probability,
    Functions,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Algebra,
        Topic::Number,
        Topic::Geometry,
        Topic::Statistics,
        Topic::Probability,
        Topic::Functions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Algebra => "Algebra",
            Topic::Number => "Number",
            Topic::Geometry => "Geometry",
            Topic::Statistics => "Statistics",
            Topic::Probability => "Probability",
            Topic::Functions => "Functions",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MYP mathematics assessment criteria.
/// Accepts the short letter, the long label, or "Criterion X" on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "A", alias = "A: Knowing & Understanding", alias = "Criterion A")]
    KnowingAndUnderstanding,
    #[serde(rename = "B", alias = "B: Investigating Patterns", alias = "Criterion B")]
    InvestigatingPatterns,
    #[serde(rename = "C", alias = "C: Communicating", alias = "Criterion C")]
    Communicating,
    #[serde(rename = "D", alias = "D: Applying in Real Life", alias = "Criterion D")]
    ApplyingInRealLife,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::KnowingAndUnderstanding,
        Criterion::InvestigatingPatterns,
        Criterion::Communicating,
        Criterion::ApplyingInRealLife,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Criterion::KnowingAndUnderstanding => "A: Knowing & Understanding",
            Criterion::InvestigatingPatterns => "B: Investigating Patterns",
            Criterion::Communicating => "C: Communicating",
            Criterion::ApplyingInRealLife => "D: Applying in Real Life",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[default]
    #[serde(alias = "Low")]
    Beginner,
    #[serde(alias = "Medium")]
    Intermediate,
    #[serde(alias = "High")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which content strategy a session generates with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Remote,
    #[default]
    Canned,
}

// ────────────────────────────────────────────────────────────────────────────
// Request and record
// ────────────────────────────────────────────────────────────────────────────

fn default_criteria() -> Vec<Criterion> {
    vec![Criterion::InvestigatingPatterns]
}

/// Form inputs for a single generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub level: MypLevel,
    pub topic: Topic,
    #[serde(default = "default_criteria")]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub context: Option<String>,
}

impl AssessmentRequest {
    /// Drops duplicate criteria (first occurrence wins) and blank context.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.criteria.len());
        self.criteria.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });

        self.context = self
            .context
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    pub level: MypLevel,
    pub topic: Topic,
    pub criteria: Vec<Criterion>,
    pub difficulty: Difficulty,
    pub context: Option<String>,
    pub provider: ProviderKind,
    pub created_at: DateTime<Utc>,
}

impl AssessmentMetadata {
    pub fn display_date(&self) -> String {
        self.created_at.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// One generated or canned assessment. Immutable once appended to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub metadata: AssessmentMetadata,
}
