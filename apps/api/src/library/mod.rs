//! Read-only views over a session's assessment library: summaries and usage analytics.

pub mod export;
pub mod handlers;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::assessment::{AssessmentRecord, Difficulty, MypLevel, ProviderKind, Topic};

/// Characters of context shown in a library summary.
const CONTEXT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub id: u32,
    pub title: String,
    pub level: MypLevel,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub provider: ProviderKind,
    pub date: String,
    pub context_preview: Option<String>,
}

impl From<&AssessmentRecord> for AssessmentSummary {
    fn from(record: &AssessmentRecord) -> Self {
        let meta = &record.metadata;
        Self {
            id: record.id,
            title: record.title.clone(),
            level: meta.level,
            topic: meta.topic,
            difficulty: meta.difficulty,
            provider: meta.provider,
            date: meta.display_date(),
            context_preview: meta.context.as_deref().map(context_preview),
        }
    }
}

fn context_preview(context: &str) -> String {
    let mut chars = context.chars();
    let head: String = chars.by_ref().take(CONTEXT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: Topic,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: Difficulty,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestAssessment {
    pub topic: Topic,
    pub level: MypLevel,
}

/// Usage analytics for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAnalytics {
    pub total: usize,
    pub topics_covered: usize,
    pub most_used_level: Option<MypLevel>,
    /// Descending by count, ties in topic order.
    pub by_topic: Vec<TopicCount>,
    /// In difficulty order; only difficulties that occur.
    pub by_difficulty: Vec<DifficultyCount>,
    pub latest: Option<LatestAssessment>,
}

pub fn compute_analytics(records: &[AssessmentRecord]) -> LibraryAnalytics {
    let mut topics: BTreeMap<Topic, usize> = BTreeMap::new();
    let mut levels: BTreeMap<MypLevel, usize> = BTreeMap::new();
    let mut difficulties: BTreeMap<Difficulty, usize> = BTreeMap::new();

    for record in records {
        *topics.entry(record.metadata.topic).or_default() += 1;
        *levels.entry(record.metadata.level).or_default() += 1;
        *difficulties.entry(record.metadata.difficulty).or_default() += 1;
    }

    // Strict `>` keeps the lowest level on ties.
    let mut most_used_level: Option<(MypLevel, usize)> = None;
    for (&level, &count) in &levels {
        if most_used_level.map_or(true, |(_, best)| count > best) {
            most_used_level = Some((level, count));
        }
    }

    let mut by_topic: Vec<TopicCount> = topics
        .iter()
        .map(|(&topic, &count)| TopicCount { topic, count })
        .collect();
    // Stable sort keeps topic order among equal counts.
    by_topic.sort_by(|a, b| b.count.cmp(&a.count));

    LibraryAnalytics {
        total: records.len(),
        topics_covered: topics.len(),
        most_used_level: most_used_level.map(|(level, _)| level),
        by_topic,
        by_difficulty: difficulties
            .into_iter()
            .map(|(difficulty, count)| DifficultyCount { difficulty, count })
            .collect(),
        latest: records.last().map(|r| LatestAssessment {
            topic: r.metadata.topic,
            level: r.metadata.level,
        }),
    }
}
