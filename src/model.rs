//! Input data for a report export.
//!
//! The types here are plain, serialization-friendly values assembled by the
//! application from persisted or freshly computed assessment results. Missing
//! text fields deserialize to empty strings so that a partially filled payload
//! still lays out instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::readiness::{ActionPlan, ReadinessLevel};

/// The two survey variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    #[serde(alias = "c-level")]
    CLevel,
    #[default]
    Shopfloor,
}

impl AssessmentKind {
    /// Identifier used in file names and payloads.
    pub fn slug(self) -> &'static str {
        match self {
            AssessmentKind::CLevel => "c_level",
            AssessmentKind::Shopfloor => "shopfloor",
        }
    }

    /// Audience label printed on the summary page.
    pub fn audience(self) -> &'static str {
        match self {
            AssessmentKind::CLevel => "C-Level Management",
            AssessmentKind::Shopfloor => "Shopfloor Operators",
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AssessmentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "c_level" | "clevel" => Ok(AssessmentKind::CLevel),
            "shopfloor" | "shop_floor" => Ok(AssessmentKind::Shopfloor),
            other => Err(format!(
                "unknown assessment kind `{other}`; expected `c_level` or `shopfloor`"
            )),
        }
    }
}

/// One answered (or unanswered) questionnaire item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionAnswer {
    pub question_id: u32,
    #[serde(alias = "question")]
    pub question_text: String,
    pub category: String,
    /// `0` means unanswered, otherwise `1..=5`.
    #[serde(alias = "answer")]
    pub answer_value: u8,
}

impl QuestionAnswer {
    pub fn new(
        question_id: u32,
        question_text: impl Into<String>,
        category: impl Into<String>,
        answer_value: u8,
    ) -> Self {
        Self {
            question_id,
            question_text: question_text.into(),
            category: category.into(),
            answer_value,
        }
    }
}

/// Urgency attached to a recommendation.
///
/// Values that are missing or not recognised fall back to `Low`, which is how
/// the badge colour has always been chosen for unexpected input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn name(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from(value.as_str())
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A model-generated recommendation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub timeline: String,
    pub impact: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = timeline.into();
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }
}

/// Everything the layout engine needs to produce a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportModel {
    assessment_kind: AssessmentKind,
    total_score: u32,
    readiness_level: Option<ReadinessLevel>,
    completion_date: String,
    questions: Vec<QuestionAnswer>,
    recommendations: Vec<Recommendation>,
}

impl ReportModel {
    /// Creates a model whose readiness tier is derived from `total_score`.
    pub fn new(assessment_kind: AssessmentKind, total_score: u32) -> Self {
        Self {
            assessment_kind,
            total_score,
            ..Self::default()
        }
    }

    pub fn assessment_kind(&self) -> AssessmentKind {
        self.assessment_kind
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Returns the explicit tier if one was supplied, otherwise the tier for the score.
    pub fn readiness_level(&self) -> ReadinessLevel {
        self.readiness_level
            .unwrap_or_else(|| ReadinessLevel::from_score(self.total_score))
    }

    pub fn completion_date(&self) -> &str {
        &self.completion_date
    }

    pub fn questions(&self) -> &[QuestionAnswer] {
        &self.questions
    }

    /// Fixed plan for the model's tier.
    pub fn action_plan(&self) -> &'static ActionPlan {
        self.readiness_level().action_plan()
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Overrides the derived tier and returns the updated model.
    pub fn with_readiness_level(mut self, level: impl Into<Option<ReadinessLevel>>) -> Self {
        self.readiness_level = level.into();
        self
    }

    pub fn with_completion_date(mut self, date: impl Into<String>) -> Self {
        self.completion_date = date.into();
        self
    }

    pub fn with_question(mut self, question: QuestionAnswer) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_questions<I>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = QuestionAnswer>,
    {
        self.questions.extend(questions);
        self
    }

    pub fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendations.push(recommendation);
        self
    }

    pub(crate) fn replace_recommendations(mut self, recommendations: Vec<Recommendation>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_recommendations<I>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = Recommendation>,
    {
        self.recommendations.extend(recommendations);
        self
    }
}
