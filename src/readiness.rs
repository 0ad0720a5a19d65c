//! The four readiness tiers and the fixed content attached to each of them.
//!
//! This module is the single source of truth for the score thresholds, tier
//! colours, descriptions, and action plans. The scoring helpers, the report
//! model, and the layout engine all read from here.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::style::Rgb;

/// Lowest possible total score (12 questions answered with 1).
pub const MIN_SCORE: u32 = 12;
/// Highest possible total score (12 questions answered with 5).
pub const MAX_SCORE: u32 = 60;

/// Ordered readiness tiers derived from a total score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadinessLevel {
    Beginner,
    Developing,
    Advanced,
    Leader,
}

/// Fixed action plan shown for a readiness tier.
#[derive(Debug, PartialEq, Eq)]
pub struct ActionPlan {
    pub title: &'static str,
    pub meaning: &'static str,
    pub next_steps: &'static [&'static str],
}

impl ReadinessLevel {
    /// All tiers in ascending order.
    pub const ALL: [ReadinessLevel; 4] = [
        ReadinessLevel::Beginner,
        ReadinessLevel::Developing,
        ReadinessLevel::Advanced,
        ReadinessLevel::Leader,
    ];

    /// Maps a total score onto its tier. Scores below the semantic range fall
    /// into `Beginner`, scores above it into `Leader`.
    pub fn from_score(score: u32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| score >= *level.range().start())
            .unwrap_or(ReadinessLevel::Beginner)
    }

    /// Inclusive score range covered by the tier.
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            ReadinessLevel::Beginner => MIN_SCORE..=24,
            ReadinessLevel::Developing => 25..=36,
            ReadinessLevel::Advanced => 37..=48,
            ReadinessLevel::Leader => 49..=MAX_SCORE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReadinessLevel::Beginner => "Beginner",
            ReadinessLevel::Developing => "Developing",
            ReadinessLevel::Advanced => "Advanced",
            ReadinessLevel::Leader => "Leader",
        }
    }

    /// Colour used when the tier name is drawn on the summary page.
    pub fn color(self) -> Rgb {
        match self {
            ReadinessLevel::Leader => Rgb(16, 185, 129),
            ReadinessLevel::Advanced => Rgb(59, 130, 246),
            ReadinessLevel::Developing => Rgb(245, 158, 11),
            ReadinessLevel::Beginner => Rgb(239, 68, 68),
        }
    }

    /// One-line summary of the tier.
    pub fn description(self) -> &'static str {
        match self {
            ReadinessLevel::Beginner => "Basic understanding, needs foundational work",
            ReadinessLevel::Developing => "Growing awareness, some initiatives in place",
            ReadinessLevel::Advanced => "Strong foundation, actively implementing",
            ReadinessLevel::Leader => "Industry leader, driving innovation",
        }
    }

    pub fn action_plan(self) -> &'static ActionPlan {
        match self {
            ReadinessLevel::Beginner => &BEGINNER_PLAN,
            ReadinessLevel::Developing => &DEVELOPING_PLAN,
            ReadinessLevel::Advanced => &ADVANCED_PLAN,
            ReadinessLevel::Leader => &LEADER_PLAN,
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static BEGINNER_PLAN: ActionPlan = ActionPlan {
    title: "Your Readiness Level: Beginner",
    meaning: "Your organization is at the early stage of digital readiness. Foundational \
              elements like clear strategy, leadership awareness, budget, and data basics \
              may be missing or not formalized.",
    next_steps: &[
        "Create a simple, phased digital roadmap (1–3 years).",
        "Appoint a digital champion or team.",
        "Allocate a small budget for pilot projects.",
        "Run leadership workshops on Industry 4.0 basics.",
        "Start a low-risk pilot (e.g., predictive maintenance).",
        "Assess your data quality and security.",
        "Communicate clearly with employees about why digitalization matters.",
    ],
};

static DEVELOPING_PLAN: ActionPlan = ActionPlan {
    title: "Your Readiness Level: Developing",
    meaning: "You have some digital initiatives in place but they may be isolated or \
              limited in scale. You're still developing your internal capabilities and \
              your overall approach.",
    next_steps: &[
        "Expand successful pilots into larger rollouts.",
        "Formalize your digital transformation roadmap.",
        "Review and strengthen data governance policies.",
        "Invest in employee training for key digital skills.",
        "Align your supply chain partners with your digital vision.",
        "Start defining clear ROI metrics for all digital projects.",
    ],
};

static ADVANCED_PLAN: ActionPlan = ActionPlan {
    title: "Your Readiness Level: Advanced",
    meaning: "You have multiple digital initiatives working together with good processes \
              and governance. Your workforce is more digitally skilled, and you see clear ROI.",
    next_steps: &[
        "Scale up pilots into enterprise-wide programs.",
        "Continue benchmarking against industry best practices.",
        "Develop advanced analytics or AI capabilities where it makes sense.",
        "Optimize your ecosystem — ensure supply chain partners are connected and aligned.",
        "Identify new revenue streams enabled by digitalization (e.g., new services).",
    ],
};

static LEADER_PLAN: ActionPlan = ActionPlan {
    title: "Your Readiness Level: Leader",
    meaning: "Your organization is an industry leader in digital transformation. \
              Digitalization is embedded in your strategy, culture, and operations, and you \
              continuously innovate.",
    next_steps: &[
        "Invest in continuous improvement — keep refining your digital roadmap.",
        "Explore cutting-edge tech like autonomous systems, advanced robotics, or digital twins.",
        "Share best practices internally and externally to strengthen your brand.",
        "Lead industry partnerships or working groups.",
        "Future-proof your workforce through advanced upskilling and talent retention programs.",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_tier_boundaries() {
        assert_eq!(ReadinessLevel::from_score(12), ReadinessLevel::Beginner);
        assert_eq!(ReadinessLevel::from_score(24), ReadinessLevel::Beginner);
        assert_eq!(ReadinessLevel::from_score(25), ReadinessLevel::Developing);
        assert_eq!(ReadinessLevel::from_score(36), ReadinessLevel::Developing);
        assert_eq!(ReadinessLevel::from_score(37), ReadinessLevel::Advanced);
        assert_eq!(ReadinessLevel::from_score(48), ReadinessLevel::Advanced);
        assert_eq!(ReadinessLevel::from_score(49), ReadinessLevel::Leader);
        assert_eq!(ReadinessLevel::from_score(60), ReadinessLevel::Leader);
    }

    #[test]
    fn out_of_range_scores_clamp_to_outer_tiers() {
        assert_eq!(ReadinessLevel::from_score(0), ReadinessLevel::Beginner);
        assert_eq!(ReadinessLevel::from_score(99), ReadinessLevel::Leader);
    }

    #[test]
    fn ranges_cover_the_score_domain_without_gaps() {
        for score in MIN_SCORE..=MAX_SCORE {
            let hits = ReadinessLevel::ALL
                .iter()
                .filter(|level| level.range().contains(&score))
                .count();
            assert_eq!(hits, 1, "score {score} must map to exactly one tier");
        }
    }

    #[test]
    fn every_tier_has_a_titled_plan() {
        for level in ReadinessLevel::ALL {
            let plan = level.action_plan();
            assert!(plan.title.ends_with(level.name()));
            assert!(!plan.next_steps.is_empty());
        }
    }
}
