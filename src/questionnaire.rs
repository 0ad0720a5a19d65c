//! Fixed question banks and score computation.

use std::collections::BTreeMap;

use crate::model::{AssessmentKind, QuestionAnswer, Recommendation, ReportModel};

/// A questionnaire item as shown on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub category: &'static str,
}

const fn question(id: u32, text: &'static str, category: &'static str) -> Question {
    Question { id, text, category }
}

static C_LEVEL_QUESTIONS: [Question; 12] = [
    question(1, "Our company has a clear digital transformation roadmap.", "Measures strategic planning."),
    question(2, "We see digitalization as a long-term competitive advantage.", "Gauges strategic importance."),
    question(3, "Our investment decisions consider ROI and long-term impact equally.", "Balances cost vs value."),
    question(4, "We have successfully piloted new digital solutions before scaling.", "Practical proof of readiness."),
    question(5, "We have budget allocated specifically for digitalization initiatives.", "Tests financial readiness."),
    question(6, "We have KPIs in place to measure the impact of digital investments.", "Shows performance orientation."),
    question(
        7,
        "We leverage advanced engineering tools (e.g., CAD/CAE, PLM) to accelerate product \
         development and reduce time-to-market.",
        "Assesses digital engineering maturity",
    ),
    question(
        8,
        "Our cross-functional teams (R&D, manufacturing, operations) collaborate digitally \
         during the early design phase to ensure manufacturability and cost efficiency.",
        "Checks integrated engineering and concurrent design maturity",
    ),
    question(
        9,
        "We have vertical integration between our IT and Operational Technology (OT) systems, \
         enabling seamless data flow across ISA-95 levels—from enterprise (Level 4) to plant \
         operations (Level 3) and control systems (Level 2)—to support real-time \
         decision-making and end-to-end digitalization.",
        "Assess technology integration",
    ),
    question(10, "We have a dedicated team or champion for digital transformation.", "Checks organizational structure"),
    question(11, "We are willing to change legacy processes that hold us back.", "Measures change readiness"),
    question(12, "We are prepared to invest in culture change and training programs.", "Looks at human factors"),
];

static SHOPFLOOR_QUESTIONS: [Question; 12] = [
    question(1, "How familiar are your operators with digital tools and technologies?", "Digital Literacy"),
    question(2, "What is the current state of your production line automation?", "Automation"),
    question(3, "How well do your operators understand Industry 4.0 concepts?", "Knowledge"),
    question(4, "What is your current level of real-time data visibility on the shop floor?", "Data Visibility"),
    question(5, "How mature is your predictive maintenance program?", "Maintenance"),
    question(6, "What is your current level of digital work instructions and training?", "Training"),
    question(7, "How well integrated are your quality control systems?", "Quality"),
    question(8, "What is your current level of mobile device usage on the shop floor?", "Mobile Technology"),
    question(9, "How mature is your energy management and sustainability tracking?", "Sustainability"),
    question(
        10,
        "What is your current level of cross-functional collaboration on digital initiatives?",
        "Collaboration",
    ),
    question(11, "How well do you track and measure operator performance digitally?", "Performance Tracking"),
    question(
        12,
        "What is your shop floor's overall readiness for Industry 4.0 implementation?",
        "Overall Readiness",
    ),
];

impl AssessmentKind {
    /// The question bank for this variant, in questionnaire order.
    pub fn questions(self) -> &'static [Question] {
        match self {
            AssessmentKind::CLevel => &C_LEVEL_QUESTIONS,
            AssessmentKind::Shopfloor => &SHOPFLOOR_QUESTIONS,
        }
    }
}

/// Sums the answers given for the questions of `kind`; unknown ids are ignored.
pub fn total_score(kind: AssessmentKind, answers: &BTreeMap<u32, u8>) -> u32 {
    kind.questions()
        .iter()
        .filter_map(|question| answers.get(&question.id))
        .map(|value| u32::from(*value))
        .sum()
}

impl ReportModel {
    /// Builds a model from raw form answers keyed by question id.
    ///
    /// Every question of the bank produces one entry; questions without an
    /// answer are recorded as `0`.
    pub fn from_answers(
        kind: AssessmentKind,
        answers: &BTreeMap<u32, u8>,
        completion_date: impl Into<String>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let questions = kind.questions().iter().map(|question| {
            QuestionAnswer::new(
                question.id,
                question.text,
                question.category,
                answers.get(&question.id).copied().unwrap_or(0),
            )
        });

        ReportModel::new(kind, total_score(kind, answers))
            .with_completion_date(completion_date)
            .with_questions(questions)
            .with_recommendations(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readiness::ReadinessLevel;

    #[test]
    fn banks_have_twelve_sequential_questions() {
        for kind in [AssessmentKind::CLevel, AssessmentKind::Shopfloor] {
            let ids: Vec<u32> = kind.questions().iter().map(|q| q.id).collect();
            assert_eq!(ids, (1..=12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn score_ignores_unknown_ids() {
        let answers = BTreeMap::from([(1, 5), (2, 4), (99, 5)]);
        assert_eq!(total_score(AssessmentKind::CLevel, &answers), 9);
    }

    #[test]
    fn from_answers_fills_gaps_with_zero() {
        let answers: BTreeMap<u32, u8> = (1..=11).map(|id| (id, 3)).collect();
        let model =
            ReportModel::from_answers(AssessmentKind::Shopfloor, &answers, "2024-05-01", Vec::new());

        assert_eq!(model.questions().len(), 12);
        assert_eq!(model.questions()[11].answer_value, 0);
        assert_eq!(model.total_score(), 33);
        assert_eq!(model.readiness_level(), ReadinessLevel::Developing);
    }
}
