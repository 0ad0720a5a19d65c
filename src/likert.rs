//! Five-point response scales.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label printed for answers outside `1..=5`.
pub const NOT_ANSWERED: &str = "Not Answered";

/// Which wording is used for the five response points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseScale {
    /// Strongly Disagree … Strongly Agree.
    #[default]
    Agreement,
    /// Not at all … Excellent, as shown on the questionnaire form.
    Maturity,
}

const AGREEMENT_LABELS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

const MATURITY_LABELS: [(&str, &str); 5] = [
    ("Not at all", "No implementation or awareness"),
    ("Minimal", "Basic awareness, no implementation"),
    ("Somewhat", "Partial implementation or planning"),
    ("Well", "Good implementation and understanding"),
    ("Excellent", "Full implementation and mastery"),
];

impl ResponseScale {
    /// Returns the label for `value`, or [`NOT_ANSWERED`] for anything outside `1..=5`.
    pub fn label(self, value: u8) -> &'static str {
        let Some(index) = Self::index(value) else {
            return NOT_ANSWERED;
        };
        match self {
            ResponseScale::Agreement => AGREEMENT_LABELS[index],
            ResponseScale::Maturity => MATURITY_LABELS[index].0,
        }
    }

    /// Longer explanation of a maturity point; the agreement scale has none.
    pub fn description(self, value: u8) -> Option<&'static str> {
        match self {
            ResponseScale::Agreement => None,
            ResponseScale::Maturity => Self::index(value).map(|index| MATURITY_LABELS[index].1),
        }
    }

    fn index(value: u8) -> Option<usize> {
        (1..=5).contains(&value).then(|| usize::from(value) - 1)
    }
}

impl FromStr for ResponseScale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "agreement" => Ok(ResponseScale::Agreement),
            "maturity" => Ok(ResponseScale::Maturity),
            other => Err(format!(
                "unknown response scale `{other}`; expected `agreement` or `maturity`"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_labels_cover_the_scale() {
        let scale = ResponseScale::Agreement;
        assert_eq!(scale.label(1), "Strongly Disagree");
        assert_eq!(scale.label(3), "Neutral");
        assert_eq!(scale.label(5), "Strongly Agree");
    }

    #[test]
    fn zero_and_out_of_range_are_not_answered() {
        for scale in [ResponseScale::Agreement, ResponseScale::Maturity] {
            assert_eq!(scale.label(0), NOT_ANSWERED);
            assert_eq!(scale.label(6), NOT_ANSWERED);
        }
    }

    #[test]
    fn maturity_scale_carries_descriptions() {
        let scale = ResponseScale::Maturity;
        assert_eq!(scale.label(4), "Well");
        assert_eq!(
            scale.description(1),
            Some("No implementation or awareness")
        );
        assert_eq!(ResponseScale::Agreement.description(1), None);
    }

    #[test]
    fn parses_scale_names() {
        assert_eq!("Maturity".parse(), Ok(ResponseScale::Maturity));
        assert!("likert".parse::<ResponseScale>().is_err());
    }
}
