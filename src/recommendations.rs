//! Normalisation of model-generated recommendation payloads.

use log::warn;
use serde::Deserialize;

use crate::model::{Recommendation, ReportModel};

/// Title used when the whole analysis was returned inside a single card.
const WRAPPED_ANALYSIS_TITLE: &str = "AI Analysis Complete";

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Recommendation>),
    Wrapped { recommendations: Vec<Recommendation> },
}

/// Parses a JSON payload that is either an array of recommendations or an
/// object with a `recommendations` array, then normalises it.
pub fn parse_recommendations(json: &str) -> Result<Vec<Recommendation>, serde_json::Error> {
    let list = match serde_json::from_str::<Payload>(json)? {
        Payload::List(list) => list,
        Payload::Wrapped { recommendations } => recommendations,
    };
    Ok(normalize_recommendations(list))
}

/// Unwraps the single-card shape where the description embeds the real list.
///
/// Any other input is returned unchanged. A wrapped card whose embedded JSON
/// cannot be parsed is kept as is.
pub fn normalize_recommendations(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let [single] = recommendations.as_slice() else {
        return recommendations;
    };
    if single.title != WRAPPED_ANALYSIS_TITLE || !single.description.contains("recommendations") {
        return recommendations;
    }

    let Some(embedded) = embedded_object(&single.description) else {
        return recommendations;
    };

    #[derive(Deserialize)]
    struct Embedded {
        recommendations: Vec<Recommendation>,
    }

    match serde_json::from_str::<Embedded>(embedded) {
        Ok(parsed) => parsed.recommendations,
        Err(err) => {
            warn!("Failed to parse embedded recommendations: {err}");
            recommendations
        }
    }
}

impl ReportModel {
    /// Applies [`normalize_recommendations`] to the model's recommendations.
    pub fn with_normalized_recommendations(self) -> Self {
        let recommendations = normalize_recommendations(self.recommendations().to_vec());
        self.replace_recommendations(recommendations)
    }
}

/// Returns the text between the first `{` and the last `}`.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    #[test]
    fn plain_lists_pass_through() {
        let list = vec![Recommendation::new("A", "first"), Recommendation::new("B", "second")];
        assert_eq!(normalize_recommendations(list.clone()), list);
    }

    #[test]
    fn wrapped_analysis_is_unwrapped() {
        let description = r#"Here you go: {"recommendations": [
            {"title": "Pilot", "description": "Run a pilot", "priority": "High",
             "timeline": "3 months", "impact": "Faster ramp-up"}
        ]} Thanks."#;
        let list = vec![Recommendation::new(WRAPPED_ANALYSIS_TITLE, description)];

        let normalized = normalize_recommendations(list);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].title, "Pilot");
        assert_eq!(normalized[0].priority, Priority::High);
    }

    #[test]
    fn broken_embedded_json_keeps_the_original_card() {
        let list = vec![Recommendation::new(
            WRAPPED_ANALYSIS_TITLE,
            "recommendations: {not json}",
        )];
        assert_eq!(normalize_recommendations(list.clone()), list);
    }

    #[test]
    fn models_normalize_in_place() {
        let description = r#"{"recommendations": [{"title": "A"}, {"title": "B"}]}"#;
        let model = ReportModel::default()
            .with_recommendation(Recommendation::new(WRAPPED_ANALYSIS_TITLE, description))
            .with_normalized_recommendations();
        let titles: Vec<&str> = model.recommendations().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn parses_array_and_object_payloads() {
        let array = parse_recommendations(r#"[{"title": "A"}]"#).expect("array payload");
        assert_eq!(array[0].title, "A");

        let object =
            parse_recommendations(r#"{"recommendations": [{"title": "B"}]}"#).expect("object payload");
        assert_eq!(object[0].title, "B");
    }
}
