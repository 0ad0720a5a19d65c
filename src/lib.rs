//! Paginated PDF reports for scored readiness assessments.
//!
//! A [`ReportModel`] holds the answered questions, the score, and optional
//! recommendations. The [`layout`] module places it onto fixed-size pages as
//! measured cards, [`render`] draws the result with `printpdf`, and
//! [`ReportBuilder`] wires configuration, fonts, and file naming together.

pub mod builder;
pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod likert;
pub mod metrics;
pub mod model;
pub mod questionnaire;
pub mod readiness;
pub mod recommendations;
pub mod render;
pub mod style;
pub mod wrap;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{file_name_for, RenderedReport, ReportBuilder, ReportExporter};
pub use config::ReportConfig;
pub use error::ExportError;
pub use model::{AssessmentKind, Priority, QuestionAnswer, Recommendation, ReportModel};
pub use readiness::ReadinessLevel;

/// Renders `model` with the environment configuration and the default font search.
pub fn export_report(model: &ReportModel) -> Result<RenderedReport, ExportError> {
    ReportBuilder::from_env().build()?.render(model)
}
