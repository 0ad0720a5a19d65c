//! Export pipeline: configuration, font selection, layout, rendering, and naming.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use log::info;

use crate::config::ReportConfig;
use crate::error::ExportError;
use crate::fonts::FontSet;
use crate::layout::{Document, LayoutEngine, LayoutOptions, PageGeometry, SectionMark};
use crate::likert::ResponseScale;
use crate::model::{AssessmentKind, ReportModel};
use crate::render::render_pdf;

/// Deterministic artifact name: `{prefix}-assessment-{kind}-{YYYY-MM-DD}.pdf`.
pub fn file_name_for(prefix: &str, kind: AssessmentKind, date: NaiveDate) -> String {
    format!(
        "{}-assessment-{}-{}.pdf",
        prefix,
        kind.slug(),
        date.format("%Y-%m-%d")
    )
}

/// Builder for [`ReportExporter`] instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct ReportBuilder {
    config: ReportConfig,
    geometry: PageGeometry,
    fonts: Option<FontSet>,
}

impl ReportBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder whose configuration is read from the environment.
    pub fn from_env() -> Self {
        Self::new().with_config(ReportConfig::from_env())
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.config.product_name = product_name.into();
        self
    }

    pub fn with_file_prefix(mut self, file_prefix: impl Into<String>) -> Self {
        self.config.file_prefix = file_prefix.into();
        self
    }

    pub fn with_response_scale(mut self, response_scale: ResponseScale) -> Self {
        self.config.response_scale = response_scale;
        self
    }

    /// Loads TrueType fonts from `directory`; failing to do so fails the build.
    pub fn with_fonts_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.fonts_dir = Some(directory.into());
        self
    }

    /// Draws with the builtin Helvetica faces and skips the font search.
    pub fn with_builtin_fonts(mut self) -> Self {
        self.config.builtin_fonts = true;
        self
    }

    /// Uses an already loaded font set.
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.geometry = self.geometry.with_margin(margin);
        self
    }

    /// Resolves fonts and returns the configured exporter.
    ///
    /// Without an explicit font directory the usual locations are searched
    /// and a missing family falls back to the builtin faces.
    pub fn build(self) -> Result<ReportExporter, ExportError> {
        let fonts = match (self.fonts, &self.config) {
            (Some(fonts), _) => fonts,
            (None, config) if config.builtin_fonts => FontSet::Builtin,
            (None, ReportConfig { fonts_dir: Some(dir), .. }) => FontSet::from_directory(dir)?,
            (None, _) => FontSet::locate_or_builtin(None),
        };

        Ok(ReportExporter {
            config: self.config,
            geometry: self.geometry,
            fonts,
        })
    }
}

/// Lays out and renders reports with a fixed configuration.
#[derive(Debug)]
pub struct ReportExporter {
    config: ReportConfig,
    geometry: PageGeometry,
    fonts: FontSet,
}

impl ReportExporter {
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    fn engine(&self) -> LayoutEngine<'_> {
        LayoutEngine::new(self.fonts.metrics())
            .with_geometry(self.geometry)
            .with_options(LayoutOptions {
                product_name: self.config.product_name.clone(),
                response_scale: self.config.response_scale,
            })
    }

    fn title(&self, model: &ReportModel) -> String {
        format!(
            "{} {} Assessment",
            self.config.product_name,
            model.assessment_kind().audience()
        )
    }

    /// Lays out `model` with the exporter's fonts and geometry.
    pub fn layout(&self, model: &ReportModel) -> Document {
        self.engine().layout(model)
    }

    /// Renders `model`, naming the result after today's UTC date.
    pub fn render(&self, model: &ReportModel) -> Result<RenderedReport, ExportError> {
        self.render_on(model, Utc::now().date_naive())
    }

    /// Renders `model`, naming the result after `date`.
    pub fn render_on(&self, model: &ReportModel, date: NaiveDate) -> Result<RenderedReport, ExportError> {
        let document = self.layout(model);
        let bytes = render_pdf(&document, &self.fonts, &self.title(model))?;

        Ok(RenderedReport {
            file_name: file_name_for(&self.config.file_prefix, model.assessment_kind(), date),
            bytes,
            page_count: document.page_count(),
            sections: document.sections().to_vec(),
        })
    }

    /// Renders `model` and adds one outline entry per section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self, model: &ReportModel) -> Result<RenderedReport, ExportError> {
        let mut report = self.render(model)?;
        report.bytes = crate::bookmarks::apply_section_bookmarks(&report.bytes, &report.sections)?;
        Ok(report)
    }
}

/// PDF bytes together with the name they should be saved under.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    file_name: String,
    bytes: Vec<u8>,
    page_count: usize,
    sections: Vec<SectionMark>,
}

impl RenderedReport {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn sections(&self) -> &[SectionMark] {
        &self.sections
    }

    /// Writes the report into `directory` under its file name.
    ///
    /// The bytes go to a `.part` sibling first and are renamed into place, so
    /// the target either holds the complete report or is left untouched.
    pub fn write_to_dir(&self, directory: &Path) -> Result<PathBuf, ExportError> {
        let path = directory.join(&self.file_name);
        let partial = directory.join(format!("{}.part", self.file_name));

        let written = fs::write(&partial, &self.bytes).and_then(|()| fs::rename(&partial, &path));
        if let Err(source) = written {
            let _ = fs::remove_file(&partial);
            return Err(ExportError::Write { path, source });
        }

        info!("Wrote {} ({} pages)", path.display(), self.page_count);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_pattern() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            file_name_for("xcelerator", AssessmentKind::CLevel, date),
            "xcelerator-assessment-c_level-2024-03-07.pdf"
        );
        assert_eq!(
            file_name_for("acme", AssessmentKind::Shopfloor, date),
            "acme-assessment-shopfloor-2024-03-07.pdf"
        );
    }

    #[test]
    fn explicit_missing_font_directory_fails_the_build() {
        let err = ReportBuilder::new()
            .with_fonts_dir("/definitely/not/here")
            .build()
            .unwrap_err();
        assert!(matches!(err, ExportError::Fonts(_)));
    }

    #[test]
    fn builtin_fonts_skip_the_search() {
        let exporter = ReportBuilder::new().with_builtin_fonts().build().unwrap();
        assert!(exporter.fonts().is_builtin());
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let report = RenderedReport {
            file_name: "report.pdf".into(),
            bytes: b"%PDF-1.3".to_vec(),
            page_count: 1,
            sections: Vec::new(),
        };
        let missing = std::env::temp_dir().join("assessment-report-missing-dir/nested");
        let err = report.write_to_dir(&missing).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(!missing.join("report.pdf.part").exists());
    }
}
