//! Section-by-section layout of a [`ReportModel`].

use log::debug;

use crate::layout::card::{measure_card, CardSpec, MeasuredCard};
use crate::layout::document::{
    CardKind, Document, Page, SectionKind, SectionMark, Shape, TextRun,
};
use crate::layout::geometry::{PageGeometry, Rect};
use crate::likert::ResponseScale;
use crate::metrics::TextMetrics;
use crate::model::{Priority, QuestionAnswer, Recommendation, ReportModel};
use crate::readiness::{ReadinessLevel, MAX_SCORE};
use crate::style::{FontSpec, Rgb};
use crate::wrap::wrap_text;

/// Vertical gap left below every card.
pub const CARD_GAP: f64 = 8.0;

const EPSILON: f64 = 1e-6;

/// Smallest leading fragment worth starting on a partly filled page.
const MIN_FRAGMENT_HEIGHT: f64 = 40.0;

const HEADING_FONT: FontSpec = FontSpec::bold(18.0, 1.1);
const HEADING_ADVANCE: f64 = 16.0;
const SUBHEADING_FONT: FontSpec = FontSpec::bold(14.0, 1.1);
const SUBHEADING_ADVANCE: f64 = 14.0;

const LABEL_FONT: FontSpec = FontSpec::bold(12.0, 1.1);
const BODY_FONT: FontSpec = FontSpec::regular(12.0, 1.2);
const DENSE_FONT: FontSpec = FontSpec::regular(12.0, 1.1);

const QUESTION_PADDING_Y: f64 = 6.0;
const QUESTION_MIN_HEIGHT: f64 = 30.0;
const QUESTION_INSET: f64 = 15.0;
const CATEGORY_FONT: FontSpec = FontSpec::regular(10.0, 1.1).with_color(Rgb::ACCENT);
const RESPONSE_NOTE_FONT: FontSpec = FontSpec::regular(10.0, 1.1).with_color(Rgb::MUTED);
const QUESTION_TITLE_FONT: FontSpec = FontSpec::bold(13.0, 1.1);

const PLAN_PADDING_Y: f64 = 8.0;
const PLAN_MIN_HEIGHT: f64 = 50.0;
const PLAN_INSET: f64 = 10.0;
const PLAN_STEP_INSET: f64 = 18.0;
const PLAN_TITLE_FONT: FontSpec = FontSpec::bold(14.0, 1.1);

const RECOMMENDATION_PADDING_Y: f64 = 10.0;
const RECOMMENDATION_MIN_HEIGHT: f64 = 30.0;
const RECOMMENDATION_TITLE_INSET: f64 = 20.0;
const RECOMMENDATION_BODY_INSET: f64 = 32.0;
const RECOMMENDATION_TITLE_FONT: FontSpec = FontSpec::bold(13.0, 1.1);
const MARKER_ROW_HEIGHT: f64 = 16.0;
const MARKER_FILL: Rgb = Rgb(219, 234, 254);
const MARKER_FONT: FontSpec = FontSpec::bold(10.0, 1.0).with_color(Rgb(37, 99, 235));
const BADGE_WIDTH: f64 = 35.0;
const BADGE_HEIGHT: f64 = 10.0;
const BADGE_FONT: FontSpec = FontSpec::bold(9.0, 1.0).with_color(Rgb::WHITE);

const FOOTER_FONT: FontSpec = FontSpec::regular(10.0, 1.2).with_color(Rgb::MUTED);
const FOOTER_LINE_SPACING: f64 = 8.0;

/// Presentation options that do not affect the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Product name used in the title and the footer.
    pub product_name: String,
    pub response_scale: ResponseScale,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            product_name: "Xcelerator".to_owned(),
            response_scale: ResponseScale::default(),
        }
    }
}

fn priority_color(priority: Priority) -> Rgb {
    match priority {
        Priority::High => Rgb(220, 38, 38),
        Priority::Medium => Rgb(217, 119, 6),
        Priority::Low => Rgb(34, 197, 94),
    }
}

/// Lays out reports onto fixed-size pages.
///
/// The engine itself is immutable; every call to [`LayoutEngine::layout`]
/// builds its own page and cursor state.
pub struct LayoutEngine<'a> {
    metrics: &'a dyn TextMetrics,
    geometry: PageGeometry,
    options: LayoutOptions,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(metrics: &'a dyn TextMetrics) -> Self {
        Self {
            metrics,
            geometry: PageGeometry::default(),
            options: LayoutOptions::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Produces the paginated document for `model`.
    pub fn layout(&self, model: &ReportModel) -> Document {
        let mut flow = PageFlow::new(self.geometry);

        self.summary(&mut flow, model);

        flow.new_page();
        self.heading(&mut flow, SectionKind::Questions, "Assessment Questions & Answers");
        for (index, question) in model.questions().iter().enumerate() {
            let card = measure_card(&self.question_card(index, question), self.metrics);
            flow.place_card(card);
        }

        flow.new_page();
        self.heading(&mut flow, SectionKind::ActionPlan, "Recommended Next Steps");
        let plan = measure_card(&self.action_plan_card(model.readiness_level()), self.metrics);
        flow.place_card(plan);

        if !model.recommendations().is_empty() {
            flow.new_page();
            self.heading(
                &mut flow,
                SectionKind::Recommendations,
                "AI-Powered Custom Recommendations",
            );
            let subheading = self.run(
                "Customized Recommendations Based on Your Assessment",
                SUBHEADING_FONT,
                self.geometry.margin,
                flow.cursor,
            );
            flow.push_text(subheading);
            flow.advance(SUBHEADING_ADVANCE);

            for (index, recommendation) in model.recommendations().iter().enumerate() {
                let card =
                    measure_card(&self.recommendation_card(index, recommendation), self.metrics);
                flow.place_card(card);
            }
        }

        self.footer(&mut flow);

        let document = flow.finish();
        debug!(
            "Laid out {} report on {} pages",
            model.assessment_kind(),
            document.page_count()
        );
        document
    }

    fn summary(&self, flow: &mut PageFlow, model: &ReportModel) {
        let margin = self.geometry.margin;
        let level = model.readiness_level();
        flow.mark_section(SectionKind::Summary, "Summary");

        let lines = [
            (format!("{} Assessment", self.options.product_name), FontSpec::bold(24.0, 1.1), 20.0),
            (
                format!("{} Assessment", model.assessment_kind().audience()),
                FontSpec::bold(16.0, 1.1),
                12.0,
            ),
            (
                format!("Completed on {}", model.completion_date()),
                FontSpec::regular(12.0, 1.1),
                30.0,
            ),
            ("Assessment Results".to_owned(), FontSpec::bold(16.0, 1.1), 20.0),
        ];
        for (text, font, advance) in lines {
            self.centered_block(flow, &text, font, advance);
        }

        let label_font = FontSpec::bold(14.0, 1.1);
        let value_font = FontSpec::bold(16.0, 1.1);

        let score = format!("{}/{}", model.total_score(), MAX_SCORE);
        flow.push_text(self.run("Total Score:", label_font, margin + 50.0, flow.cursor));
        flow.push_text(self.run(
            &score,
            value_font.with_color(Rgb::ACCENT),
            margin + 120.0,
            flow.cursor,
        ));
        flow.advance(15.0);

        flow.push_text(self.run("Readiness Level:", label_font, margin + 50.0, flow.cursor));
        flow.push_text(self.run(
            level.name(),
            value_font.with_color(level.color()),
            margin + 120.0,
            flow.cursor,
        ));
        flow.advance(12.0);

        let description_font = FontSpec::regular(11.0, 1.2).with_color(Rgb::MUTED);
        self.centered_block(flow, level.description(), description_font, 10.0);
    }

    fn heading(&self, flow: &mut PageFlow, kind: SectionKind, title: &str) {
        flow.mark_section(kind, title);
        let run = self.run(title, HEADING_FONT, self.geometry.margin, flow.cursor);
        flow.push_text(run);
        flow.advance(HEADING_ADVANCE);
    }

    fn question_card(&self, index: usize, question: &QuestionAnswer) -> CardSpec {
        let card_width = self.geometry.content_width();
        let width = card_width - 2.0 * QUESTION_INSET;
        let label = self.options.response_scale.label(question.answer_value);

        let spec = CardSpec::new(CardKind::Question, index, card_width)
            .padding_y(QUESTION_PADDING_Y)
            .min_height(QUESTION_MIN_HEIGHT)
            .text(QUESTION_INSET, width, CATEGORY_FONT, question.category.as_str())
            .text(
                QUESTION_INSET,
                width,
                QUESTION_TITLE_FONT,
                format!("Question {}", question.question_id),
            )
            .text(QUESTION_INSET, width, BODY_FONT, question.question_text.as_str())
            .spacer(2.0)
            .text(
                QUESTION_INSET,
                width,
                LABEL_FONT,
                format!("Response: {label} ({}/5)", question.answer_value),
            );

        match self.options.response_scale.description(question.answer_value) {
            Some(note) => spec.text(QUESTION_INSET, width, RESPONSE_NOTE_FONT, note),
            None => spec,
        }
    }

    fn action_plan_card(&self, level: ReadinessLevel) -> CardSpec {
        let plan = level.action_plan();
        let card_width = self.geometry.content_width();
        let width = card_width - 2.0 * PLAN_INSET;
        let step_width = card_width - PLAN_INSET - PLAN_STEP_INSET;

        let spec = CardSpec::new(CardKind::ActionPlan, 0, card_width)
            .padding_y(PLAN_PADDING_Y)
            .min_height(PLAN_MIN_HEIGHT)
            .text(PLAN_INSET, width, PLAN_TITLE_FONT, plan.title)
            .spacer(4.0)
            .text(PLAN_INSET, width, LABEL_FONT, "What it means:")
            .text(PLAN_INSET, width, BODY_FONT, plan.meaning)
            .spacer(6.0)
            .text(PLAN_INSET, width, LABEL_FONT, "Recommended Next Steps:");

        plan.next_steps
            .iter()
            .enumerate()
            .fold(spec, |spec, (index, step)| {
                spec.text(PLAN_STEP_INSET, step_width, BODY_FONT, format!("{}. {step}", index + 1))
            })
    }

    fn recommendation_card(&self, index: usize, recommendation: &Recommendation) -> CardSpec {
        let card_width = self.geometry.content_width();
        let title_width = card_width - 2.0 * RECOMMENDATION_TITLE_INSET;
        let body_width = card_width - 60.0;

        let marker = Shape::Circle {
            center_x: 20.0,
            center_y: 8.0,
            radius: 5.0,
            fill: MARKER_FILL,
        };
        let badge_rect = Rect::new(card_width - 45.0, 2.0, BADGE_WIDTH, BADGE_HEIGHT);
        let badge = Shape::RoundedRect {
            rect: badge_rect,
            radius: 2.0,
            fill: Some(priority_color(recommendation.priority)),
            stroke: None,
        };

        let ordinal = (index + 1).to_string();
        let labels = vec![
            self.centered_in(&ordinal, MARKER_FONT, 20.0, 8.0),
            self.centered_in(
                recommendation.priority.name(),
                BADGE_FONT,
                badge_rect.x + badge_rect.width / 2.0,
                badge_rect.y + badge_rect.height / 2.0,
            ),
        ];

        CardSpec::new(CardKind::Recommendation, index, card_width)
            .padding_y(RECOMMENDATION_PADDING_Y)
            .min_height(RECOMMENDATION_MIN_HEIGHT)
            .row(MARKER_ROW_HEIGHT, vec![marker, badge], labels)
            .text(
                RECOMMENDATION_TITLE_INSET,
                title_width,
                RECOMMENDATION_TITLE_FONT,
                recommendation.title.as_str(),
            )
            .spacer(4.0)
            .text(RECOMMENDATION_BODY_INSET, body_width, LABEL_FONT, "What to do:")
            .text(
                RECOMMENDATION_BODY_INSET,
                body_width,
                BODY_FONT,
                recommendation.description.as_str(),
            )
            .spacer(2.0)
            .text(
                RECOMMENDATION_BODY_INSET,
                body_width,
                DENSE_FONT,
                format!("Timeline: {}", recommendation.timeline),
            )
            .text(
                RECOMMENDATION_BODY_INSET,
                body_width,
                DENSE_FONT,
                format!("Expected Impact: {}", recommendation.impact),
            )
    }

    fn footer(&self, flow: &mut PageFlow) {
        let first = format!(
            "This assessment was generated by the {} Digital Transformation Portal.",
            self.options.product_name
        );
        let second = "For more information and detailed recommendations, please visit the dashboard.";

        let first = self.wrap_centered(&first, FOOTER_FONT);
        let second = self.wrap_centered(second, FOOTER_FONT);
        let line = FOOTER_FONT.line_advance();
        let second_top = FOOTER_LINE_SPACING + (first.len() - 1) as f64 * line;
        let height = second_top + second.len() as f64 * line;
        flow.ensure_space(height);

        let top = flow.cursor;
        for (index, text) in first.iter().enumerate() {
            flow.push_text(self.centered(text, FOOTER_FONT, top + index as f64 * line));
        }
        for (index, text) in second.iter().enumerate() {
            let y = top + second_top + index as f64 * line;
            flow.push_text(self.centered(text, FOOTER_FONT, y));
        }
        flow.advance(height);
    }

    /// Wraps `text` to the content width for centred placement.
    fn wrap_centered(&self, text: &str, font: FontSpec) -> Vec<String> {
        let prepared = self.metrics.prepare(text);
        wrap_text(self.metrics, &prepared, &font, self.geometry.content_width())
    }

    /// Centred lines wrapped to the content width, followed by `advance`.
    fn centered_block(&self, flow: &mut PageFlow, text: &str, font: FontSpec, advance: f64) {
        let lines = self.wrap_centered(text, font);
        for (index, line) in lines.iter().enumerate() {
            let y = flow.cursor + index as f64 * font.line_advance();
            flow.push_text(self.centered(line, font, y));
        }
        flow.advance(advance + (lines.len() - 1) as f64 * font.line_advance());
    }

    /// A single unwrapped run with its left edge at `x`.
    fn run(&self, text: &str, font: FontSpec, x: f64, y: f64) -> TextRun {
        let text = self.metrics.prepare(text).into_owned();
        let width = self.metrics.text_width(&text, font.weight, font.size_pt);
        TextRun {
            text,
            x,
            y,
            width,
            font,
        }
    }

    /// A run horizontally centred on the page.
    fn centered(&self, text: &str, font: FontSpec, y: f64) -> TextRun {
        let mut run = self.run(text, font, 0.0, y);
        run.x = self.geometry.center_x() - run.width / 2.0;
        run
    }

    /// A run centred on `(center_x, center_y)`.
    fn centered_in(&self, text: &str, font: FontSpec, center_x: f64, center_y: f64) -> TextRun {
        let mut run = self.run(text, font, 0.0, center_y - font.line_advance() / 2.0);
        run.x = center_x - run.width / 2.0;
        run
    }
}

/// Page and cursor state for a single layout call.
struct PageFlow {
    geometry: PageGeometry,
    finished: Vec<Page>,
    current: Page,
    cursor: f64,
    sections: Vec<SectionMark>,
    /// Set by a section heading until the first card below it is placed.
    section_open: bool,
}

impl PageFlow {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Page::new(0, geometry.content_top()),
            cursor: geometry.content_top(),
            sections: Vec::new(),
            section_open: false,
        }
    }

    fn new_page(&mut self) {
        let top = self.geometry.content_top();
        let next = Page::new(self.current.index + 1, top);
        self.finished.push(std::mem::replace(&mut self.current, next));
        self.cursor = top;
        debug!("Started page {}", self.current.index + 1);
    }

    fn remaining(&self) -> f64 {
        self.geometry.content_bottom() - self.cursor
    }

    fn at_top(&self) -> bool {
        self.cursor <= self.geometry.content_top() + EPSILON
    }

    /// Breaks the page when `height` does not fit below the cursor.
    fn ensure_space(&mut self, height: f64) {
        if height > self.remaining() + EPSILON && !self.at_top() {
            debug!(
                "Breaking page {}: {:.1}mm needed, {:.1}mm left",
                self.current.index + 1,
                height,
                self.remaining()
            );
            self.new_page();
        }
    }

    fn advance(&mut self, dy: f64) {
        self.cursor += dy;
        self.current.cursor = self.cursor;
    }

    fn push_text(&mut self, run: TextRun) {
        self.current.texts.push(run);
    }

    fn mark_section(&mut self, kind: SectionKind, title: &str) {
        debug!("Section {:?} starts on page {}", kind, self.current.index + 1);
        self.sections.push(SectionMark {
            kind,
            title: title.to_owned(),
            page: self.current.index,
            y: self.cursor,
        });
        self.section_open = true;
    }

    /// Places a measured card, splitting it first if it is taller than a page.
    ///
    /// A split card starts on the current page when a useful amount of space
    /// is left there. The first card under a section heading is split into the
    /// space below the heading rather than moved away from it.
    fn place_card(&mut self, card: MeasuredCard) {
        let page_height = self.geometry.content_height();
        let leading = self.section_open || card.height > page_height + EPSILON;
        self.section_open = false;
        let first_height = if leading && self.remaining() >= MIN_FRAGMENT_HEIGHT {
            self.remaining()
        } else {
            page_height
        };

        for fragment in card.split(first_height, page_height) {
            self.ensure_space(fragment.height);
            let height = fragment.height;
            let placed = fragment.place(self.geometry.margin, self.cursor);
            self.current.cards.push(placed);
            self.advance(height + CARD_GAP);
        }
    }

    fn finish(mut self) -> Document {
        self.finished.push(self.current);
        Document::new(self.geometry, self.finished, self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Helvetica;
    use crate::model::AssessmentKind;

    #[test]
    fn cards_stay_inside_the_card_width() {
        let engine = LayoutEngine::new(&Helvetica);
        let model = ReportModel::new(AssessmentKind::CLevel, 40).with_recommendation(
            Recommendation::new("Title", "Description").with_priority(Priority::High),
        );
        let document = engine.layout(&model);

        for (_, card) in document.cards() {
            for line in &card.lines {
                assert!(card.rect.contains(&line.bounds()), "{:?} escapes {:?}", line, card.rect);
            }
            for shape in &card.shapes {
                assert!(card.rect.contains(&shape.bounds()));
            }
        }
    }

    #[test]
    fn footer_breaks_when_page_is_full() {
        let mut flow = PageFlow::new(PageGeometry::A4);
        flow.advance(250.0);
        flow.ensure_space(FOOTER_LINE_SPACING + FOOTER_FONT.line_advance());
        assert_eq!(flow.current.index, 1);
        assert_eq!(flow.cursor, 20.0);
    }

    #[test]
    fn ensure_space_never_breaks_an_empty_page() {
        let mut flow = PageFlow::new(PageGeometry::A4);
        flow.ensure_space(1000.0);
        assert_eq!(flow.current.index, 0);
    }

    #[test]
    fn maturity_responses_carry_their_description() {
        let model = ReportModel::new(AssessmentKind::Shopfloor, 4)
            .with_question(QuestionAnswer::new(1, "Do you track output?", "Data", 4));
        let engine = LayoutEngine::new(&Helvetica).with_options(LayoutOptions {
            response_scale: ResponseScale::Maturity,
            ..LayoutOptions::default()
        });

        let document = engine.layout(&model);
        let (_, card) = document.cards_of(CardKind::Question).next().unwrap();
        assert!(card.text().contains("Response: Well (4/5)"));
        assert!(card.text().contains("Good implementation and understanding"));

        let agreement = LayoutEngine::new(&Helvetica).layout(&model);
        let (_, card) = agreement.cards_of(CardKind::Question).next().unwrap();
        assert!(!card.text().contains("Good implementation"));
    }

    #[test]
    fn long_titles_and_footer_wrap_inside_the_margins() {
        let product = "Enterprise Manufacturing Excellence and Operations Intelligence Suite";
        let model = ReportModel::new(AssessmentKind::CLevel, 40)
            .with_completion_date(format!("{} at the regional headquarters", "Monday ".repeat(20)));
        let engine = LayoutEngine::new(&Helvetica).with_options(LayoutOptions {
            product_name: product.to_owned(),
            ..LayoutOptions::default()
        });
        let geometry = engine.geometry();

        let document = engine.layout(&model);
        for page in document.pages() {
            for run in &page.texts {
                assert!(run.x >= geometry.margin - EPSILON, "{:?} starts in the margin", run.text);
                assert!(
                    run.x + run.width <= geometry.width - geometry.margin + EPSILON,
                    "{:?} runs into the margin",
                    run.text
                );
            }
        }

        let last = document.pages().last().unwrap();
        let footer: Vec<&str> = last.texts.iter().map(|run| run.text.as_str()).collect();
        assert!(footer.iter().any(|text| text.starts_with("This assessment was generated")));
        assert!(!footer.iter().any(|text| text.ends_with("Digital Transformation Portal.")
            && text.starts_with("This assessment")));
        assert!(footer
            .iter()
            .any(|text| *text == "For more information and detailed recommendations, please visit the dashboard."));
    }

    #[test]
    fn priority_badges_use_distinct_colors() {
        assert_ne!(priority_color(Priority::High), priority_color(Priority::Medium));
        assert_ne!(priority_color(Priority::Medium), priority_color(Priority::Low));
    }
}
