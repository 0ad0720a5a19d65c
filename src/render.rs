//! Drawing a laid-out [`Document`] with `printpdf`.
//!
//! The renderer makes no layout decisions: every run and shape is drawn at the
//! position recorded in the document. Layout coordinates grow downwards from
//! the top-left corner, PDF coordinates grow upwards from the bottom-left, so
//! all vertical positions are flipped against the page height here.

use std::f64::consts::PI;
use std::fmt::Display;
use std::io::BufWriter;

use log::info;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb as PdfRgb,
};
use thiserror::Error;

use crate::fonts::FontSet;
use crate::layout::{Document, PlacedCard, Rect, Shape, TextRun, CARD_RADIUS};
use crate::style::{FontWeight, Rgb};

const LAYER_NAME: &str = "Report";

/// Card outline thickness in points.
const OUTLINE_THICKNESS: f64 = 0.57;

/// Segments used per quarter circle when approximating arcs.
const ARC_SEGMENTS: usize = 8;

/// Errors raised while producing PDF bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Pdf(String),
}

fn backend<E: Display>(err: E) -> RenderError {
    RenderError::Pdf(err.to_string())
}

struct Faces {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Faces {
    fn install(pdf: &PdfDocumentReference, fonts: &FontSet) -> Result<Self, RenderError> {
        match fonts {
            FontSet::Builtin => Ok(Self {
                regular: pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(backend)?,
                bold: pdf
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(backend)?,
            }),
            FontSet::TrueType(family) => Ok(Self {
                regular: pdf
                    .add_external_font(family.bytes(FontWeight::Regular))
                    .map_err(backend)?,
                bold: pdf
                    .add_external_font(family.bytes(FontWeight::Bold))
                    .map_err(backend)?,
            }),
        }
    }

    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_unit();
    Color::Rgb(PdfRgb::new(r, g, b, None))
}

/// One page layer together with the height used to flip coordinates.
struct Canvas<'a> {
    layer: PdfLayerReference,
    page_height: f64,
    faces: &'a Faces,
}

impl Canvas<'_> {
    fn point(&self, x: f64, y: f64) -> (Point, bool) {
        (Point::new(Mm(x), Mm(self.page_height - y)), false)
    }

    fn polygon(&self, points: Vec<(f64, f64)>, fill: Option<Rgb>, stroke: Option<Rgb>) {
        if let Some(fill) = fill {
            self.layer.set_fill_color(color(fill));
        }
        if let Some(stroke) = stroke {
            self.layer.set_outline_color(color(stroke));
            self.layer.set_outline_thickness(OUTLINE_THICKNESS);
        }

        self.layer.add_shape(Line {
            points: points
                .into_iter()
                .map(|(x, y)| self.point(x, y))
                .collect(),
            is_closed: true,
            has_fill: fill.is_some(),
            has_stroke: stroke.is_some(),
            is_clipping_path: false,
        });
    }

    fn shape(&self, shape: &Shape) {
        match shape {
            Shape::RoundedRect {
                rect,
                radius,
                fill,
                stroke,
            } => self.polygon(rounded_rect_points(rect, *radius), *fill, *stroke),
            Shape::Circle {
                center_x,
                center_y,
                radius,
                fill,
            } => self.polygon(circle_points(*center_x, *center_y, *radius), Some(*fill), None),
        }
    }

    fn text(&self, run: &TextRun) {
        if run.text.is_empty() {
            return;
        }
        self.layer.set_fill_color(color(run.font.color));
        self.layer.use_text(
            run.text.as_str(),
            run.font.size_pt,
            Mm(run.x),
            Mm(self.page_height - run.baseline()),
            self.faces.get(run.font.weight),
        );
    }

    fn card(&self, card: &PlacedCard) {
        self.shape(&Shape::RoundedRect {
            rect: card.rect,
            radius: CARD_RADIUS,
            fill: Some(Rgb::WHITE),
            stroke: Some(Rgb::BORDER),
        });
        for shape in &card.shapes {
            self.shape(shape);
        }
        for line in &card.lines {
            self.text(line);
        }
    }
}

fn arc(points: &mut Vec<(f64, f64)>, cx: f64, cy: f64, radius: f64, start: f64) {
    for step in 0..=ARC_SEGMENTS {
        let angle = start + (step as f64 / ARC_SEGMENTS as f64) * (PI / 2.0);
        points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
    }
}

/// Outline of a rounded rectangle in layout coordinates.
fn rounded_rect_points(rect: &Rect, radius: f64) -> Vec<(f64, f64)> {
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if radius == 0.0 {
        return vec![
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
    }

    let mut points = Vec::with_capacity(4 * (ARC_SEGMENTS + 1));
    arc(&mut points, rect.right() - radius, rect.y + radius, radius, -PI / 2.0);
    arc(&mut points, rect.right() - radius, rect.bottom() - radius, radius, 0.0);
    arc(&mut points, rect.x + radius, rect.bottom() - radius, radius, PI / 2.0);
    arc(&mut points, rect.x + radius, rect.y + radius, radius, PI);
    points
}

fn circle_points(cx: f64, cy: f64, radius: f64) -> Vec<(f64, f64)> {
    let segments = 4 * ARC_SEGMENTS;
    (0..segments)
        .map(|step| {
            let angle = step as f64 / segments as f64 * 2.0 * PI;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Renders `document` into PDF bytes.
pub fn render_pdf(document: &Document, fonts: &FontSet, title: &str) -> Result<Vec<u8>, RenderError> {
    let geometry = document.geometry();
    let (width, height) = (Mm(geometry.width), Mm(geometry.height));
    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let faces = Faces::install(&pdf, fonts)?;

    for page in document.pages() {
        let (page_index, layer_index) = if page.index == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(width, height, LAYER_NAME)
        };
        let canvas = Canvas {
            layer: pdf.get_page(page_index).get_layer(layer_index),
            page_height: geometry.height,
            faces: &faces,
        };

        for card in &page.cards {
            canvas.card(card);
        }
        for run in &page.texts {
            canvas.text(run);
        }
    }

    let mut writer = BufWriter::new(Vec::new());
    pdf.save(&mut writer).map_err(backend)?;
    let bytes = writer.into_inner().map_err(backend)?;

    info!(
        "Rendered {} pages ({} bytes) with {:?} fonts",
        document.page_count(),
        bytes.len(),
        fonts
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_stays_inside_its_bounds() {
        let rect = Rect::new(10.0, 20.0, 35.0, 10.0);
        for (x, y) in rounded_rect_points(&rect, 2.0) {
            assert!(x >= rect.x - 1e-9 && x <= rect.right() + 1e-9);
            assert!(y >= rect.y - 1e-9 && y <= rect.bottom() + 1e-9);
        }
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let points = rounded_rect_points(&rect, 10.0);
        assert!(points.iter().all(|(x, y)| *x >= -1e-9 && *y <= 4.0 + 1e-9));
    }

    #[test]
    fn fractional_font_sizes_render() {
        use crate::layout::{Page, PageGeometry};
        use crate::style::FontSpec;

        let geometry = PageGeometry::A4;
        let mut page = Page::new(0, geometry.content_top());
        page.texts.push(TextRun {
            text: "Half point sizes".to_owned(),
            x: geometry.margin,
            y: geometry.content_top(),
            width: 40.0,
            font: FontSpec::regular(10.5, 1.2),
        });
        let document = Document::new(geometry, vec![page], Vec::new());

        let bytes = render_pdf(&document, &FontSet::Builtin, "Fractional").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn circle_points_lie_on_the_radius() {
        for (x, y) in circle_points(20.0, 8.0, 5.0) {
            let distance = ((x - 20.0).powi(2) + (y - 8.0).powi(2)).sqrt();
            assert!((distance - 5.0).abs() < 1e-9);
        }
    }
}
